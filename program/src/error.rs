use solana_program::{
    decode_error::DecodeError, msg, program_error::PrintProgramError, program_error::ProgramError,
};
use thiserror::Error;

/// Errors that may be returned by the Raffle program
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RaffleError {
    /// Invalid instruction data passed
    #[error("Invalid instruction data")]
    InvalidInstructionData,

    /// Entry paid less than the entrance fee
    #[error("Paid amount is below the entrance fee")]
    InsufficientPayment,

    /// Raffle is calculating a winner and does not accept the action
    #[error("Raffle is not open")]
    RaffleNotOpen,

    /// Draw conditions are not met yet
    #[error("Upkeep not needed")]
    UpkeepNotNeeded,

    /// Randomness delivered for a request that is not outstanding
    #[error("Unknown randomness request")]
    UnknownRequest,

    /// The prize could not be delivered to the winner
    #[error("Prize transfer failed")]
    TransferFailed,

    /// Randomness delivered by someone other than the coordinator
    #[error("Only the coordinator can fulfill randomness")]
    OnlyCoordinatorCanFulfill,

    /// The recipient account passed in is not the drawn winner
    #[error("Winner account does not match the drawn winner")]
    WinnerAccountMismatch,

    /// Participant list is at capacity
    #[error("Raffle is full")]
    RaffleFull,

    /// Initialization parameters are out of range
    #[error("Invalid raffle configuration")]
    InvalidConfig,

    /// Initialize called on an account that already holds a raffle
    #[error("Raffle already initialized")]
    AlreadyInitialized,

    /// Raffle account was never initialized
    #[error("Raffle not initialized")]
    NotInitialized,

    /// A counter or lamport total would overflow
    #[error("Arithmetic overflow")]
    ArithmeticOverflow,

    /// A winner was asked for in a round with no entrants
    #[error("Raffle has no players")]
    NoPlayers,
}

impl From<RaffleError> for ProgramError {
    fn from(e: RaffleError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for RaffleError {
    fn type_of() -> &'static str {
        "Raffle Error"
    }
}

impl PrintProgramError for RaffleError {
    fn print<E>(&self) {
        msg!(&self.to_string());
    }
}
