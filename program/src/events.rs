// Notifications emitted by the raffle. Each one is logged twice: a readable
// `msg!` line and a borsh record through `sol_log_data` for indexers.
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{log::sol_log_data, msg, pubkey::Pubkey};

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum RaffleEvent {
    /// A player joined the current round
    RaffleEnter { player: Pubkey, amount: u64 },
    /// A draw was triggered and randomness requested
    RequestedRaffleWinner { request_id: u64 },
    /// Randomness arrived and the pot was paid out
    WinnerPicked { winner: Pubkey, amount: u64 },
}

impl RaffleEvent {
    pub fn emit(&self) {
        match self {
            RaffleEvent::RaffleEnter { player, amount } => {
                msg!("RaffleEnter: player={} amount={}", player, amount)
            }
            RaffleEvent::RequestedRaffleWinner { request_id } => {
                msg!("RequestedRaffleWinner: request_id={}", request_id)
            }
            RaffleEvent::WinnerPicked { winner, amount } => {
                msg!("WinnerPicked: winner={} amount={}", winner, amount)
            }
        }
        if let Ok(record) = borsh::to_vec(self) {
            sol_log_data(&[record.as_slice()]);
        }
    }
}
