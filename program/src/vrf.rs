// Randomness coordinator integration for the raffle program
use crate::error::RaffleError;
use solana_program::{msg, pubkey::Pubkey};

/// Confirmations the off-chain coordinator waits before answering a request
pub const REQUEST_CONFIRMATIONS: u16 = 3;
/// Random words delivered per request
pub const NUM_WORDS: u32 = 1;

/// The external randomness oracle as seen by the draw trigger.
///
/// `request_random_words` is called exactly once per successful draw and
/// returns the id the eventual `FulfillRandomWords` must carry. `nonce` is
/// the number of requests the raffle has issued so far.
pub trait RandomnessCoordinator {
    fn request_random_words(&mut self, nonce: u64) -> Result<u64, RaffleError>;
}

/// On-chain request: ids are sequential per raffle (first id is 1), and the
/// request is published in the program log where the coordinator picks it up.
pub struct OracleRequest<'a> {
    pub raffle: &'a Pubkey,
    pub coordinator: &'a Pubkey,
}

impl<'a> RandomnessCoordinator for OracleRequest<'a> {
    fn request_random_words(&mut self, nonce: u64) -> Result<u64, RaffleError> {
        let request_id = nonce.checked_add(1).ok_or(RaffleError::ArithmeticOverflow)?;
        msg!(
            "Randomness requested: raffle={} coordinator={} request_id={} confirmations={} words={}",
            self.raffle,
            self.coordinator,
            request_id,
            REQUEST_CONFIRMATIONS,
            NUM_WORDS
        );
        Ok(request_id)
    }
}

/// Index of the winning entry for a delivered random value.
///
/// Plain modulo over the entry count: uniform only approximately, with a bias
/// that is negligible while the random domain dwarfs the number of entries.
pub fn get_random_winner_index(random_value: u64, total_entries: u64) -> Option<u64> {
    if total_entries == 0 {
        return None;
    }
    Some(random_value % total_entries)
}
