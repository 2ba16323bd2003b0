#![allow(unexpected_cfgs)]
// Raffle program: paid entries, interval-gated draws, winner picked from
// randomness delivered by an external coordinator.

pub mod error;
pub mod events;
pub mod instruction;
pub mod payout;
pub mod processor;
pub mod state;
pub mod utils;
pub mod vrf;

#[cfg(not(feature = "no-entrypoint"))]
pub mod entrypoint;

use solana_program::{account_info::AccountInfo, entrypoint::ProgramResult, pubkey::Pubkey};

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    processor::Processor::process(program_id, accounts, instruction_data)
}
