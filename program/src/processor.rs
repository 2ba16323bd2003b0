use crate::error::RaffleError;
use crate::instruction::RaffleInstruction;
use crate::payout::LamportPayout;
use crate::state::Raffle;
use crate::utils::{assert_owned_by, assert_signer, assert_writable, lamports_to_sol};
use crate::vrf::OracleRequest;

use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::{invoke, set_return_data},
    program_error::ProgramError,
    program_pack::IsInitialized,
    pubkey::Pubkey,
    system_instruction, system_program,
    sysvar::{clock::Clock, rent::Rent, Sysvar},
};

pub struct Processor;

impl Processor {
    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction_data: &[u8],
    ) -> ProgramResult {
        let instruction = RaffleInstruction::unpack(instruction_data)?;

        match instruction {
            RaffleInstruction::Initialize {
                entrance_fee,
                interval,
                max_players,
            } => {
                msg!("Instruction: Initialize");
                Self::process_initialize(accounts, entrance_fee, interval, max_players, program_id)
            }
            RaffleInstruction::EnterRaffle { amount } => {
                msg!("Instruction: Enter Raffle");
                Self::process_enter_raffle(accounts, amount, program_id)
            }
            RaffleInstruction::CheckUpkeep => {
                msg!("Instruction: Check Upkeep");
                Self::process_check_upkeep(accounts, program_id)
            }
            RaffleInstruction::PerformUpkeep => {
                msg!("Instruction: Perform Upkeep");
                Self::process_perform_upkeep(accounts, program_id)
            }
            RaffleInstruction::FulfillRandomWords {
                request_id,
                random_value,
            } => {
                msg!("Instruction: Fulfill Random Words");
                Self::process_fulfill_random_words(accounts, request_id, random_value, program_id)
            }
        }
    }

    fn process_initialize(
        accounts: &[AccountInfo],
        entrance_fee: u64,
        interval: u64,
        max_players: u32,
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let authority_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let coordinator_info = next_account_info(account_info_iter)?;

        assert_signer(authority_info, "Authority")?;
        assert_writable(raffle_info, "Raffle")?;
        assert_owned_by(raffle_info, program_id)?;

        let required_space = Raffle::space(max_players);
        if raffle_info.data_len() < required_space {
            msg!(
                "Raffle account does not have enough space. Need {} bytes",
                required_space
            );
            return Err(ProgramError::AccountDataTooSmall);
        }

        let rent = Rent::get()?;
        if !rent.is_exempt(raffle_info.lamports(), raffle_info.data_len()) {
            msg!("Raffle account has insufficient funds for rent exemption");
            return Err(ProgramError::AccountNotRentExempt);
        }

        if Raffle::unpack(&raffle_info.data.borrow())?.is_initialized() {
            msg!("Raffle account is already initialized");
            return Err(RaffleError::AlreadyInitialized.into());
        }

        let interval = i64::try_from(interval).map_err(|_| {
            msg!("Interval {} does not fit a timestamp delta", interval);
            RaffleError::InvalidConfig
        })?;

        let clock = Clock::get()?;
        let raffle = Raffle::new(
            *authority_info.key,
            *coordinator_info.key,
            entrance_fee,
            interval,
            max_players,
            clock.unix_timestamp,
        )?;
        raffle.pack(&mut raffle_info.data.borrow_mut())?;

        msg!(
            "Raffle initialized: Authority={}, Coordinator={}, Fee={} SOL, Interval={}s, MaxPlayers={}",
            authority_info.key,
            coordinator_info.key,
            lamports_to_sol(entrance_fee),
            interval,
            max_players
        );
        Ok(())
    }

    fn process_enter_raffle(
        accounts: &[AccountInfo],
        amount: u64,
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let player_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        assert_signer(player_info, "Player")?;
        assert_writable(raffle_info, "Raffle")?;
        assert_owned_by(raffle_info, program_id)?;
        if *system_program_info.key != system_program::id() {
            msg!("Expected the system program");
            return Err(ProgramError::IncorrectProgramId);
        }

        let mut raffle = Raffle::unpack_initialized(&raffle_info.data.borrow())?;
        let event = raffle.enter(*player_info.key, amount)?;

        invoke(
            &system_instruction::transfer(player_info.key, raffle_info.key, amount),
            &[
                player_info.clone(),
                raffle_info.clone(),
                system_program_info.clone(),
            ],
        )?;

        raffle.pack(&mut raffle_info.data.borrow_mut())?;
        event.emit();

        msg!(
            "Players: {}, pot: {} lamports",
            raffle.number_of_players(),
            raffle.balance()
        );
        Ok(())
    }

    fn process_check_upkeep(accounts: &[AccountInfo], program_id: &Pubkey) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let raffle_info = next_account_info(account_info_iter)?;

        assert_owned_by(raffle_info, program_id)?;
        let raffle = Raffle::unpack_initialized(&raffle_info.data.borrow())?;

        let clock = Clock::get()?;
        let upkeep_needed = raffle.check_upkeep(clock.unix_timestamp);
        msg!(
            "Upkeep needed: {} (state={:?}, players={}, pot={})",
            upkeep_needed,
            raffle.raffle_state(),
            raffle.number_of_players(),
            raffle.balance()
        );
        set_return_data(&[upkeep_needed as u8]);
        Ok(())
    }

    fn process_perform_upkeep(accounts: &[AccountInfo], program_id: &Pubkey) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let caller_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;

        // Anyone can trigger the draw; the raffle re-checks eligibility itself
        assert_signer(caller_info, "Caller")?;
        assert_writable(raffle_info, "Raffle")?;
        assert_owned_by(raffle_info, program_id)?;

        let mut raffle = Raffle::unpack_initialized(&raffle_info.data.borrow())?;
        let coordinator = *raffle.coordinator();
        let mut request = OracleRequest {
            raffle: raffle_info.key,
            coordinator: &coordinator,
        };

        let clock = Clock::get()?;
        let event = raffle.perform_upkeep(clock.unix_timestamp, &mut request)?;

        raffle.pack(&mut raffle_info.data.borrow_mut())?;
        event.emit();
        Ok(())
    }

    fn process_fulfill_random_words(
        accounts: &[AccountInfo],
        request_id: u64,
        random_value: u64,
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let coordinator_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let winner_info = next_account_info(account_info_iter)?;

        assert_signer(coordinator_info, "Coordinator")?;
        assert_writable(raffle_info, "Raffle")?;
        assert_owned_by(raffle_info, program_id)?;

        let mut raffle = Raffle::unpack_initialized(&raffle_info.data.borrow())?;

        let rent = Rent::get()?;
        let mut payout = LamportPayout {
            vault: raffle_info,
            recipient: winner_info,
            rent_reserve: rent.minimum_balance(raffle_info.data_len()),
        };

        let clock = Clock::get()?;
        let event = raffle.fulfill_random_words(
            coordinator_info.key,
            request_id,
            random_value,
            clock.unix_timestamp,
            &mut payout,
        )?;

        raffle.pack(&mut raffle_info.data.borrow_mut())?;
        event.emit();
        Ok(())
    }
}
