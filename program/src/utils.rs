// Account validation shared by the instruction handlers
use solana_program::{
    account_info::AccountInfo, entrypoint::ProgramResult, msg, program_error::ProgramError,
    pubkey::Pubkey,
};

pub fn assert_signer(account: &AccountInfo, role: &str) -> ProgramResult {
    if !account.is_signer {
        msg!("{} must sign the transaction", role);
        return Err(ProgramError::MissingRequiredSignature);
    }
    Ok(())
}

pub fn assert_writable(account: &AccountInfo, role: &str) -> ProgramResult {
    if !account.is_writable {
        msg!("{} account must be writable", role);
        return Err(ProgramError::InvalidAccountData);
    }
    Ok(())
}

pub fn assert_owned_by(account: &AccountInfo, owner: &Pubkey) -> ProgramResult {
    if account.owner != owner {
        msg!("Account {} must be owned by {}", account.key, owner);
        return Err(ProgramError::IncorrectProgramId);
    }
    Ok(())
}

/// Convert lamports to SOL (for display purposes)
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / 1_000_000_000.0
}
