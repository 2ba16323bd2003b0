use crate::error::RaffleError;
use solana_program::{account_info::AccountInfo, msg, pubkey::Pubkey};

/// Settlement of the pot to the drawn winner.
///
/// Must either move the full `amount` or fail without side effects; the
/// resolution handler only resets the round after this returns `Ok`.
pub trait PrizeTransfer {
    fn transfer(&mut self, winner: &Pubkey, amount: u64) -> Result<(), RaffleError>;
}

/// Moves lamports out of the program-owned raffle account into the winner's
/// account, never dipping into the raffle's rent-exempt reserve.
pub struct LamportPayout<'a, 'info> {
    pub vault: &'a AccountInfo<'info>,
    pub recipient: &'a AccountInfo<'info>,
    pub rent_reserve: u64,
}

impl<'a, 'info> PrizeTransfer for LamportPayout<'a, 'info> {
    fn transfer(&mut self, winner: &Pubkey, amount: u64) -> Result<(), RaffleError> {
        if self.recipient.key != winner {
            msg!(
                "Recipient {} is not the drawn winner {}",
                self.recipient.key,
                winner
            );
            return Err(RaffleError::WinnerAccountMismatch);
        }
        if !self.recipient.is_writable {
            msg!("Winner account must be writable");
            return Err(RaffleError::TransferFailed);
        }

        let remaining = self
            .vault
            .lamports()
            .checked_sub(amount)
            .filter(|remaining| *remaining >= self.rent_reserve)
            .ok_or_else(|| {
                msg!(
                    "Raffle account holds {} lamports, cannot pay {} and keep {} reserved",
                    self.vault.lamports(),
                    amount,
                    self.rent_reserve
                );
                RaffleError::TransferFailed
            })?;

        **self
            .vault
            .try_borrow_mut_lamports()
            .map_err(|_| RaffleError::TransferFailed)? = remaining;

        let credited = match self.recipient.lamports().checked_add(amount) {
            Some(credited) => credited,
            None => {
                // undo the debit so the caller sees no side effect
                **self
                    .vault
                    .try_borrow_mut_lamports()
                    .map_err(|_| RaffleError::TransferFailed)? += amount;
                return Err(RaffleError::TransferFailed);
            }
        };
        **self
            .recipient
            .try_borrow_mut_lamports()
            .map_err(|_| RaffleError::TransferFailed)? = credited;

        msg!("Paid {} lamports to {}", amount, winner);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account<'a>(
        key: &'a Pubkey,
        owner: &'a Pubkey,
        lamports: &'a mut u64,
        data: &'a mut [u8],
        is_writable: bool,
    ) -> AccountInfo<'a> {
        AccountInfo::new(key, false, is_writable, lamports, data, owner, false, 0)
    }

    #[test]
    fn pays_pot_and_keeps_reserve() {
        let program_id = Pubkey::new_unique();
        let vault_key = Pubkey::new_unique();
        let winner_key = Pubkey::new_unique();
        let system = solana_program::system_program::id();
        let mut vault_lamports = 1_000 + 40;
        let mut winner_lamports = 5;
        let mut vault_data = [0u8; 4];
        let mut winner_data = [0u8; 0];
        let vault = account(&vault_key, &program_id, &mut vault_lamports, &mut vault_data, true);
        let recipient = account(&winner_key, &system, &mut winner_lamports, &mut winner_data, true);

        let mut payout = LamportPayout {
            vault: &vault,
            recipient: &recipient,
            rent_reserve: 1_000,
        };
        assert_eq!(payout.transfer(&winner_key, 40), Ok(()));
        assert_eq!(vault.lamports(), 1_000);
        assert_eq!(recipient.lamports(), 45);
    }

    #[test]
    fn refuses_to_touch_reserve() {
        let program_id = Pubkey::new_unique();
        let vault_key = Pubkey::new_unique();
        let winner_key = Pubkey::new_unique();
        let system = solana_program::system_program::id();
        let mut vault_lamports = 1_010;
        let mut winner_lamports = 0;
        let mut vault_data = [0u8; 4];
        let mut winner_data = [0u8; 0];
        let vault = account(&vault_key, &program_id, &mut vault_lamports, &mut vault_data, true);
        let recipient = account(&winner_key, &system, &mut winner_lamports, &mut winner_data, true);

        let mut payout = LamportPayout {
            vault: &vault,
            recipient: &recipient,
            rent_reserve: 1_000,
        };
        assert_eq!(
            payout.transfer(&winner_key, 40),
            Err(RaffleError::TransferFailed)
        );
        assert_eq!(vault.lamports(), 1_010);
        assert_eq!(recipient.lamports(), 0);
    }

    #[test]
    fn rejects_wrong_or_readonly_recipient() {
        let program_id = Pubkey::new_unique();
        let vault_key = Pubkey::new_unique();
        let winner_key = Pubkey::new_unique();
        let system = solana_program::system_program::id();
        let mut vault_lamports = 2_000;
        let mut winner_lamports = 0;
        let mut vault_data = [0u8; 4];
        let mut winner_data = [0u8; 0];
        let vault = account(&vault_key, &program_id, &mut vault_lamports, &mut vault_data, true);
        let recipient = account(&winner_key, &system, &mut winner_lamports, &mut winner_data, false);

        let mut payout = LamportPayout {
            vault: &vault,
            recipient: &recipient,
            rent_reserve: 1_000,
        };
        assert_eq!(
            payout.transfer(&Pubkey::new_unique(), 40),
            Err(RaffleError::WinnerAccountMismatch)
        );
        assert_eq!(
            payout.transfer(&winner_key, 40),
            Err(RaffleError::TransferFailed)
        );
        assert_eq!(vault.lamports(), 2_000);
    }
}
