use crate::{
    error::RaffleError,
    events::RaffleEvent,
    payout::PrizeTransfer,
    vrf::{get_random_winner_index, RandomnessCoordinator},
};
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    clock::UnixTimestamp,
    msg,
    program_error::ProgramError,
    program_pack::IsInitialized,
    pubkey::Pubkey,
};

/// Upper bound on `max_players`. Every instruction decodes the full player
/// list onto the 32 KiB program heap, which is never freed, so a full raffle
/// must decode and take one more push well inside that.
pub const MAX_PLAYERS_LIMIT: u32 = 256;

/// Status of the current round
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaffleState {
    /// Accepting entries
    Open,
    /// Draw requested, waiting for the coordinator to deliver randomness
    Calculating,
}

/// Raffle account data
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Raffle {
    is_initialized: bool,
    /// Account that initialized the raffle
    authority: Pubkey,
    /// The only key allowed to deliver randomness
    coordinator: Pubkey,
    /// Minimum paid per entry, in lamports
    entrance_fee: u64,
    /// Seconds that must pass between resolutions before a new draw
    interval: i64,
    /// Capacity of `players`, fixed at initialization
    max_players: u32,
    raffle_state: RaffleState,
    /// Entrants of the current round, in entry order
    players: Vec<Pubkey>,
    /// Lamports collected this round
    balance: u64,
    last_timestamp: UnixTimestamp,
    recent_winner: Option<Pubkey>,
    outstanding_request: Option<u64>,
    /// Requests issued over the raffle's lifetime
    request_nonce: u64,
}

impl IsInitialized for Raffle {
    fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}

impl Raffle {
    /// Serialized size of everything except the player entries
    const FIXED_LEN: usize = 1 // is_initialized
        + 32 // authority
        + 32 // coordinator
        + 8 // entrance_fee
        + 8 // interval
        + 4 // max_players
        + 1 // raffle_state
        + 4 // players length prefix
        + 8 // balance
        + 8 // last_timestamp
        + 1 + 32 // recent_winner
        + 1 + 8 // outstanding_request
        + 8; // request_nonce

    /// Account size needed to hold `max_players` entries
    pub fn space(max_players: u32) -> usize {
        Self::FIXED_LEN + 32 * max_players as usize
    }

    /// A freshly opened raffle. `now` becomes the start of the first interval.
    pub fn new(
        authority: Pubkey,
        coordinator: Pubkey,
        entrance_fee: u64,
        interval: i64,
        max_players: u32,
        now: UnixTimestamp,
    ) -> Result<Self, RaffleError> {
        if entrance_fee == 0 {
            msg!("Entrance fee must be greater than zero");
            return Err(RaffleError::InvalidConfig);
        }
        if interval < 0 {
            msg!("Interval cannot be negative");
            return Err(RaffleError::InvalidConfig);
        }
        if max_players == 0 || max_players > MAX_PLAYERS_LIMIT {
            msg!("Max players must be between 1 and {}", MAX_PLAYERS_LIMIT);
            return Err(RaffleError::InvalidConfig);
        }

        Ok(Self {
            is_initialized: true,
            authority,
            coordinator,
            entrance_fee,
            interval,
            max_players,
            raffle_state: RaffleState::Open,
            players: Vec::new(),
            balance: 0,
            last_timestamp: now,
            recent_winner: None,
            outstanding_request: None,
            request_nonce: 0,
        })
    }

    /// Reads a raffle from account data. A zeroed account decodes as an
    /// uninitialized raffle.
    pub fn unpack(src: &[u8]) -> Result<Self, ProgramError> {
        Self::deserialize(&mut &src[..]).map_err(|_| ProgramError::InvalidAccountData)
    }

    /// Like `unpack`, but rejects accounts that were never initialized
    pub fn unpack_initialized(src: &[u8]) -> Result<Self, ProgramError> {
        let raffle = Self::unpack(src)?;
        if !raffle.is_initialized {
            return Err(RaffleError::NotInitialized.into());
        }
        Ok(raffle)
    }

    pub fn pack(&self, dst: &mut [u8]) -> Result<(), ProgramError> {
        self.serialize(&mut &mut dst[..])
            .map_err(|_| ProgramError::AccountDataTooSmall)
    }

    /// Records a paid entry for `player`.
    pub fn enter(&mut self, player: Pubkey, paid_amount: u64) -> Result<RaffleEvent, RaffleError> {
        if paid_amount < self.entrance_fee {
            msg!(
                "Paid {} lamports, entrance fee is {}",
                paid_amount,
                self.entrance_fee
            );
            return Err(RaffleError::InsufficientPayment);
        }
        if self.raffle_state != RaffleState::Open {
            msg!("Raffle is calculating a winner, entries are closed");
            return Err(RaffleError::RaffleNotOpen);
        }
        if self.players.len() >= self.max_players as usize {
            msg!("Raffle is full ({} players)", self.max_players);
            return Err(RaffleError::RaffleFull);
        }
        let balance = self
            .balance
            .checked_add(paid_amount)
            .ok_or(RaffleError::ArithmeticOverflow)?;

        self.players.push(player);
        self.balance = balance;

        Ok(RaffleEvent::RaffleEnter {
            player,
            amount: paid_amount,
        })
    }

    /// Whether a draw may be triggered at `now`. Never mutates.
    pub fn check_upkeep(&self, now: UnixTimestamp) -> bool {
        let is_open = self.raffle_state == RaffleState::Open;
        let time_passed = now
            .checked_sub(self.last_timestamp)
            .map_or(false, |elapsed| elapsed >= self.interval);
        let has_players = !self.players.is_empty();
        let has_balance = self.balance > 0;
        is_open && time_passed && has_players && has_balance
    }

    /// Locks the round and asks the coordinator for randomness.
    ///
    /// Eligibility is re-checked here; a probe that said "yes" earlier does
    /// not carry over. Nothing changes if the coordinator refuses.
    pub fn perform_upkeep<C: RandomnessCoordinator>(
        &mut self,
        now: UnixTimestamp,
        coordinator: &mut C,
    ) -> Result<RaffleEvent, RaffleError> {
        if self.raffle_state != RaffleState::Open {
            msg!("A draw is already in flight");
            return Err(RaffleError::RaffleNotOpen);
        }
        if !self.check_upkeep(now) {
            msg!(
                "Upkeep not needed: balance={} players={} state={:?} elapsed={}",
                self.balance,
                self.players.len(),
                self.raffle_state,
                now.saturating_sub(self.last_timestamp)
            );
            return Err(RaffleError::UpkeepNotNeeded);
        }

        let request_id = coordinator.request_random_words(self.request_nonce)?;

        self.request_nonce = self.request_nonce.saturating_add(1);
        self.outstanding_request = Some(request_id);
        self.raffle_state = RaffleState::Calculating;

        Ok(RaffleEvent::RequestedRaffleWinner { request_id })
    }

    /// Settles the round with the coordinator's random value.
    ///
    /// The pot is paid before anything is reset, so a failed payout leaves
    /// the round exactly as it was, still waiting on `request_id`.
    pub fn fulfill_random_words<P: PrizeTransfer>(
        &mut self,
        caller: &Pubkey,
        request_id: u64,
        random_value: u64,
        now: UnixTimestamp,
        payout: &mut P,
    ) -> Result<RaffleEvent, RaffleError> {
        if *caller != self.coordinator {
            msg!("{} is not the coordinator of this raffle", caller);
            return Err(RaffleError::OnlyCoordinatorCanFulfill);
        }
        if self.outstanding_request != Some(request_id) {
            msg!(
                "Request {} is not outstanding (outstanding: {:?})",
                request_id,
                self.outstanding_request
            );
            return Err(RaffleError::UnknownRequest);
        }

        let winner = self.winner_for(random_value)?;
        let amount = self.balance;
        payout.transfer(&winner, amount)?;

        self.recent_winner = Some(winner);
        self.players.clear();
        self.balance = 0;
        self.last_timestamp = now;
        self.outstanding_request = None;
        self.raffle_state = RaffleState::Open;

        Ok(RaffleEvent::WinnerPicked { winner, amount })
    }

    /// The entrant `random_value` selects in the current round.
    pub fn winner_for(&self, random_value: u64) -> Result<Pubkey, RaffleError> {
        let index = get_random_winner_index(random_value, self.players.len() as u64)
            .ok_or(RaffleError::NoPlayers)?;
        self.players
            .get(index as usize)
            .copied()
            .ok_or(RaffleError::NoPlayers)
    }

    pub fn authority(&self) -> &Pubkey {
        &self.authority
    }

    pub fn coordinator(&self) -> &Pubkey {
        &self.coordinator
    }

    pub fn entrance_fee(&self) -> u64 {
        self.entrance_fee
    }

    pub fn interval(&self) -> i64 {
        self.interval
    }

    pub fn max_players(&self) -> u32 {
        self.max_players
    }

    pub fn raffle_state(&self) -> RaffleState {
        self.raffle_state
    }

    pub fn player(&self, index: usize) -> Option<&Pubkey> {
        self.players.get(index)
    }

    pub fn number_of_players(&self) -> usize {
        self.players.len()
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn latest_timestamp(&self) -> UnixTimestamp {
        self.last_timestamp
    }

    pub fn recent_winner(&self) -> Option<&Pubkey> {
        self.recent_winner.as_ref()
    }

    pub fn outstanding_request(&self) -> Option<u64> {
        self.outstanding_request
    }

    pub fn request_nonce(&self) -> u64 {
        self.request_nonce
    }
}
