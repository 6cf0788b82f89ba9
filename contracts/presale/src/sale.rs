use crate::constants::{MAX_EXTENSION, MAX_SALE_DURATION, ROUND_ONE_DURATION, SALE_DURATION};
use crate::errors::Error;
use soroban_sdk::contracttype;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
pub enum SaleKind {
    Standard,
    Escrow,
}

impl SaleKind {
    pub fn other(self) -> SaleKind {
        match self {
            SaleKind::Standard => SaleKind::Escrow,
            SaleKind::Escrow => SaleKind::Standard,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
#[repr(u32)]
pub enum EndReason {
    Scheduled = 0,
    Emergency = 1,
    SupplyExhausted = 2,
    DurationElapsed = 3,
}

/// Timing and round state of one sale run.
///
/// `current_round` is 0 until started, then 1 or 2. Once `ended` is set the
/// instance is terminal.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[contracttype]
pub struct SaleInstance {
    pub start_time: u64,
    pub end_time: u64,
    pub ended: bool,
    pub current_round: u32,
    pub round1_end_time: u64,
    pub round1_tokens_sold: i128,
    pub round2_tokens_sold: i128,
}

impl SaleInstance {
    pub fn is_started(&self) -> bool {
        self.current_round != 0
    }

    /// Started, not ended and inside its window.
    pub fn is_active(&self, now: u64) -> bool {
        self.is_started() && !self.ended && now <= self.end_time
    }

    pub fn start(&mut self, now: u64) -> Result<(), Error> {
        if self.is_started() {
            return Err(Error::AlreadyStarted);
        }

        self.start_time = now;
        self.end_time = now.checked_add(SALE_DURATION).ok_or(Error::Overflow)?;
        self.round1_end_time = now
            .checked_add(ROUND_ONE_DURATION)
            .ok_or(Error::Overflow)?;
        self.current_round = 1;
        Ok(())
    }

    /// Only a live instance may move to round 2; an instance past its window
    /// must not reprice quotes another instance is selling at.
    pub fn advance_round(&mut self, now: u64) -> Result<(), Error> {
        self.require_running()?;
        if now > self.end_time {
            return Err(Error::SaleNotActive);
        }
        if self.current_round != 1 {
            return Err(Error::WrongRound);
        }

        self.current_round = 2;
        self.round1_end_time = now;
        Ok(())
    }

    /// Scheduled end, only once the window has elapsed.
    pub fn finish(&mut self, now: u64) -> Result<(), Error> {
        self.require_running()?;
        if now <= self.end_time {
            return Err(Error::SaleStillRunning);
        }

        self.ended = true;
        Ok(())
    }

    /// Ends immediately. As with `force_end`, the end time never moves later.
    pub fn emergency_end(&mut self, now: u64) -> Result<(), Error> {
        self.require_running()?;

        self.force_end(now);
        Ok(())
    }

    /// Automatic end. The end time never moves later.
    pub fn force_end(&mut self, now: u64) {
        self.ended = true;
        if now < self.end_time {
            self.end_time = now;
        }
    }

    pub fn extend(&mut self, extra: u64) -> Result<(), Error> {
        self.require_running()?;
        if extra == 0 {
            return Err(Error::InvalidParameter);
        }
        if extra > MAX_EXTENSION {
            return Err(Error::ExtensionTooLong);
        }

        let new_end = self.end_time.checked_add(extra).ok_or(Error::Overflow)?;
        let ceiling = self
            .start_time
            .checked_add(MAX_SALE_DURATION)
            .ok_or(Error::Overflow)?;
        if new_end > ceiling {
            return Err(Error::ExtensionTooLong);
        }

        self.end_time = new_end;
        Ok(())
    }

    /// Credit sold tokens to the current round.
    pub fn record_sold(&mut self, tokens: i128) -> Result<(), Error> {
        let counter = match self.current_round {
            1 => &mut self.round1_tokens_sold,
            2 => &mut self.round2_tokens_sold,
            _ => return Err(Error::NotStarted),
        };
        *counter = counter.checked_add(tokens).ok_or(Error::Overflow)?;
        Ok(())
    }

    pub fn tokens_sold(&self) -> i128 {
        self.round1_tokens_sold + self.round2_tokens_sold
    }

    /// Why this instance should end on its own right now, if at all.
    pub fn auto_end_reason(&self, now: u64, minted: i128, max_tokens: i128) -> Option<EndReason> {
        if !self.is_started() || self.ended {
            return None;
        }
        if minted >= max_tokens {
            return Some(EndReason::SupplyExhausted);
        }
        if now.saturating_sub(self.start_time) >= MAX_SALE_DURATION {
            return Some(EndReason::DurationElapsed);
        }
        None
    }

    fn require_running(&self) -> Result<(), Error> {
        if !self.is_started() {
            return Err(Error::NotStarted);
        }
        if self.ended {
            return Err(Error::AlreadyEnded);
        }
        Ok(())
    }
}
