use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::*;

/// Identifies one scheduled tick. Only the most recently issued token is ever accepted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickToken(u64);

/// A tick the host should run after `delay`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScheduledTick {
    pub token: TickToken,
    pub delay: Duration,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Stale token or disabled driver, nothing happened.
    Ignored,
    /// No unrevealed cell is visible, the driver switched itself off.
    Exhausted,
    /// `next` is `None` once the reveal ended the game.
    Revealed {
        coords: Coords,
        report: RevealReport,
        next: Option<ScheduledTick>,
    },
}

/// Bookkeeping for the bot: an on/off flag and a single pending tick slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AutoPlayer {
    enabled: bool,
    pending: Option<TickToken>,
    issued: u64,
}

impl AutoPlayer {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn pending(&self) -> Option<TickToken> {
        self.pending
    }

    /// Returns `true` if the driver was off.
    pub fn start(&mut self) -> bool {
        let started = !self.enabled;
        self.enabled = true;
        started
    }

    /// Switches off and forgets the pending tick. Returns `true` if the driver was on.
    pub fn stop(&mut self) -> bool {
        let stopped = self.enabled;
        self.enabled = false;
        self.pending = None;
        stopped
    }

    /// Issues a fresh token, invalidating any earlier one.
    pub fn arm(&mut self) -> TickToken {
        self.issued += 1;
        let token = TickToken(self.issued);
        self.pending = Some(token);
        token
    }

    /// Consumes the pending slot if `token` is the live one.
    pub fn accept(&mut self, token: TickToken) -> bool {
        if self.enabled && self.pending == Some(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}

/// Uniform choice among `candidates`.
pub fn pick_candidate<R: RandomSource + ?Sized>(
    candidates: &[Coords],
    rng: &mut R,
) -> Option<Coords> {
    if candidates.is_empty() {
        None
    } else {
        Some(candidates[unit_to_index(rng.next_unit(), candidates.len())])
    }
}

/// Uniform delay in `min..max` milliseconds.
pub fn draw_delay<R: RandomSource + ?Sized>(range_ms: (u32, u32), rng: &mut R) -> Duration {
    let (min, max) = range_ms;
    let span = max.saturating_sub(min).max(1);
    let millis = min + unit_to_index(rng.next_unit(), span as usize) as u32;
    Duration::from_millis(millis.into())
}
