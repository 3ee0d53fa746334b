//! Session clock, priority token and pause state.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::SideId;

/// Why the clock is paused. Several reasons can hold at once; the clock
/// runs again only when all of them are lifted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauseReason {
    /// An effect panel is waiting for its allocation.
    EffectPanel,
    /// Paused from outside the engine.
    External,
    /// The session is over.
    Ended,
}

/// Model time of a session.
///
/// `session_ms` always advances and drives timers. `elapsed_ms` is game
/// time: it only advances while the clock is not paused, and cycles are
/// derived from it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameClock {
    elapsed_ms: u64,
    session_ms: u64,
    cycle_index: u32,
    priority: Option<SideId>,
    priority_since_ms: u64,
    pauses: SmallVec<[PauseReason; 2]>,
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl GameClock {
    /// A clock at zero, cycle 1, unpaused, nobody holding priority.
    #[must_use]
    pub fn new() -> Self {
        Self {
            elapsed_ms: 0,
            session_ms: 0,
            cycle_index: 1,
            priority: None,
            priority_since_ms: 0,
            pauses: SmallVec::new(),
        }
    }

    /// Game time in seconds.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.elapsed_ms as f64 / 1000.0
    }

    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Time since session start, pauses included.
    #[must_use]
    pub fn session_ms(&self) -> u64 {
        self.session_ms
    }

    /// Current cycle, starting at 1.
    #[must_use]
    pub fn cycle_index(&self) -> u32 {
        self.cycle_index
    }

    // === Pause ===

    #[must_use]
    pub fn paused(&self) -> bool {
        !self.pauses.is_empty()
    }

    /// Most recent reason still holding the clock.
    #[must_use]
    pub fn pause_reason(&self) -> Option<PauseReason> {
        self.pauses.last().copied()
    }

    #[must_use]
    pub fn is_paused_for(&self, reason: PauseReason) -> bool {
        self.pauses.contains(&reason)
    }

    /// Add a pause reason. Returns true if the clock was running before.
    pub fn pause(&mut self, reason: PauseReason) -> bool {
        let was_running = !self.paused();
        if !self.pauses.contains(&reason) {
            self.pauses.push(reason);
        }
        was_running
    }

    /// Lift a pause reason. Returns true if the clock runs again.
    pub fn resume(&mut self, reason: PauseReason) -> bool {
        let before = self.pauses.len();
        self.pauses.retain(|r| *r != reason);
        before != self.pauses.len() && !self.paused()
    }

    // === Priority ===

    /// Side holding the priority token.
    #[must_use]
    pub fn priority_holder(&self) -> Option<SideId> {
        self.priority
    }

    /// Give the token to `side` if nobody holds it. Returns true on grant.
    pub fn grant_priority(&mut self, side: SideId) -> bool {
        if self.priority.is_some() {
            return false;
        }
        self.priority = Some(side);
        self.priority_since_ms = self.elapsed_ms;
        true
    }

    /// Drop the token. Returns the previous holder.
    pub fn release_priority(&mut self) -> Option<SideId> {
        self.priority.take()
    }

    /// Game time the current holder has kept the token.
    #[must_use]
    pub fn priority_held_ms(&self) -> u64 {
        match self.priority {
            Some(_) => self.elapsed_ms - self.priority_since_ms,
            None => 0,
        }
    }

    // === Time ===

    pub(crate) fn advance_session(&mut self, ms: u64) {
        self.session_ms += ms;
    }

    /// Advance game time. Returns the new cycle index if a boundary was
    /// crossed.
    pub(crate) fn advance_game(&mut self, ms: u64, cycle_ms: u64) -> Option<u32> {
        self.elapsed_ms += ms;
        let cycle = (self.elapsed_ms / cycle_ms.max(1)) as u32 + 1;
        if cycle != self.cycle_index {
            self.cycle_index = cycle;
            Some(cycle)
        } else {
            None
        }
    }
}
