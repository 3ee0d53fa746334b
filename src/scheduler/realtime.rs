//! The fixed-period tick loop.
//!
//! Each tick advances session time and fires due timers. While the clock
//! is not paused it also advances game time, detects cycle boundaries,
//! runs cooldowns down, enforces the priority hold timeout and drives the
//! periodic hooks (auto-draw, neutralization sampling, opponent window).
//! The session reacts to the returned `TickReport`.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{EngineConfig, Side, SideId, SideMap};

use super::clock::{GameClock, PauseReason};
use super::timers::{TimerAction, TimerQueue};

/// What happened during one tick.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Timers that fired, in order.
    pub fired: Vec<TimerAction>,
    /// Game time advanced on this tick.
    pub advanced: bool,
    /// New cycle index if a boundary was crossed.
    pub new_cycle: Option<u32>,
    /// Sides whose cooldown ran out on this tick.
    pub ready: Vec<SideId>,
    /// Holder whose priority expired.
    pub priority_expired: Option<SideId>,
    pub auto_draw: bool,
    pub neutralization_sample: bool,
    pub ai_window: bool,
}

impl TickReport {
    /// Whether anything observable happened.
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.fired.is_empty()
            && self.new_cycle.is_none()
            && self.ready.is_empty()
            && self.priority_expired.is_none()
            && !self.auto_draw
            && !self.neutralization_sample
            && !self.ai_window
    }
}

/// Interval hook driven by accumulated game time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Periodic {
    accumulated_ms: u64,
}

impl Periodic {
    /// Add `ms`; returns true when `interval_ms` has been reached.
    /// A zero interval never fires.
    fn advance(&mut self, ms: u64, interval_ms: u64) -> bool {
        if interval_ms == 0 {
            return false;
        }
        self.accumulated_ms += ms;
        if self.accumulated_ms >= interval_ms {
            self.accumulated_ms -= interval_ms;
            true
        } else {
            false
        }
    }
}

/// Authoritative clock and timer owner.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealtimeScheduler {
    pub clock: GameClock,
    pub timers: TimerQueue,
    auto_draw: Periodic,
    neutralization: Periodic,
    ai_window: Periodic,
}

impl RealtimeScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one tick of `config.tick_ms`.
    pub fn tick(&mut self, config: &EngineConfig, sides: &mut SideMap<Side>) -> TickReport {
        let step = config.tick_ms;
        let mut report = TickReport::default();

        self.clock.advance_session(step);
        report.fired = self.timers.pop_due(self.clock.session_ms());

        if self.clock.paused() {
            return report;
        }
        report.advanced = true;

        report.new_cycle = self.clock.advance_game(step, config.cycle_ms);
        if let Some(cycle) = report.new_cycle {
            trace!(cycle, elapsed_ms = self.clock.elapsed_ms(), "cycle boundary");
        }

        for (id, side) in sides.iter_mut() {
            if side.advance_cooldown(step) {
                report.ready.push(id);
            }
        }

        if self.clock.priority_holder().is_some()
            && self.clock.priority_held_ms() >= config.priority_hold_ms
        {
            report.priority_expired = self.clock.release_priority();
        }

        report.auto_draw = self.auto_draw.advance(step, config.auto_draw_interval_ms);
        report.neutralization_sample = self
            .neutralization
            .advance(step, config.neutralization_sample_ms);
        report.ai_window = self.ai_window.advance(step, config.ai_think_interval_ms);
        report
    }

    /// Put the clock and timers back to session start.
    pub fn reset(&mut self) {
        self.timers.invalidate_all();
        let timers = std::mem::take(&mut self.timers);
        *self = Self { timers, ..Self::default() };
    }

    /// Stop for good: the session has ended.
    pub fn halt(&mut self) {
        self.clock.pause(PauseReason::Ended);
        self.timers.invalidate_all();
    }
}
