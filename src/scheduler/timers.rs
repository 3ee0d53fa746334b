//! Scheduled actions.
//!
//! Delayed work (discards after neutralization, buff markers, effect
//! deadlines) is stored as `(fire_at, action)` entries and fired by the
//! scheduler tick, so a session replays exactly without wall-clock timers.

use serde::{Deserialize, Serialize};

use crate::core::EntityId;
use crate::effects::EffectId;

/// Work a timer performs when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerAction {
    /// Move a neutralized card to its owner's discard.
    DiscardCard { slot: u8, entity: EntityId },
    /// Drop a buff marker.
    ClearBuff { slot: u8, entity: EntityId },
    /// Auto-resolve an effect nobody confirmed.
    EffectDeadline(EffectId),
}

/// Scheduling order, used to break ties between timers due together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
struct TimerId(u64);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct Timer {
    id: TimerId,
    fire_at_ms: u64,
    epoch: u32,
    action: TimerAction,
}

/// Pending timers ordered by fire time, then by scheduling order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerQueue {
    timers: Vec<Timer>,
    next_id: u64,
    epoch: u32,
}

impl TimerQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` at session time `fire_at_ms`.
    pub fn schedule(&mut self, fire_at_ms: u64, action: TimerAction) {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer { id, fire_at_ms, epoch: self.epoch, action });
    }

    /// Cancel every timer whose action matches.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&TimerAction) -> bool) -> usize {
        let before = self.timers.len();
        self.timers.retain(|t| !pred(&t.action));
        before - self.timers.len()
    }

    /// Remove and return the actions due at `now_ms`, in firing order.
    pub fn pop_due(&mut self, now_ms: u64) -> Vec<TimerAction> {
        let epoch = self.epoch;
        let mut due: Vec<Timer> = Vec::new();
        self.timers.retain(|t| {
            if t.fire_at_ms <= now_ms {
                due.push(t.clone());
                false
            } else {
                true
            }
        });
        due.sort_by_key(|t| (t.fire_at_ms, t.id));
        due.into_iter()
            .filter(|t| t.epoch == epoch)
            .map(|t| t.action)
            .collect()
    }

    /// Drop every pending timer. Anything scheduled before this call can
    /// never fire.
    pub fn invalidate_all(&mut self) {
        self.timers.clear();
        self.epoch += 1;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
