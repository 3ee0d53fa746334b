//! Real-time pacing: clock, priority, pause state and timers.

pub mod clock;
pub mod timers;
pub mod realtime;

pub use clock::{GameClock, PauseReason};
pub use timers::{TimerAction, TimerQueue};
pub use realtime::{RealtimeScheduler, TickReport};
