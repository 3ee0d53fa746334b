//! Session orchestration.
//!
//! - `Session`: owns the state and runs commands and ticks
//! - `SessionBuilder`: charts, decks, config and policy
//! - `Command` / `Event`: the boundary to presentation layers
//! - `SessionSnapshot`: serializable view; `SavedSession`: save format

pub mod builder;
pub mod command;
pub mod controller;
pub mod event;
pub mod snapshot;
pub mod state;

pub use builder::SessionBuilder;
pub use command::{Command, SpecialAction};
pub use controller::Session;
pub use event::{Event, EventBus, SettleTrigger};
pub use snapshot::{
    CardView, EffectView, PersistError, SavedSession, SessionSnapshot, SideView, SlotView,
    SAVE_VERSION,
};
pub use state::{Phase, SessionRngs, SessionState};
