//! The shared battlefield.
//!
//! - `slot`: Slot layout and `PlacedCard`
//! - `state`: `BattlefieldState` occupancy and transient flags

pub mod slot;
pub mod state;

pub use slot::{row, row_owner, PlacedCard, ROW_SIZE, SLOT_COUNT};
pub use state::BattlefieldState;
