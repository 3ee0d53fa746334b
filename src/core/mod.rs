//! Core engine types: sides, entities, RNG, configuration, per-side state.
//!
//! Everything else in the crate builds on these. None of them know about
//! sessions, timers or effects.

pub mod entity;
pub mod side;
pub mod rng;
pub mod config;
pub mod state;

pub use entity::{EntityAllocator, EntityId};
pub use side::{SideId, SideMap};
pub use rng::{GameRng, GameRngState};
pub use config::{ConfigError, EngineConfig, MAX_LIFE, PILLAR_COUNT};
pub use state::Side;
