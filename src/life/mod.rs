//! Life elements: card-local resource pools charged by chart conditions.

pub mod engine;

pub use engine::{CycleOutcome, LifeElementEngine};
