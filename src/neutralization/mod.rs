//! Elemental neutralization of resident cards.

pub mod engine;

pub use engine::{Neutralization, NeutralizationEngine};
