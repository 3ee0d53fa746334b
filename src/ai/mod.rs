//! Opponent decision-making.
//!
//! - `OpponentPolicy`: trait for anything that picks the opponent's move
//! - `RuleBasedOpponent`: the default threshold policy
//! - `OpponentConfig`: its tunables

pub mod config;
pub mod policy;

pub use config::OpponentConfig;
pub use policy::{AiAction, AiView, HandCard, OpponentPolicy, RuleBasedOpponent};
