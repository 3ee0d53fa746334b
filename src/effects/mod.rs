//! Effect panel: targets, allocations and resolution.
//!
//! Placing a card opens a `PendingEffect`:
//! - `TargetResolver`: enumerates and validates candidate targets
//! - `EffectResolver`: accepts allocations and applies the final plan
//!
//! Both are stateless and operate on state owned by the session.

mod pending;
mod targeting;
mod resolver;

pub use pending::{ActionKind, EffectId, PendingEffect, Target, TargetId, TargetKind};
pub use targeting::TargetResolver;
pub use resolver::{EffectResolver, LifeChange, ResolutionReport};
