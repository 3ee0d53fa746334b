//! Recoverable engine errors.
//!
//! Every variant is returned to the caller for user-facing messaging; none
//! of them leaves the engine in a broken state. Broken internal invariants
//! are assertions, not errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{EntityId, SideId};
use crate::effects::{ActionKind, TargetId};

/// Why a side may not act right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockReason {
    /// The side's cooldown is still running.
    Cooldown,
    /// An effect panel is open and must settle first.
    EffectPending,
    /// The session is over.
    SessionEnded,
    /// The action needs the priority token.
    NoPriority,
}

impl std::fmt::Display for BlockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            BlockReason::Cooldown => "cooldown running",
            BlockReason::EffectPending => "an effect is pending",
            BlockReason::SessionEnded => "the session has ended",
            BlockReason::NoPriority => "priority is not held",
        };
        f.write_str(text)
    }
}

/// Errors returned by engine operations.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum EngineError {
    #[error("slot {slot} is already occupied")]
    SlotOccupied { slot: u8 },

    #[error("{side} cannot act: {reason}")]
    ActionBlocked { side: SideId, reason: BlockReason },

    #[error("{0} is not a candidate target")]
    InvalidTarget(TargetId),

    #[error("{0} was neutralized after targets were collected")]
    AlreadyNeutralized(TargetId),

    #[error("{target} is on the wrong side for {action}")]
    WrongSideForAction { target: TargetId, action: ActionKind },

    #[error("allocating {requested} exceeds the remaining power {remaining}")]
    OverAllocation { requested: u32, remaining: u32 },

    #[error("the effect has already settled")]
    EffectAlreadySettled,

    #[error("{0}'s deck is empty")]
    DeckEmpty(SideId),

    #[error("{0}'s hand is full")]
    HandFull(SideId),

    #[error("slot {slot} is not in {side}'s row")]
    InvalidSlot { side: SideId, slot: u8 },

    #[error("{card} is not in {side}'s hand")]
    CardNotInHand { side: SideId, card: EntityId },

    #[error("no effect is pending")]
    NoPendingEffect,

    #[error("unknown special action `{0}`")]
    UnknownSpecialAction(String),
}

impl EngineError {
    /// Shorthand for `ActionBlocked`.
    #[must_use]
    pub fn blocked(side: SideId, reason: BlockReason) -> Self {
        Self::ActionBlocked { side, reason }
    }
}
