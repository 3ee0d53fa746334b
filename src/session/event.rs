//! Events emitted by a session.
//!
//! The engine never calls into presentation code. Everything observable
//! is pushed onto an `EventBus` that the caller drains.

use serde::{Deserialize, Serialize};

use crate::ai::AiAction;
use crate::bazi::Element;
use crate::cards::CardId;
use crate::core::{EntityId, SideId};
use crate::effects::{ActionKind, EffectId, Target, TargetId};
use crate::error::EngineError;
use crate::scheduler::PauseReason;

use super::command::Command;
use super::snapshot::SessionSnapshot;

/// How a pending effect came to be resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettleTrigger {
    /// `ConfirmEffect` was received.
    Confirmed,
    /// The deadline passed.
    Deadline,
    /// Opponent effects settle as soon as they open.
    Immediate,
}

/// Something that happened inside the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    StateChanged(Box<SessionSnapshot>),
    CardDrawn {
        side: SideId,
        card: EntityId,
    },
    CardPlaced {
        side: SideId,
        slot: u8,
        card: EntityId,
        card_id: CardId,
        /// Appear conditions held and the card charged.
        charged: bool,
    },
    EffectPanelOpened {
        effect: EffectId,
        card: EntityId,
        action: ActionKind,
        targets: Vec<Target>,
        deadline_ms: u64,
    },
    AllocationChanged {
        effect: EffectId,
        target: TargetId,
        value: u32,
        remaining: u32,
    },
    EffectResolved {
        effect: EffectId,
        trigger: SettleTrigger,
        /// The plan came from the automatic fallback.
        auto: bool,
        allocations: Vec<(TargetId, u32)>,
    },
    EffectPanelClosed {
        effect: EffectId,
    },
    CardNeutralized {
        slot: u8,
        card: EntityId,
        /// Overcoming element, or `None` when an effect did it.
        by: Option<Element>,
    },
    CardDiscarded {
        card: EntityId,
        owner: SideId,
    },
    CardBurnedOut {
        slot: u8,
        card: EntityId,
    },
    LifeChanged {
        side: SideId,
        before: u32,
        after: u32,
    },
    PriorityChanged {
        holder: Option<SideId>,
    },
    CycleStarted {
        cycle: u32,
    },
    ReactionWindow {
        side: SideId,
    },
    OpponentActed {
        action: AiAction,
    },
    Paused {
        reason: PauseReason,
    },
    Resumed,
    CommandRejected {
        command: Command,
        error: EngineError,
    },
    SessionEnded {
        winner: SideId,
    },
    SessionRestarted,
    /// Forwarded from the asset layer unchanged.
    LoadingProgress {
        loaded: u32,
        total: u32,
    },
}

/// FIFO of events waiting to be drained.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
