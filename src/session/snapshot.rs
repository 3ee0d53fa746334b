//! Read-only views of a session and the save format.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::OpponentConfig;
use crate::battlefield::SLOT_COUNT;
use crate::bazi::{Chart, Element, ElementCounts};
use crate::cards::{Card, CardCategory, CardId};
use crate::core::{ConfigError, EngineConfig, EntityId, SideId, SideMap};
use crate::effects::{ActionKind, EffectId, PendingEffect, Target, TargetId};
use crate::life::LifeElementEngine;
use crate::scheduler::PauseReason;

use super::state::{Phase, SessionState};

/// Save format version written by `Session::save`.
pub const SAVE_VERSION: u32 = 1;

/// Public facts about one card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub entity: EntityId,
    pub card_id: CardId,
    pub name: String,
    pub category: CardCategory,
    pub element: Element,
    pub power: u32,
    pub life_elements: u32,
    pub max_life_elements: u32,
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        Self {
            entity: card.entity,
            card_id: card.card_id,
            name: card.name.clone(),
            category: card.category,
            element: card.element,
            power: card.power,
            life_elements: card.current_life_elements(),
            max_life_elements: card.max_life_elements(),
        }
    }
}

/// One side at a point in time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideView {
    pub remaining_life: u32,
    pub hand: Vec<CardView>,
    pub deck_count: u32,
    pub discard_count: u32,
    pub cooldown_ms: u64,
    pub can_act: bool,
    /// Life elements held by the side's active field cards.
    pub life_elements: ElementCounts,
}

/// One occupied slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotView {
    pub slot: u8,
    pub owner: SideId,
    pub card: CardView,
    pub neutralized: bool,
    pub buffed: bool,
}

/// The open or just-settled effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectView {
    pub id: EffectId,
    pub card: EntityId,
    pub actor: SideId,
    pub action: ActionKind,
    pub power: u32,
    pub targets: Vec<Target>,
    pub allocations: Vec<(TargetId, u32)>,
    pub remaining: u32,
    pub deadline_ms: u64,
    pub settled: bool,
}

impl From<&PendingEffect> for EffectView {
    fn from(pending: &PendingEffect) -> Self {
        Self {
            id: pending.id,
            card: pending.source.entity,
            actor: pending.actor,
            action: pending.action,
            power: pending.power(),
            targets: pending.targets.clone(),
            allocations: pending.allocation_plan(),
            remaining: pending.remaining(),
            deadline_ms: pending.deadline_ms,
            settled: pending.is_settled(),
        }
    }
}

/// Everything a presentation layer needs to draw the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub winner: Option<SideId>,
    pub elapsed_ms: u64,
    pub session_ms: u64,
    pub cycle_index: u32,
    pub priority: Option<SideId>,
    pub pause_reason: Option<PauseReason>,
    pub sides: SideMap<SideView>,
    pub slots: Vec<SlotView>,
    pub effect: Option<EffectView>,
}

impl SessionSnapshot {
    /// Capture the current state.
    #[must_use]
    pub fn capture(state: &SessionState) -> Self {
        let clock = &state.scheduler.clock;
        let sides = state.sides.map(|id, side| SideView {
            remaining_life: side.remaining_life(),
            hand: side.hand.iter().map(CardView::from).collect(),
            deck_count: side.deck_count(),
            discard_count: side.discard.len() as u32,
            cooldown_ms: side.cooldown_ms(),
            can_act: side.can_act(),
            life_elements: LifeElementEngine::tally(&state.battlefield, id),
        });
        let slots = state
            .battlefield
            .occupied()
            .map(|(slot, placed)| SlotView {
                slot,
                owner: placed.owner,
                card: CardView::from(&placed.card),
                neutralized: placed.neutralized,
                buffed: placed.buffed,
            })
            .collect::<Vec<_>>();
        debug_assert!(slots.len() <= SLOT_COUNT);

        Self {
            phase: state.phase,
            winner: state.winner,
            elapsed_ms: clock.elapsed_ms(),
            session_ms: clock.session_ms(),
            cycle_index: clock.cycle_index(),
            priority: clock.priority_holder(),
            pause_reason: clock.pause_reason(),
            sides,
            slots,
            effect: state.pending.as_ref().map(EffectView::from),
        }
    }

    /// Life of one side.
    #[must_use]
    pub fn life(&self, side: SideId) -> u32 {
        self.sides[side].remaining_life
    }
}

/// Errors from saving or resuming a session.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("save data could not be encoded or decoded: {0}")]
    Codec(#[from] bincode::Error),

    #[error("save version {found} is not supported (expected {expected})")]
    Version { found: u32, expected: u32 },

    #[error("saved configuration is invalid: {0}")]
    Config(#[from] ConfigError),
}

/// Everything needed to continue a session, except the card catalog and
/// the opponent policy object.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SavedSession {
    pub version: u32,
    pub config: EngineConfig,
    pub opponent: OpponentConfig,
    pub charts: SideMap<Chart>,
    pub deck_lists: SideMap<Vec<CardId>>,
    pub state: SessionState,
}

impl SavedSession {
    /// Encode with bincode.
    pub fn encode(&self) -> Result<Vec<u8>, PersistError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode and check the version.
    pub fn decode(bytes: &[u8]) -> Result<Self, PersistError> {
        let saved: SavedSession = bincode::deserialize(bytes)?;
        if saved.version != SAVE_VERSION {
            return Err(PersistError::Version {
                found: saved.version,
                expected: SAVE_VERSION,
            });
        }
        saved.config.validate()?;
        Ok(saved)
    }
}
