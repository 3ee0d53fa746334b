//! Session-owned state.
//!
//! `SessionState` is the single owner of everything that changes during a
//! session. Components borrow from it; none of them keep references.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::battlefield::BattlefieldState;
use crate::bazi::Chart;
use crate::cards::{Card, CardCatalog, CardId};
use crate::core::{EngineConfig, EntityAllocator, GameRng, Side, SideId, SideMap};
use crate::effects::{EffectId, PendingEffect};
use crate::scheduler::RealtimeScheduler;

/// Where the session is in its placement / settlement flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Time runs; sides may place and draw.
    Running,
    /// An effect panel is open.
    EffectPanel,
    /// An effect is being applied.
    Settlement,
    /// A side has won. Only `Restart` is accepted.
    Ended,
}

/// Independent random streams, one per purpose.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionRngs {
    pub shuffle: GameRng,
    pub neutralization: GameRng,
    pub reaction: GameRng,
    pub opponent: GameRng,
}

impl SessionRngs {
    /// Derive every stream from one seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        let root = GameRng::new(seed);
        Self {
            shuffle: root.for_context("shuffle"),
            neutralization: root.for_context("neutralization"),
            reaction: root.for_context("reaction"),
            opponent: root.for_context("opponent"),
        }
    }
}

/// Mutable state of one session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionState {
    pub scheduler: RealtimeScheduler,
    pub sides: SideMap<Side>,
    pub battlefield: BattlefieldState,

    /// Open effect, or the last one settled (kept to reject late calls).
    pub pending: Option<PendingEffect>,

    pub phase: Phase,
    pub winner: Option<SideId>,
    pub rngs: SessionRngs,
    pub entities: EntityAllocator,
    pub next_effect: EffectId,
}

impl SessionState {
    /// Build sides from deck lists, shuffle, and deal starting hands.
    ///
    /// Unknown card ids are skipped; the builder rejects them earlier.
    #[must_use]
    pub fn deal(
        config: &EngineConfig,
        catalog: &CardCatalog,
        charts: &SideMap<Chart>,
        deck_lists: &SideMap<Vec<CardId>>,
        mut rngs: SessionRngs,
    ) -> Self {
        let mut entities = EntityAllocator::default();
        let sides = SideMap::new(|id| {
            let mut deck: Vec<Card> = deck_lists[id]
                .iter()
                .filter_map(|&card| catalog.instantiate(card, &mut entities))
                .collect();
            rngs.shuffle.shuffle(&mut deck);

            let mut side = Side::new(id, charts[id], deck);
            for _ in 0..config.starting_hand {
                if side.draw(config.hand_limit).is_err() {
                    break;
                }
            }
            debug!(side = %id, hand = side.hand.len(), deck = side.deck_count(), "dealt");
            side
        });

        Self {
            scheduler: RealtimeScheduler::new(),
            sides,
            battlefield: BattlefieldState::new(),
            pending: None,
            phase: Phase::Running,
            winner: None,
            rngs,
            entities,
            next_effect: EffectId::new(0),
        }
    }

    /// The effect waiting for allocation, if any.
    #[must_use]
    pub fn open_effect(&self) -> Option<&PendingEffect> {
        self.pending.as_ref().filter(|p| !p.is_settled())
    }

    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.phase == Phase::Ended
    }
}
