//! Per-side state.
//!
//! A `Side` exists for the whole session: its chart never changes, its
//! life pool stays within `0..=MAX_LIFE`, and its cards move between deck,
//! hand, battlefield and discard.
//!
//! Hand, deck and discard use `im` persistent vectors so snapshots and
//! saves clone them in O(1).

use im::Vector;
use serde::{Deserialize, Serialize};

use super::config::MAX_LIFE;
use super::entity::EntityId;
use super::side::SideId;
use crate::bazi::Chart;
use crate::cards::Card;
use crate::error::EngineError;

/// One party's state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Side {
    /// Which side this is.
    pub id: SideId,

    /// Birth chart, immutable for the session.
    pub chart: Chart,

    remaining_life: u32,

    /// Cards in hand, oldest first.
    pub hand: Vector<Card>,

    /// Draw pile, top card first.
    pub deck: Vector<Card>,

    /// Discard pile, most recent last.
    pub discard: Vector<Card>,

    cooldown_ms: u64,
    can_act: bool,
}

impl Side {
    /// Create a side at full life with an empty hand.
    #[must_use]
    pub fn new(id: SideId, chart: Chart, deck: impl IntoIterator<Item = Card>) -> Self {
        Self {
            id,
            chart,
            remaining_life: MAX_LIFE,
            hand: Vector::new(),
            deck: deck.into_iter().collect(),
            discard: Vector::new(),
            cooldown_ms: 0,
            can_act: true,
        }
    }

    // === Life ===

    /// Current life, always within `0..=MAX_LIFE`.
    #[must_use]
    pub fn remaining_life(&self) -> u32 {
        self.remaining_life
    }

    /// Subtract life, flooring at zero. Returns the amount removed.
    pub fn damage(&mut self, amount: u32) -> u32 {
        let applied = amount.min(self.remaining_life);
        self.remaining_life -= applied;
        applied
    }

    /// Add life, capped at `MAX_LIFE`. Returns the amount added.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let applied = amount.min(MAX_LIFE - self.remaining_life);
        self.remaining_life += applied;
        applied
    }

    /// Whether the life pool is empty.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.remaining_life == 0
    }

    // === Cooldown ===

    /// Remaining cooldown in seconds.
    #[must_use]
    pub fn cooldown_remaining(&self) -> f64 {
        self.cooldown_ms as f64 / 1000.0
    }

    /// Remaining cooldown in milliseconds.
    #[must_use]
    pub fn cooldown_ms(&self) -> u64 {
        self.cooldown_ms
    }

    /// Whether the side may place or draw.
    #[must_use]
    pub fn can_act(&self) -> bool {
        self.can_act
    }

    /// Start a cooldown.
    pub fn set_cooldown(&mut self, ms: u64) {
        self.cooldown_ms = ms;
        self.can_act = ms == 0;
    }

    /// Advance the cooldown by `ms`, flooring at zero.
    /// Returns true if this call made the side able to act again.
    pub fn advance_cooldown(&mut self, ms: u64) -> bool {
        let was_blocked = !self.can_act;
        self.cooldown_ms = self.cooldown_ms.saturating_sub(ms);
        self.can_act = self.cooldown_ms == 0;
        was_blocked && self.can_act
    }

    // === Cards ===

    /// Cards left in the draw pile.
    #[must_use]
    pub fn deck_count(&self) -> u32 {
        self.deck.len() as u32
    }

    /// Find a card in hand.
    #[must_use]
    pub fn hand_card(&self, entity: EntityId) -> Option<&Card> {
        self.hand.iter().find(|c| c.entity == entity)
    }

    /// Remove a card from hand.
    pub fn take_from_hand(&mut self, entity: EntityId) -> Option<Card> {
        let index = self.hand.iter().position(|c| c.entity == entity)?;
        Some(self.hand.remove(index))
    }

    /// Remove the hand card at `index`.
    pub fn take_hand_index(&mut self, index: usize) -> Option<Card> {
        (index < self.hand.len()).then(|| self.hand.remove(index))
    }

    /// Whether another draw is possible under `hand_limit`.
    #[must_use]
    pub fn can_draw(&self, hand_limit: usize) -> bool {
        self.hand.len() < hand_limit && !self.deck.is_empty()
    }

    /// Move the top card of the deck into the hand.
    pub fn draw(&mut self, hand_limit: usize) -> Result<EntityId, EngineError> {
        if self.hand.len() >= hand_limit {
            return Err(EngineError::HandFull(self.id));
        }
        let card = self.deck.pop_front().ok_or(EngineError::DeckEmpty(self.id))?;
        let entity = card.entity;
        self.hand.push_back(card);
        Ok(entity)
    }

    /// Put a card on the discard pile.
    pub fn discard(&mut self, card: Card) {
        self.discard.push_back(card);
    }
}
