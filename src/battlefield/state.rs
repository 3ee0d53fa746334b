//! Battlefield occupancy.
//!
//! `BattlefieldState` owns the eight slots. It enforces occupancy and the
//! one-slot-per-card invariant; placement legality that depends on the
//! placing side (cooldown, row, hand) is checked by the session.

use serde::{Deserialize, Serialize};

use super::slot::{PlacedCard, SLOT_COUNT};
use crate::core::{EntityId, SideId};
use crate::error::EngineError;

/// The shared 8-slot battlefield.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattlefieldState {
    slots: [Option<PlacedCard>; SLOT_COUNT],
}

impl BattlefieldState {
    /// Create an empty battlefield.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Card in a slot. Out-of-range slots read as empty.
    #[must_use]
    pub fn get(&self, slot: u8) -> Option<&PlacedCard> {
        self.slots.get(slot as usize).and_then(Option::as_ref)
    }

    /// Mutable card in a slot.
    pub fn get_mut(&mut self, slot: u8) -> Option<&mut PlacedCard> {
        self.slots.get_mut(slot as usize).and_then(Option::as_mut)
    }

    /// Card in `slot` if it is still the given entity.
    #[must_use]
    pub fn get_entity(&self, slot: u8, entity: EntityId) -> Option<&PlacedCard> {
        self.get(slot).filter(|p| p.card.entity == entity)
    }

    /// Mutable card in `slot` if it is still the given entity.
    pub fn get_entity_mut(&mut self, slot: u8, entity: EntityId) -> Option<&mut PlacedCard> {
        self.get_mut(slot).filter(|p| p.card.entity == entity)
    }

    /// Whether a slot holds a card.
    #[must_use]
    pub fn is_occupied(&self, slot: u8) -> bool {
        self.get(slot).is_some()
    }

    /// Put a card into an empty slot.
    ///
    /// Panics if the slot index is out of range or the card already sits in
    /// another slot.
    pub fn occupy(&mut self, slot: u8, placed: PlacedCard) -> Result<(), EngineError> {
        assert!((slot as usize) < SLOT_COUNT, "slot {slot} is out of range");
        if self.is_occupied(slot) {
            return Err(EngineError::SlotOccupied { slot });
        }
        assert!(
            self.find_entity(placed.card.entity).is_none(),
            "{} is already on the battlefield",
            placed.card.entity
        );
        self.slots[slot as usize] = Some(placed);
        Ok(())
    }

    /// Empty a slot, returning its card.
    pub fn remove(&mut self, slot: u8) -> Option<PlacedCard> {
        self.slots.get_mut(slot as usize).and_then(Option::take)
    }

    /// Slot holding an entity.
    #[must_use]
    pub fn find_entity(&self, entity: EntityId) -> Option<u8> {
        self.occupied()
            .find(|(_, p)| p.card.entity == entity)
            .map(|(slot, _)| slot)
    }

    /// All occupied slots in index order.
    pub fn occupied(&self) -> impl Iterator<Item = (u8, &PlacedCard)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.as_ref().map(|p| (i as u8, p)))
    }

    /// All occupied slots in index order, mutably.
    pub fn occupied_mut(&mut self) -> impl Iterator<Item = (u8, &mut PlacedCard)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, cell)| cell.as_mut().map(|p| (i as u8, p)))
    }

    /// Non-neutralized cards in index order.
    pub fn active(&self) -> impl Iterator<Item = (u8, &PlacedCard)> {
        self.occupied().filter(|(_, p)| p.is_active())
    }

    /// Non-neutralized cards owned by `side`.
    pub fn active_of(&self, side: SideId) -> impl Iterator<Item = (u8, &PlacedCard)> {
        self.active().filter(move |(_, p)| p.owner == side)
    }

    /// Mark a card neutralized. Returns false if the slot is empty or the
    /// card was already neutralized.
    pub fn mark_neutralized(&mut self, slot: u8) -> bool {
        match self.get_mut(slot) {
            Some(placed) if !placed.neutralized => {
                placed.neutralized = true;
                true
            }
            _ => false,
        }
    }

    /// Set or clear the buffed marker. Returns false if the slot is empty.
    pub fn set_buffed(&mut self, slot: u8, buffed: bool) -> bool {
        match self.get_mut(slot) {
            Some(placed) => {
                placed.buffed = buffed;
                true
            }
            None => false,
        }
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.occupied().count()
    }

    /// Whether no slot is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occupied_count() == 0
    }

    /// Empty every slot.
    pub fn clear(&mut self) {
        self.slots = Default::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardCatalog, CardId};
    use crate::core::EntityAllocator;

    fn placed(ids: &mut EntityAllocator, card: u32, owner: SideId) -> PlacedCard {
        let card: Card = CardCatalog::standard()
            .instantiate(CardId::new(card), ids)
            .unwrap();
        PlacedCard::new(card, owner, 0)
    }

    #[test]
    fn test_occupy_and_remove() {
        let mut field = BattlefieldState::new();
        let mut ids = EntityAllocator::default();

        field.occupy(5, placed(&mut ids, 1, SideId::Player)).unwrap();
        assert!(field.is_occupied(5));
        assert_eq!(field.occupied_count(), 1);
        assert_eq!(field.find_entity(EntityId::new(0)), Some(5));

        let err = field.occupy(5, placed(&mut ids, 2, SideId::Player)).unwrap_err();
        assert_eq!(err, EngineError::SlotOccupied { slot: 5 });

        let removed = field.remove(5).unwrap();
        assert_eq!(removed.card.entity, EntityId::new(0));
        assert!(field.is_empty());
        assert!(field.remove(5).is_none());
    }

    #[test]
    #[should_panic(expected = "already on the battlefield")]
    fn test_card_in_two_slots_panics() {
        let mut field = BattlefieldState::new();
        let mut ids = EntityAllocator::default();
        let card = placed(&mut ids, 1, SideId::Player);

        field.occupy(4, card.clone()).unwrap();
        let _ = field.occupy(6, card);
    }

    #[test]
    fn test_neutralized_cards_are_not_active() {
        let mut field = BattlefieldState::new();
        let mut ids = EntityAllocator::default();
        field.occupy(0, placed(&mut ids, 3, SideId::Opponent)).unwrap();
        field.occupy(1, placed(&mut ids, 4, SideId::Opponent)).unwrap();
        field.occupy(4, placed(&mut ids, 17, SideId::Player)).unwrap();

        assert!(field.mark_neutralized(0));
        assert!(!field.mark_neutralized(0));
        assert!(!field.mark_neutralized(2));

        let active: Vec<_> = field.active_of(SideId::Opponent).map(|(s, _)| s).collect();
        assert_eq!(active, vec![1]);
        assert_eq!(field.active().count(), 2);
    }

    #[test]
    fn test_entity_guarded_access() {
        let mut field = BattlefieldState::new();
        let mut ids = EntityAllocator::default();
        field.occupy(2, placed(&mut ids, 3, SideId::Opponent)).unwrap();

        assert!(field.get_entity(2, EntityId::new(0)).is_some());
        assert!(field.get_entity(2, EntityId::new(9)).is_none());
        assert!(field.set_buffed(2, true));
        assert!(field.get(2).unwrap().buffed);
        assert!(!field.set_buffed(3, true));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_slot() {
        let mut field = BattlefieldState::new();
        let mut ids = EntityAllocator::default();
        assert!(field.get(9).is_none());
        let _ = field.occupy(9, placed(&mut ids, 1, SideId::Player));
    }
}
