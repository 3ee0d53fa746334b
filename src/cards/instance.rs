//! Card instances - runtime card state.
//!
//! A `Card` is one copy of a catalog card inside a session. It carries
//! its own `EntityId` and its life-element counter, which is the only
//! part of a card that changes while it is resident.

use serde::{Deserialize, Serialize};

use super::definition::{CardCategory, CardDefinition, CardId, GenerationRule, GenerationTrigger, Rarity};
use crate::bazi::{Condition, Element};
use crate::core::EntityId;

/// A card in a hand, deck, discard pile or battlefield slot.
///
/// Invariant: `current_life_elements <= max_life_elements`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique entity ID for this copy.
    pub entity: EntityId,

    /// Catalog card this copy was made from.
    pub card_id: CardId,

    pub name: String,
    pub category: CardCategory,
    pub element: Element,
    pub power: u32,
    pub rarity: Rarity,
    pub appear_conditions: Vec<Condition>,
    pub generation: Option<GenerationRule>,

    current_life_elements: u32,
    max_life_elements: u32,
}

impl Card {
    /// Create an uncharged copy of a definition.
    #[must_use]
    pub fn from_definition(entity: EntityId, definition: &CardDefinition) -> Self {
        Self {
            entity,
            card_id: definition.id,
            name: definition.name.clone(),
            category: definition.category,
            element: definition.element,
            power: definition.power,
            rarity: definition.rarity,
            appear_conditions: definition.appear_conditions.clone(),
            generation: definition.generation,
            current_life_elements: 0,
            max_life_elements: definition.max_life_elements,
        }
    }

    /// Life elements currently stored.
    #[must_use]
    pub fn current_life_elements(&self) -> u32 {
        self.current_life_elements
    }

    /// Capacity of the life-element pool.
    #[must_use]
    pub fn max_life_elements(&self) -> u32 {
        self.max_life_elements
    }

    /// Free room in the pool.
    #[must_use]
    pub fn headroom(&self) -> u32 {
        self.max_life_elements - self.current_life_elements
    }

    /// Whether the card's generation rule fires on `trigger`.
    #[must_use]
    pub fn generates_on(&self, trigger: GenerationTrigger) -> bool {
        self.generation.is_some_and(|g| g.trigger == trigger)
    }

    /// Fill the pool to capacity.
    pub fn charge_full(&mut self) {
        self.current_life_elements = self.max_life_elements;
    }

    /// Empty the pool.
    pub fn discharge(&mut self) {
        self.current_life_elements = 0;
    }

    /// Add up to `amount` life elements, bounded by capacity.
    /// Returns the amount actually added.
    pub fn add_life_elements(&mut self, amount: u32) -> u32 {
        let added = amount.min(self.headroom());
        self.current_life_elements += added;
        assert!(
            self.current_life_elements <= self.max_life_elements,
            "life elements of {} exceed capacity",
            self.entity
        );
        added
    }

    /// Spend up to `amount` life elements. Returns the amount spent.
    pub fn spend_life_elements(&mut self, amount: u32) -> u32 {
        let spent = amount.min(self.current_life_elements);
        self.current_life_elements -= spent;
        spent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bazi::Element;

    fn card(max: u32) -> Card {
        let def = CardDefinition::new(CardId::new(1), "Test", CardCategory::Auspicious, Element::Wood, 2)
            .with_generation(GenerationRule::new(GenerationTrigger::PerCycle, Element::Wood, 1), max);
        Card::from_definition(EntityId::new(5), &def)
    }

    #[test]
    fn test_from_definition_is_uncharged() {
        let c = card(3);
        assert_eq!(c.entity, EntityId::new(5));
        assert_eq!(c.card_id, CardId::new(1));
        assert_eq!(c.current_life_elements(), 0);
        assert_eq!(c.max_life_elements(), 3);
        assert!(c.generates_on(GenerationTrigger::PerCycle));
        assert!(!c.generates_on(GenerationTrigger::OnPlacement));
    }

    #[test]
    fn test_add_is_capped() {
        let mut c = card(3);
        assert_eq!(c.add_life_elements(2), 2);
        assert_eq!(c.add_life_elements(5), 1);
        assert_eq!(c.current_life_elements(), 3);
        assert_eq!(c.headroom(), 0);
    }

    #[test]
    fn test_spend_floors_at_zero() {
        let mut c = card(2);
        c.charge_full();
        assert_eq!(c.spend_life_elements(1), 1);
        assert_eq!(c.spend_life_elements(4), 1);
        assert_eq!(c.current_life_elements(), 0);
    }
}
