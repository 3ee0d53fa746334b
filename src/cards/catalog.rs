//! Card catalog for definition lookup.
//!
//! The `CardCatalog` stores every card definition a session can draw from
//! and turns deck lists into card instances. `CardCatalog::standard()` is
//! the default 25-card pool used when a side brings no deck of its own.

use rustc_hash::FxHashMap;

use super::definition::{
    CardCategory, CardDefinition, CardId, GenerationRule, GenerationTrigger, Rarity,
};
use super::instance::Card;
use crate::bazi::{BranchCombination, ChartPattern, Condition, EarthlyBranch, Element, Season};
use crate::core::EntityAllocator;

/// Catalog of card definitions.
///
/// ## Example
///
/// ```
/// use bazi_duel::bazi::Element;
/// use bazi_duel::cards::{CardCatalog, CardCategory, CardDefinition, CardId};
///
/// let mut catalog = CardCatalog::new();
/// catalog.register(CardDefinition::new(CardId::new(1), "Goat Blade", CardCategory::Inauspicious, Element::Metal, 4));
///
/// let found = catalog.get(CardId::new(1)).unwrap();
/// assert_eq!(found.power, 4);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: FxHashMap<CardId, CardDefinition>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition.
    ///
    /// Panics if a card with the same ID already exists.
    pub fn register(&mut self, card: CardDefinition) {
        if self.cards.contains_key(&card.id) {
            panic!("Card with ID {:?} already registered", card.id);
        }
        self.cards.insert(card.id, card);
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// All definitions ordered by ID.
    #[must_use]
    pub fn sorted(&self) -> Vec<&CardDefinition> {
        let mut cards: Vec<_> = self.cards.values().collect();
        cards.sort_by_key(|c| c.id);
        cards
    }

    /// Find the first card (by ID) with the given name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&CardDefinition> {
        self.sorted().into_iter().find(|c| c.name == name)
    }

    /// Definitions of one category, ordered by ID.
    #[must_use]
    pub fn by_category(&self, category: CardCategory) -> Vec<&CardDefinition> {
        self.sorted()
            .into_iter()
            .filter(|c| c.category == category)
            .collect()
    }

    /// A deck list holding one copy of every card, ordered by ID.
    #[must_use]
    pub fn full_deck_list(&self) -> Vec<CardId> {
        self.sorted().into_iter().map(|c| c.id).collect()
    }

    /// Make a fresh copy of a card.
    pub fn instantiate(&self, id: CardId, ids: &mut EntityAllocator) -> Option<Card> {
        self.get(id)
            .map(|definition| Card::from_definition(ids.allocate(), definition))
    }

    /// Make fresh copies of every card in a deck list, in list order.
    ///
    /// Returns the first unknown ID on failure.
    pub fn instantiate_deck(
        &self,
        list: &[CardId],
        ids: &mut EntityAllocator,
    ) -> Result<Vec<Card>, CardId> {
        list.iter()
            .map(|id| self.instantiate(*id, ids).ok_or(*id))
            .collect()
    }

    /// The default 25-card pool: ten auspicious, ten inauspicious and five
    /// special cards.
    #[must_use]
    pub fn standard() -> Self {
        use CardCategory::{Auspicious, Inauspicious, Special};
        use GenerationTrigger::{OnEffectResolution, OnPlacement, PerCycle};

        let rule = GenerationRule::new;
        let def = |id: u32, name: &str, category, element, power| {
            CardDefinition::new(CardId::new(id), name, category, element, power)
        };

        let mut catalog = Self::new();

        // === Auspicious ===

        catalog.register(
            def(1, "Tianyi Noble", Auspicious, Element::Earth, 3)
                .with_rarity(Rarity::Rare)
                .with_condition(Condition::branches(BranchCombination::SixHarmony))
                .with_condition(Condition::pattern(ChartPattern::StrongDayMaster))
                .with_generation(rule(PerCycle, Element::Earth, 1), 3),
        );
        catalog.register(
            def(2, "Wenchang Scholar", Auspicious, Element::Water, 2)
                .with_condition(Condition::season(Season::Winter))
                .with_condition(Condition::at_least(Element::Water, 2))
                .with_generation(rule(OnEffectResolution, Element::Water, 1), 2),
        );
        catalog.register(
            def(3, "Heavenly Virtue", Auspicious, Element::Wood, 3)
                .with_rarity(Rarity::Rare)
                .with_condition(Condition::season(Season::Spring))
                .with_generation(rule(OnPlacement, Element::Wood, 2), 2),
        );
        catalog.register(
            def(4, "Monthly Virtue", Auspicious, Element::Fire, 2)
                .with_condition(Condition::season(Season::Summer))
                .with_generation(rule(PerCycle, Element::Fire, 1), 2),
        );
        catalog.register(def(5, "Prosperity Star", Auspicious, Element::Metal, 2));
        catalog.register(
            def(6, "General Star", Auspicious, Element::Fire, 4)
                .with_rarity(Rarity::Epic)
                .with_condition(Condition::branches(BranchCombination::ThreeHarmony(Element::Fire)))
                .with_condition(Condition::pattern(ChartPattern::DominantElement(Element::Fire)))
                .with_generation(rule(OnEffectResolution, Element::Fire, 2), 3),
        );
        catalog.register(
            def(7, "Canopy", Auspicious, Element::Earth, 1)
                .with_condition(Condition::at_least(Element::Earth, 2))
                .with_generation(rule(PerCycle, Element::Earth, 1), 2),
        );
        catalog.register(
            def(8, "Heavenly Doctor", Auspicious, Element::Wood, 2)
                .with_rarity(Rarity::Rare)
                .with_condition(Condition::pattern(ChartPattern::WeakDayMaster))
                .with_generation(rule(PerCycle, Element::Wood, 1), 2),
        );
        catalog.register(
            def(9, "Golden Carriage", Auspicious, Element::Metal, 3)
                .with_rarity(Rarity::Rare)
                .with_condition(Condition::at_least(Element::Metal, 2))
                .with_generation(rule(OnPlacement, Element::Metal, 2), 2),
        );
        catalog.register(def(10, "Red Phoenix", Auspicious, Element::Fire, 2));

        // === Inauspicious ===

        catalog.register(
            def(11, "Goat Blade", Inauspicious, Element::Metal, 4)
                .with_rarity(Rarity::Rare)
                .with_condition(Condition::pattern(ChartPattern::StrongDayMaster))
                .with_generation(rule(OnEffectResolution, Element::Metal, 1), 2),
        );
        catalog.register(
            def(12, "Robbery Sha", Inauspicious, Element::Water, 3)
                .with_condition(Condition::branches(BranchCombination::SixClash))
                .with_generation(rule(OnPlacement, Element::Water, 1), 1),
        );
        catalog.register(def(13, "Calamity Sha", Inauspicious, Element::Fire, 3));
        catalog.register(
            def(14, "Death Spirit", Inauspicious, Element::Water, 4)
                .with_rarity(Rarity::Epic)
                .with_condition(Condition::season(Season::Winter))
                .with_generation(rule(PerCycle, Element::Water, 1), 2),
        );
        catalog.register(
            def(15, "Lonely Star", Inauspicious, Element::Wood, 2)
                .with_condition(Condition::pattern(ChartPattern::MissingElement(Element::Wood)))
                .with_generation(rule(OnPlacement, Element::Wood, 1), 1),
        );
        catalog.register(def(16, "Widow Star", Inauspicious, Element::Earth, 2));
        catalog.register(
            def(17, "White Tiger", Inauspicious, Element::Metal, 5)
                .with_rarity(Rarity::Epic)
                .with_condition(Condition::branches(BranchCombination::ThreeHarmony(Element::Metal)))
                .with_condition(Condition::season(Season::Autumn))
                .with_generation(rule(PerCycle, Element::Metal, 1), 3),
        );
        catalog.register(
            def(18, "Heaven's Net", Inauspicious, Element::Fire, 3)
                .with_rarity(Rarity::Rare)
                .with_condition(Condition::branches(BranchCombination::Pair(
                    EarthlyBranch::Xu,
                    EarthlyBranch::Hai,
                )))
                .with_generation(rule(OnPlacement, Element::Fire, 2), 2),
        );
        catalog.register(
            def(19, "Earth's Snare", Inauspicious, Element::Earth, 3)
                .with_rarity(Rarity::Rare)
                .with_condition(Condition::branches(BranchCombination::Pair(
                    EarthlyBranch::Chen,
                    EarthlyBranch::Si,
                )))
                .with_generation(rule(OnPlacement, Element::Earth, 2), 2),
        );
        catalog.register(def(20, "Hook Spirit", Inauspicious, Element::Wood, 1));

        // === Special ===

        catalog.register(
            def(21, "Kuigang", Special, Element::Metal, 4)
                .with_rarity(Rarity::Legendary)
                .with_condition(Condition::all([
                    Condition::pattern(ChartPattern::StrongDayMaster),
                    Condition::at_least(Element::Metal, 2),
                ]))
                .with_generation(rule(OnEffectResolution, Element::Metal, 1), 3),
        );
        catalog.register(
            def(22, "Travelling Horse", Special, Element::Fire, 2)
                .with_rarity(Rarity::Rare)
                .with_condition(Condition::branches(BranchCombination::SixClash))
                .with_generation(rule(PerCycle, Element::Fire, 1), 2),
        );
        catalog.register(
            def(23, "Peach Blossom", Special, Element::Wood, 2)
                .with_condition(Condition::at_least(Element::Wood, 2))
                .with_generation(rule(OnPlacement, Element::Wood, 1), 1),
        );
        catalog.register(
            def(24, "Three Wonders", Special, Element::Water, 3)
                .with_rarity(Rarity::Legendary)
                .with_condition(Condition::pattern(ChartPattern::AllElementsPresent))
                .with_generation(rule(PerCycle, Element::Water, 2), 3),
        );
        catalog.register(
            def(25, "Void Emptiness", Special, Element::Earth, 1)
                .with_rarity(Rarity::Rare),
        );

        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let mut catalog = CardCatalog::new();
        catalog.register(CardDefinition::new(CardId::new(1), "A", CardCategory::Special, Element::Water, 1));

        assert!(catalog.contains(CardId::new(1)));
        assert!(!catalog.contains(CardId::new(2)));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find_by_name("A").map(|c| c.id), Some(CardId::new(1)));
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_register_panics() {
        let mut catalog = CardCatalog::new();
        catalog.register(CardDefinition::new(CardId::new(1), "A", CardCategory::Special, Element::Water, 1));
        catalog.register(CardDefinition::new(CardId::new(1), "B", CardCategory::Special, Element::Fire, 1));
    }

    #[test]
    fn test_standard_pool_shape() {
        let catalog = CardCatalog::standard();
        assert_eq!(catalog.len(), 25);
        assert_eq!(catalog.by_category(CardCategory::Auspicious).len(), 10);
        assert_eq!(catalog.by_category(CardCategory::Inauspicious).len(), 10);
        assert_eq!(catalog.by_category(CardCategory::Special).len(), 5);

        for card in catalog.sorted() {
            assert!(card.power >= 1, "{} has no power", card.name);
            if card.generation.is_none() {
                assert_eq!(card.max_life_elements, 0, "{} stores without generating", card.name);
            } else {
                assert!(card.max_life_elements > 0);
            }
        }
    }

    #[test]
    fn test_full_deck_list_is_sorted() {
        let list = CardCatalog::standard().full_deck_list();
        assert_eq!(list.len(), 25);
        assert_eq!(list.first(), Some(&CardId::new(1)));
        assert_eq!(list.last(), Some(&CardId::new(25)));
    }

    #[test]
    fn test_instantiate_deck() {
        let catalog = CardCatalog::standard();
        let mut ids = EntityAllocator::default();

        let deck = catalog
            .instantiate_deck(&[CardId::new(17), CardId::new(17), CardId::new(3)], &mut ids)
            .unwrap();
        assert_eq!(deck.len(), 3);
        assert_eq!(deck[0].name, "White Tiger");
        assert_ne!(deck[0].entity, deck[1].entity);

        let missing = catalog.instantiate_deck(&[CardId::new(3), CardId::new(99)], &mut ids);
        assert_eq!(missing, Err(CardId::new(99)));
    }
}
