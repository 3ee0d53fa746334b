//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a catalog card:
//! category, element, power, rarity, appear conditions and the
//! life-element generation rule. Per-copy data (life-element counter,
//! battlefield flags) lives on [`Card`](super::Card) and
//! [`PlacedCard`](crate::battlefield::PlacedCard).

use serde::{Deserialize, Serialize};

use crate::bazi::{Condition, Element};

/// Unique identifier for a catalog card.
///
/// Identifies the card kind ("Goat Blade"), not a copy in a deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Card category. Decides the action kind of the card's effect panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardCategory {
    Auspicious,
    Inauspicious,
    Special,
}

/// Rarity, used for weighting and display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

/// When a card's life elements regenerate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenerationTrigger {
    /// Only the full charge on placement.
    OnPlacement,
    /// Every cycle boundary while resident.
    PerCycle,
    /// After each resolved effect involving the card.
    OnEffectResolution,
}

/// How a card generates life elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenerationRule {
    pub trigger: GenerationTrigger,
    /// Element type of the generated life elements.
    pub element: Element,
    /// Maximum added per trigger.
    pub per_trigger_cap: u32,
}

impl GenerationRule {
    /// Create a generation rule.
    #[must_use]
    pub const fn new(trigger: GenerationTrigger, element: Element, per_trigger_cap: u32) -> Self {
        Self {
            trigger,
            element,
            per_trigger_cap,
        }
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use bazi_duel::bazi::{Condition, Element, Season};
/// use bazi_duel::cards::{CardCategory, CardDefinition, CardId, GenerationRule, GenerationTrigger};
///
/// let card = CardDefinition::new(CardId::new(1), "Heavenly Virtue", CardCategory::Auspicious, Element::Wood, 3)
///     .with_condition(Condition::season(Season::Spring))
///     .with_generation(GenerationRule::new(GenerationTrigger::PerCycle, Element::Wood, 1), 2);
///
/// assert_eq!(card.max_life_elements, 2);
/// assert!(card.generation.is_some());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Unique identifier for this card definition.
    pub id: CardId,

    /// Card name.
    pub name: String,

    /// Auspicious, inauspicious or special.
    pub category: CardCategory,

    /// Element of the card, used by neutralization.
    pub element: Element,

    /// Budget distributed across targets when the effect resolves.
    pub power: u32,

    /// Rarity tier.
    pub rarity: Rarity,

    /// Any satisfied condition charges the card on placement.
    pub appear_conditions: Vec<Condition>,

    /// Life-element generation, if the card generates at all.
    pub generation: Option<GenerationRule>,

    /// Capacity of the card's life-element pool.
    pub max_life_elements: u32,
}

impl CardDefinition {
    /// Create a new common card without conditions or generation.
    #[must_use]
    pub fn new(
        id: CardId,
        name: impl Into<String>,
        category: CardCategory,
        element: Element,
        power: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            element,
            power,
            rarity: Rarity::Common,
            appear_conditions: Vec::new(),
            generation: None,
            max_life_elements: 0,
        }
    }

    /// Set the rarity (builder pattern).
    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    /// Add an appear condition (builder pattern).
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.appear_conditions.push(condition);
        self
    }

    /// Set the generation rule and pool capacity (builder pattern).
    #[must_use]
    pub fn with_generation(mut self, rule: GenerationRule, max_life_elements: u32) -> Self {
        self.generation = Some(rule);
        self.max_life_elements = max_life_elements;
        self
    }

    /// Whether this card carries the self-cost of a hostile card.
    #[must_use]
    pub fn is_inauspicious(&self) -> bool {
        self.category == CardCategory::Inauspicious
    }
}
