//! Wu Xing neutralization.
//!
//! Each element overcomes the next one in the cycle
//! metal → wood → earth → water → fire → metal. When a side has an active
//! card of an overcoming element and the other side has an active card of
//! the overcome element, the first such victim by slot index is marked
//! neutralized. Discards are scheduled by the caller.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::battlefield::BattlefieldState;
use crate::bazi::Element;
use crate::core::{EntityId, GameRng, SideId};

/// A card marked neutralized by an overcoming pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neutralization {
    pub slot: u8,
    pub entity: EntityId,
    pub owner: SideId,
    /// Element of the neutralized card.
    pub victim: Element,
    /// Element that overcame it.
    pub by: Element,
}

/// Stateless neutralization rules.
pub struct NeutralizationEngine;

impl NeutralizationEngine {
    /// Overcoming pairs `(attacker, victim)` in checking order.
    #[must_use]
    pub fn pairs() -> [(Element, Element); 5] {
        Element::OVERCOMING_CYCLE.map(|e| (e, e.overcomes()))
    }

    /// Sampled check: neutralize every eligible pair if the roll succeeds.
    pub fn check(
        battlefield: &mut BattlefieldState,
        rng: &mut GameRng,
        chance: f64,
    ) -> Vec<Neutralization> {
        if !rng.roll(chance) {
            return Vec::new();
        }
        Self::run(battlefield)
    }

    /// Neutralize one victim for every `(pair, attacking side)` combination.
    ///
    /// Attackers are taken from the field as it was before this pass, so a
    /// card neutralized here can still count as an attacker for a later
    /// pair within the same pass.
    pub fn run(battlefield: &mut BattlefieldState) -> Vec<Neutralization> {
        let attackers: Vec<(SideId, Element)> = battlefield
            .active()
            .map(|(_, p)| (p.owner, p.card.element))
            .collect();

        let mut marked = Vec::new();
        for (attack, victim) in Self::pairs() {
            for side in SideId::all() {
                if !attackers.contains(&(side, attack)) {
                    continue;
                }
                if let Some(hit) = Self::neutralize_first(battlefield, side.other(), victim, attack) {
                    marked.push(hit);
                }
            }
        }
        marked
    }

    /// Neutralize the first eligible card regardless of probability.
    pub fn force(battlefield: &mut BattlefieldState) -> Option<Neutralization> {
        for (attack, victim) in Self::pairs() {
            for side in SideId::all() {
                let has_attacker = battlefield
                    .active_of(side)
                    .any(|(_, p)| p.card.element == attack);
                if !has_attacker {
                    continue;
                }
                if let Some(hit) = Self::neutralize_first(battlefield, side.other(), victim, attack) {
                    return Some(hit);
                }
            }
        }
        None
    }

    fn neutralize_first(
        battlefield: &mut BattlefieldState,
        owner: SideId,
        victim: Element,
        by: Element,
    ) -> Option<Neutralization> {
        let (slot, entity) = battlefield
            .active_of(owner)
            .find(|(_, p)| p.card.element == victim)
            .map(|(slot, p)| (slot, p.card.entity))?;
        battlefield.mark_neutralized(slot);
        debug!(slot, card = %entity, %victim, %by, "neutralized");
        Some(Neutralization { slot, entity, owner, victim, by })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battlefield::PlacedCard;
    use crate::cards::{CardCatalog, CardId};
    use crate::core::EntityAllocator;

    fn field(cards: &[(u8, u32, SideId)]) -> BattlefieldState {
        let catalog = CardCatalog::standard();
        let mut ids = EntityAllocator::default();
        let mut field = BattlefieldState::new();
        for &(slot, card, owner) in cards {
            let card = catalog.instantiate(CardId::new(card), &mut ids).unwrap();
            field.occupy(slot, PlacedCard::new(card, owner, 0)).unwrap();
        }
        field
    }

    #[test]
    fn test_pairs_follow_cycle() {
        let pairs = NeutralizationEngine::pairs();
        assert_eq!(pairs[0], (Element::Metal, Element::Wood));
        assert_eq!(pairs[4], (Element::Fire, Element::Metal));
    }

    #[test]
    fn test_metal_neutralizes_wood() {
        // White Tiger (metal) on the player row, Heavenly Virtue (wood) opposite.
        let mut field = field(&[(0, 3, SideId::Opponent), (4, 17, SideId::Player)]);
        let hits = NeutralizationEngine::run(&mut field);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].slot, 0);
        assert_eq!(hits[0].by, Element::Metal);
        assert!(field.get(0).unwrap().neutralized);
        assert!(!field.get(4).unwrap().neutralized);
    }

    #[test]
    fn test_same_side_elements_do_not_interact() {
        let mut field = field(&[(4, 3, SideId::Player), (5, 17, SideId::Player)]);
        assert!(NeutralizationEngine::run(&mut field).is_empty());
        assert!(NeutralizationEngine::force(&mut field).is_none());
    }

    #[test]
    fn test_first_victim_by_slot() {
        let mut field = field(&[
            (2, 3, SideId::Opponent),
            (1, 23, SideId::Opponent),
            (6, 17, SideId::Player),
        ]);
        let hits = NeutralizationEngine::run(&mut field);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].slot, 1);
    }

    #[test]
    fn test_check_respects_chance() {
        let mut field = field(&[(0, 3, SideId::Opponent), (4, 17, SideId::Player)]);
        let mut rng = GameRng::new(1);
        assert!(NeutralizationEngine::check(&mut field, &mut rng, 0.0).is_empty());
        assert_eq!(NeutralizationEngine::check(&mut field, &mut rng, 1.0).len(), 1);
    }

    #[test]
    fn test_force_marks_single_card() {
        let mut field = field(&[
            (0, 3, SideId::Opponent),
            (1, 20, SideId::Opponent),
            (4, 17, SideId::Player),
        ]);
        let hit = NeutralizationEngine::force(&mut field).unwrap();
        assert_eq!(hit.slot, 0);
        assert!(!field.get(1).unwrap().neutralized);
        assert!(NeutralizationEngine::force(&mut field).is_some());
        assert!(NeutralizationEngine::force(&mut field).is_none());
    }
}
