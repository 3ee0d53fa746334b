//! Life-element generation.
//!
//! `LifeElementEngine` is a stateless service over borrowed cards and
//! charts. It decides when a card charges, how much it regenerates, what
//! it pays in upkeep, and when it has burnt out.
//!
//! ## Lifecycle of a card's pool
//!
//! 1. **Placement**: any satisfied appear condition fills the pool;
//!    otherwise the card stays inert at zero.
//! 2. **Cycle boundary**: a charged card pays upkeep, then `PerCycle`
//!    cards regenerate up to their per-trigger cap.
//! 3. **Effect resolution**: `OnEffectResolution` cards regenerate after
//!    an effect that involved them.
//! 4. **Burn-out**: a generating card whose pool falls back to zero after
//!    having been charged leaves the battlefield.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::battlefield::{BattlefieldState, PlacedCard};
use crate::bazi::{Chart, ConditionEvaluator, ElementCounts};
use crate::cards::{Card, GenerationTrigger};
use crate::core::{SideId, SideMap};

/// What one cycle boundary did to a card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleOutcome {
    /// Life elements paid as upkeep.
    pub spent: u32,
    /// Life elements regenerated.
    pub generated: u32,
}

/// Stateless life-element rules.
pub struct LifeElementEngine;

impl LifeElementEngine {
    /// Charge a card entering the battlefield.
    ///
    /// Returns whether the appear conditions were met. Unmet conditions
    /// leave the card inert with an empty pool.
    pub fn on_placement(card: &mut Card, chart: &Chart) -> bool {
        let satisfied = ConditionEvaluator::any_satisfied(&card.appear_conditions, chart);
        if satisfied {
            card.charge_full();
        } else {
            card.discharge();
        }
        trace!(card = %card.entity, satisfied, elements = card.current_life_elements(), "placement charge");
        satisfied
    }

    /// Apply one cycle boundary to a resident card.
    pub fn on_cycle_tick(placed: &mut PlacedCard, chart: &Chart, upkeep: u32) -> CycleOutcome {
        let mut outcome = CycleOutcome::default();
        let Some(rule) = placed.card.generation else {
            return outcome;
        };
        if placed.neutralized {
            return outcome;
        }

        if placed.charged_once {
            outcome.spent = placed.card.spend_life_elements(upkeep);
        }

        if rule.trigger == GenerationTrigger::PerCycle
            && ConditionEvaluator::any_satisfied(&placed.card.appear_conditions, chart)
        {
            outcome.generated = placed.card.add_life_elements(rule.per_trigger_cap);
        }

        placed.note_charge();
        outcome
    }

    /// Regenerate after an effect involving the card.
    /// Returns the amount generated.
    pub fn on_effect_resolution(placed: &mut PlacedCard, chart: &Chart) -> u32 {
        if placed.neutralized || !placed.card.generates_on(GenerationTrigger::OnEffectResolution) {
            return 0;
        }
        if !ConditionEvaluator::any_satisfied(&placed.card.appear_conditions, chart) {
            return 0;
        }

        let cap = placed.card.generation.map_or(0, |g| g.per_trigger_cap);
        let generated = placed.card.add_life_elements(cap);
        placed.note_charge();
        generated
    }

    /// Apply a cycle boundary to every occupied slot, using each card's
    /// owner chart. Returns the slots that changed.
    pub fn cycle_all(
        battlefield: &mut BattlefieldState,
        charts: &SideMap<Chart>,
        upkeep: u32,
    ) -> Vec<(u8, CycleOutcome)> {
        battlefield
            .occupied_mut()
            .filter_map(|(slot, placed)| {
                let chart = &charts[placed.owner];
                let outcome = Self::on_cycle_tick(placed, chart, upkeep);
                (outcome != CycleOutcome::default()).then_some((slot, outcome))
            })
            .collect()
    }

    /// Slots holding burnt-out cards: generating, charged at some point,
    /// now empty, and not already on their way out through neutralization.
    #[must_use]
    pub fn check_depletion(battlefield: &BattlefieldState) -> Vec<u8> {
        battlefield
            .active()
            .filter(|(_, p)| {
                p.card.generation.is_some()
                    && p.charged_once
                    && p.card.current_life_elements() == 0
            })
            .map(|(slot, _)| slot)
            .collect()
    }

    /// Life elements held by a side's active cards, by generated element.
    #[must_use]
    pub fn tally(battlefield: &BattlefieldState, side: SideId) -> ElementCounts {
        let mut counts = ElementCounts::new();
        for (_, placed) in battlefield.active_of(side) {
            if let Some(rule) = placed.card.generation {
                counts.add(rule.element, placed.card.current_life_elements());
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bazi::Element;
    use crate::cards::{CardCatalog, CardId};
    use crate::core::EntityAllocator;

    fn card(id: u32, ids: &mut EntityAllocator) -> Card {
        CardCatalog::standard()
            .instantiate(CardId::new(id), ids)
            .unwrap()
    }

    fn placed(id: u32, owner: SideId, chart: &Chart, ids: &mut EntityAllocator) -> PlacedCard {
        let mut c = card(id, ids);
        LifeElementEngine::on_placement(&mut c, chart);
        PlacedCard::new(c, owner, 0)
    }

    #[test]
    fn test_placement_charges_when_condition_met() {
        let mut ids = EntityAllocator::default();
        // Heavenly Virtue needs a spring month; the player chart has one.
        let mut c = card(3, &mut ids);
        assert!(LifeElementEngine::on_placement(&mut c, &Chart::default_player()));
        assert_eq!(c.current_life_elements(), 2);

        let mut c = card(3, &mut ids);
        assert!(!LifeElementEngine::on_placement(&mut c, &Chart::default_opponent()));
        assert_eq!(c.current_life_elements(), 0);
    }

    #[test]
    fn test_card_without_conditions_is_unconditional() {
        let mut ids = EntityAllocator::default();
        // Void Emptiness has no conditions and no pool.
        let mut c = card(25, &mut ids);
        assert!(LifeElementEngine::on_placement(&mut c, &Chart::default_opponent()));
        assert_eq!(c.current_life_elements(), 0);
    }

    #[test]
    fn test_per_cycle_regenerates_after_upkeep() {
        let mut ids = EntityAllocator::default();
        // Heavenly Doctor: weak day master, per-cycle cap 1, pool 2.
        let chart = Chart::default_player();
        let mut p = placed(8, SideId::Player, &chart, &mut ids);
        assert_eq!(p.card.current_life_elements(), 2);

        let outcome = LifeElementEngine::on_cycle_tick(&mut p, &chart, 1);
        assert_eq!(outcome, CycleOutcome { spent: 1, generated: 1 });
        assert_eq!(p.card.current_life_elements(), 2);
    }

    #[test]
    fn test_on_placement_cards_burn_out() {
        let mut ids = EntityAllocator::default();
        let chart = Chart::default_player();
        let mut field = BattlefieldState::new();
        // Heavenly Virtue: on-placement only, pool 2.
        field.occupy(4, placed(3, SideId::Player, &chart, &mut ids)).unwrap();
        let charts = SideMap::new(|side| match side {
            SideId::Player => Chart::default_player(),
            SideId::Opponent => Chart::default_opponent(),
        });

        LifeElementEngine::cycle_all(&mut field, &charts, 1);
        assert!(LifeElementEngine::check_depletion(&field).is_empty());

        LifeElementEngine::cycle_all(&mut field, &charts, 1);
        assert_eq!(LifeElementEngine::check_depletion(&field), vec![4]);
    }

    #[test]
    fn test_inert_cards_never_burn_out() {
        let mut ids = EntityAllocator::default();
        let chart = Chart::default_opponent();
        let mut field = BattlefieldState::new();
        // Heavenly Virtue on an autumn chart stays inert.
        field.occupy(0, placed(3, SideId::Opponent, &chart, &mut ids)).unwrap();
        let charts = SideMap::with_value(chart);

        for _ in 0..5 {
            LifeElementEngine::cycle_all(&mut field, &charts, 1);
        }
        assert!(LifeElementEngine::check_depletion(&field).is_empty());
    }

    #[test]
    fn test_effect_resolution_generation() {
        let mut ids = EntityAllocator::default();
        // Goat Blade: strong day master, on-effect-resolution cap 1, pool 2.
        let chart = Chart::default_opponent();
        let mut p = placed(11, SideId::Opponent, &chart, &mut ids);
        p.card.spend_life_elements(2);

        assert_eq!(LifeElementEngine::on_effect_resolution(&mut p, &chart), 1);
        assert_eq!(LifeElementEngine::on_effect_resolution(&mut p, &chart), 1);
        assert_eq!(LifeElementEngine::on_effect_resolution(&mut p, &chart), 0);

        p.neutralized = true;
        p.card.spend_life_elements(1);
        assert_eq!(LifeElementEngine::on_effect_resolution(&mut p, &chart), 0);
    }

    #[test]
    fn test_tally_counts_generated_elements() {
        let mut ids = EntityAllocator::default();
        let chart = Chart::default_player();
        let mut field = BattlefieldState::new();
        field.occupy(4, placed(3, SideId::Player, &chart, &mut ids)).unwrap();
        field.occupy(5, placed(8, SideId::Player, &chart, &mut ids)).unwrap();

        let tally = LifeElementEngine::tally(&field, SideId::Player);
        assert_eq!(tally.get(Element::Wood), 4);
        assert_eq!(LifeElementEngine::tally(&field, SideId::Opponent).total(), 0);
    }
}
