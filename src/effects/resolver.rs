//! Effect allocation and resolution.
//!
//! `EffectResolver` validates allocations against a `PendingEffect`,
//! completes the allocation plan (self-cost rule, automatic fallback) and
//! applies it to life pools and field cards. Timers for discards and buff
//! markers are left to the caller, which receives a `ResolutionReport`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::battlefield::BattlefieldState;
use crate::core::{EntityId, Side, SideId, SideMap};
use crate::error::EngineError;
use crate::life::LifeElementEngine;

use super::pending::{ActionKind, EffectId, PendingEffect, TargetId, TargetKind};
use super::targeting::TargetResolver;

/// Life change of one side during a resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeChange {
    pub side: SideId,
    pub before: u32,
    pub after: u32,
}

/// Everything a resolution changed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionReport {
    pub effect: EffectId,

    /// The plan was produced by the automatic fallback.
    pub auto: bool,

    /// Applied allocations ordered by target id.
    pub allocations: Vec<(TargetId, u32)>,

    pub life_changes: Vec<LifeChange>,

    /// Field cards newly neutralized, awaiting discard.
    pub neutralized: Vec<(u8, EntityId)>,

    /// Field cards that received a buff marker.
    pub buffed: Vec<(u8, EntityId)>,

    /// Life elements regenerated by cards involved in the effect.
    pub regenerated: Vec<(u8, u32)>,
}

/// Stateless effect rules.
pub struct EffectResolver;

impl EffectResolver {
    /// Add `value` points on a target. Returns the power still unallocated.
    pub fn allocate(
        pending: &mut PendingEffect,
        battlefield: &BattlefieldState,
        target: TargetId,
        value: u32,
    ) -> Result<u32, EngineError> {
        if pending.is_settled() {
            return Err(EngineError::EffectAlreadySettled);
        }
        TargetResolver::validate(pending, battlefield, target)?;

        let remaining = pending.remaining();
        if value > remaining {
            return Err(EngineError::OverAllocation { requested: value, remaining });
        }
        if value > 0 {
            pending.add_allocation(target, value);
        }
        debug!(effect = %pending.id, %target, value, remaining = pending.remaining(), "allocation");
        Ok(pending.remaining())
    }

    /// The allocation that resolving now would apply, and whether it came
    /// from the automatic fallback.
    #[must_use]
    pub fn plan(pending: &PendingEffect) -> (Vec<(TargetId, u32)>, bool) {
        if !pending.has_allocations() {
            return (Self::auto_allocate(pending), true);
        }

        let mut plan = pending.allocation_plan();
        if pending.has_self_cost() {
            Self::apply_self_cost(pending, &mut plan);
        }
        (plan, false)
    }

    /// Fallback allocation using the first target of each side.
    ///
    /// Under the self-cost rule the owner's representative takes one point
    /// and the other side's takes the rest; a single available side takes
    /// everything. Otherwise the whole power goes to the first target on
    /// the side the action is aimed at, or the first target at all.
    #[must_use]
    pub fn auto_allocate(pending: &PendingEffect) -> Vec<(TargetId, u32)> {
        let power = pending.power();
        if power == 0 || pending.targets.is_empty() {
            return Vec::new();
        }

        let own = pending.targets_owned_by(pending.actor).next().map(|t| t.id);
        let other = pending.targets_owned_by(pending.actor.other()).next().map(|t| t.id);

        if pending.has_self_cost() {
            return match (own, other) {
                (Some(own), Some(other)) if power > 1 => vec![(own, 1), (other, power - 1)],
                (Some(own), _) => vec![(own, power)],
                (None, Some(other)) => vec![(other, power)],
                (None, None) => Vec::new(),
            };
        }

        let intended = pending.action.intended_side(pending.actor);
        let first = pending
            .targets_owned_by(intended)
            .next()
            .or_else(|| pending.targets.first())
            .map(|t| t.id);
        first.map(|id| vec![(id, power)]).unwrap_or_default()
    }

    /// Make a manual plan honour the self-cost rule.
    fn apply_self_cost(pending: &PendingEffect, plan: &mut Vec<(TargetId, u32)>) {
        let Some(own) = pending.targets_owned_by(pending.actor).next().map(|t| t.id) else {
            return;
        };
        let has_other = pending.targets_owned_by(pending.actor.other()).next().is_some();
        let remaining = pending.remaining();

        if !has_other {
            // Self-consumption: the whole power lands on the owner.
            if remaining > 0 {
                Self::bump(plan, own, remaining);
            }
            return;
        }

        let owner_hit = plan.iter().any(|(id, v)| {
            *v > 0 && pending.target(*id).is_some_and(|t| t.owner == pending.actor)
        });
        if owner_hit {
            return;
        }

        if remaining == 0 {
            // Take the point from the largest allocation.
            let Some(largest) = plan
                .iter_mut()
                .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
            else {
                return;
            };
            largest.1 -= 1;
        }
        Self::bump(plan, own, 1);
        plan.retain(|(_, v)| *v > 0);
        plan.sort_unstable_by_key(|(id, _)| *id);
    }

    fn bump(plan: &mut Vec<(TargetId, u32)>, id: TargetId, value: u32) {
        match plan.iter_mut().find(|(t, _)| *t == id) {
            Some(entry) => entry.1 += value,
            None => plan.push((id, value)),
        }
    }

    /// Apply the plan and settle the effect.
    ///
    /// Pillar targets move their owner's life, clamped to the pool. Field
    /// targets that are still resident and active get neutralized (Damage)
    /// or buffed (Buff); targets that vanished since collection absorb
    /// their points. Cards involved in the effect then regenerate.
    pub fn resolve(
        pending: &mut PendingEffect,
        battlefield: &mut BattlefieldState,
        sides: &mut SideMap<Side>,
    ) -> Result<ResolutionReport, EngineError> {
        if pending.is_settled() {
            return Err(EngineError::EffectAlreadySettled);
        }

        let (plan, auto) = Self::plan(pending);
        let total: u32 = plan.iter().map(|(_, v)| v).sum();
        assert!(
            total <= pending.power(),
            "{} plan allocates {total} of power {}",
            pending.id,
            pending.power()
        );
        pending.mark_settled();

        let mut report = ResolutionReport {
            effect: pending.id,
            auto,
            allocations: plan.clone(),
            ..ResolutionReport::default()
        };
        let before = sides.map(|_, side| side.remaining_life());
        let mut involved = Vec::new();

        for (id, value) in plan {
            let Some(target) = pending.target(id) else { continue };
            match (target.kind, pending.action) {
                (TargetKind::Pillar { side, .. }, ActionKind::Damage) => {
                    sides[side].damage(value);
                }
                (TargetKind::Pillar { side, .. }, ActionKind::Buff) => {
                    sides[side].heal(value);
                }
                (TargetKind::FieldCard { slot, entity }, action) => {
                    let Some(placed) = battlefield.get_entity_mut(slot, entity) else {
                        debug!(effect = %pending.id, slot, "target left the battlefield");
                        continue;
                    };
                    if placed.neutralized {
                        continue;
                    }
                    match action {
                        ActionKind::Damage => {
                            placed.neutralized = true;
                            report.neutralized.push((slot, entity));
                        }
                        ActionKind::Buff => {
                            placed.buffed = true;
                            report.buffed.push((slot, entity));
                            involved.push((slot, entity));
                        }
                    }
                }
            }
        }

        involved.push((pending.source_slot, pending.source.entity));
        for (slot, entity) in involved {
            let Some(placed) = battlefield.get_entity_mut(slot, entity) else { continue };
            let chart = sides[placed.owner].chart;
            let generated = LifeElementEngine::on_effect_resolution(placed, &chart);
            if generated > 0 {
                report.regenerated.push((slot, generated));
            }
        }

        for side in SideId::all() {
            let after = sides[side].remaining_life();
            if after != before[side] {
                report.life_changes.push(LifeChange { side, before: before[side], after });
            }
        }

        debug!(
            effect = %pending.id,
            auto,
            allocations = ?report.allocations,
            neutralized = report.neutralized.len(),
            "effect resolved"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battlefield::PlacedCard;
    use crate::bazi::Chart;
    use crate::cards::{CardCatalog, CardId};
    use crate::core::EntityAllocator;

    struct Fixture {
        field: BattlefieldState,
        sides: SideMap<Side>,
        ids: EntityAllocator,
        catalog: CardCatalog,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                field: BattlefieldState::new(),
                sides: SideMap::new(|side| match side {
                    SideId::Player => Side::new(side, Chart::default_player(), []),
                    SideId::Opponent => Side::new(side, Chart::default_opponent(), []),
                }),
                ids: EntityAllocator::default(),
                catalog: CardCatalog::standard(),
            }
        }

        fn place(&mut self, card: u32, slot: u8, owner: SideId) -> EntityId {
            let mut card = self.catalog.instantiate(CardId::new(card), &mut self.ids).unwrap();
            LifeElementEngine::on_placement(&mut card, &self.sides[owner].chart);
            let entity = card.entity;
            self.field.occupy(slot, PlacedCard::new(card, owner, 0)).unwrap();
            entity
        }

        fn open(&mut self, slot: u8, actor: SideId) -> PendingEffect {
            let source = self.field.get(slot).unwrap().card.clone();
            let action = ActionKind::for_category(source.category);
            let targets =
                TargetResolver::collect(&self.field, actor, action, true, Some(source.entity));
            PendingEffect::new(EffectId::new(1), source, slot, actor, targets, true, 0, 15_000)
        }

        fn life(&self, side: SideId) -> u32 {
            self.sides[side].remaining_life()
        }
    }

    #[test]
    fn test_auto_allocation_applies_self_cost() {
        let mut fx = Fixture::new();
        fx.place(12, 4, SideId::Player);
        let mut pending = fx.open(4, SideId::Player);

        let report = EffectResolver::resolve(&mut pending, &mut fx.field, &mut fx.sides).unwrap();
        assert!(report.auto);
        assert_eq!(report.allocations, vec![(TargetId::new(0), 1), (TargetId::new(4), 2)]);
        assert_eq!(fx.life(SideId::Player), 7);
        assert_eq!(fx.life(SideId::Opponent), 6);
        assert_eq!(report.life_changes.len(), 2);
    }

    #[test]
    fn test_auto_allocation_without_self_cost() {
        let mut fx = Fixture::new();
        // Tianyi Noble is auspicious: Buff on the actor's own side.
        fx.place(1, 5, SideId::Player);
        fx.sides[SideId::Player].damage(4);
        let mut pending = fx.open(5, SideId::Player);

        let report = EffectResolver::resolve(&mut pending, &mut fx.field, &mut fx.sides).unwrap();
        assert_eq!(report.allocations, vec![(TargetId::new(0), 3)]);
        assert_eq!(fx.life(SideId::Player), 7);
        assert_eq!(fx.life(SideId::Opponent), 8);
    }

    #[test]
    fn test_special_card_damages_opponent_only() {
        let mut fx = Fixture::new();
        // Kuigang, power 4.
        fx.place(21, 6, SideId::Player);
        let mut pending = fx.open(6, SideId::Player);

        EffectResolver::resolve(&mut pending, &mut fx.field, &mut fx.sides).unwrap();
        assert_eq!(fx.life(SideId::Player), 8);
        assert_eq!(fx.life(SideId::Opponent), 4);
    }

    #[test]
    fn test_over_allocation_rejected() {
        let mut fx = Fixture::new();
        fx.place(12, 4, SideId::Player);
        let mut pending = fx.open(4, SideId::Player);

        assert_eq!(EffectResolver::allocate(&mut pending, &fx.field, TargetId::new(4), 2), Ok(1));
        assert_eq!(
            EffectResolver::allocate(&mut pending, &fx.field, TargetId::new(5), 2),
            Err(EngineError::OverAllocation { requested: 2, remaining: 1 })
        );
        assert_eq!(pending.allocated_total(), 2);
    }

    #[test]
    fn test_manual_plan_gets_owner_point_from_remainder() {
        let mut fx = Fixture::new();
        fx.place(12, 4, SideId::Player);
        let mut pending = fx.open(4, SideId::Player);
        EffectResolver::allocate(&mut pending, &fx.field, TargetId::new(5), 2).unwrap();

        let (plan, auto) = EffectResolver::plan(&pending);
        assert!(!auto);
        assert_eq!(plan, vec![(TargetId::new(0), 1), (TargetId::new(5), 2)]);
    }

    #[test]
    fn test_manual_plan_moves_point_when_fully_allocated() {
        let mut fx = Fixture::new();
        fx.place(12, 4, SideId::Player);
        let mut pending = fx.open(4, SideId::Player);
        EffectResolver::allocate(&mut pending, &fx.field, TargetId::new(4), 3).unwrap();

        let report = EffectResolver::resolve(&mut pending, &mut fx.field, &mut fx.sides).unwrap();
        assert_eq!(report.allocations, vec![(TargetId::new(0), 1), (TargetId::new(4), 2)]);
        assert_eq!(fx.life(SideId::Player), 7);
        assert_eq!(fx.life(SideId::Opponent), 6);
    }

    #[test]
    fn test_field_damage_neutralizes() {
        let mut fx = Fixture::new();
        let victim = fx.place(3, 0, SideId::Opponent);
        fx.place(12, 4, SideId::Player);
        let mut pending = fx.open(4, SideId::Player);
        let target = pending
            .targets
            .iter()
            .find(|t| matches!(t.kind, TargetKind::FieldCard { slot: 0, .. }))
            .unwrap()
            .id;
        EffectResolver::allocate(&mut pending, &fx.field, target, 2).unwrap();
        EffectResolver::allocate(&mut pending, &fx.field, TargetId::new(0), 1).unwrap();

        let report = EffectResolver::resolve(&mut pending, &mut fx.field, &mut fx.sides).unwrap();
        assert_eq!(report.neutralized, vec![(0, victim)]);
        assert!(fx.field.get(0).unwrap().neutralized);
        assert_eq!(fx.life(SideId::Opponent), 8);
        assert_eq!(fx.life(SideId::Player), 7);
    }

    #[test]
    fn test_resolve_twice_is_rejected() {
        let mut fx = Fixture::new();
        fx.place(12, 4, SideId::Player);
        let mut pending = fx.open(4, SideId::Player);

        EffectResolver::resolve(&mut pending, &mut fx.field, &mut fx.sides).unwrap();
        let life = fx.sides.map(|_, s| s.remaining_life());

        assert_eq!(
            EffectResolver::resolve(&mut pending, &mut fx.field, &mut fx.sides),
            Err(EngineError::EffectAlreadySettled)
        );
        assert_eq!(
            EffectResolver::allocate(&mut pending, &fx.field, TargetId::new(0), 1),
            Err(EngineError::EffectAlreadySettled)
        );
        assert_eq!(fx.sides.map(|_, s| s.remaining_life()), life);
    }

    #[test]
    fn test_source_regenerates_on_resolution() {
        let mut fx = Fixture::new();
        // Goat Blade on the strong opponent chart regenerates after effects.
        fx.place(11, 2, SideId::Opponent);
        fx.field.get_mut(2).unwrap().card.spend_life_elements(1);
        let mut pending = fx.open(2, SideId::Opponent);

        let report = EffectResolver::resolve(&mut pending, &mut fx.field, &mut fx.sides).unwrap();
        assert_eq!(report.regenerated, vec![(2, 1)]);
    }
}
