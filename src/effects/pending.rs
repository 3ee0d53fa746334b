//! Pending effects and their targets.
//!
//! A `PendingEffect` is opened when a card is placed and lives until it is
//! resolved, either by confirmation or by its deadline. It owns the
//! candidate target list and the allocations made so far.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::bazi::PillarSlot;
use crate::cards::{Card, CardCategory};
use crate::core::{EntityId, SideId};

/// What an effect does to the targets it is allocated to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Subtract life from pillars, neutralize field cards.
    Damage,
    /// Add life to pillars, mark field cards buffed.
    Buff,
}

impl ActionKind {
    /// Action opened by a card of the given category.
    ///
    /// Special cards act as Damage but are not subject to the self-cost
    /// rule of inauspicious cards.
    #[must_use]
    pub fn for_category(category: CardCategory) -> Self {
        match category {
            CardCategory::Auspicious => ActionKind::Buff,
            CardCategory::Inauspicious | CardCategory::Special => ActionKind::Damage,
        }
    }

    /// Side whose targets this action is normally aimed at.
    #[must_use]
    pub fn intended_side(self, actor: SideId) -> SideId {
        match self {
            ActionKind::Damage => actor.other(),
            ActionKind::Buff => actor,
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionKind::Damage => f.write_str("damage"),
            ActionKind::Buff => f.write_str("buff"),
        }
    }
}

/// Identifier of a candidate target, unique within one pending effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub u32);

impl TargetId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Target#{}", self.0)
    }
}

/// Identifier of an effect, unique within a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EffectId(pub u32);

impl EffectId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The id after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for EffectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Effect#{}", self.0)
    }
}

/// What a target points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    /// A resident card. The entity guards against the slot being reused.
    FieldCard { slot: u8, entity: EntityId },
    /// One pillar of a side's chart; allocations hit that side's life.
    Pillar { side: SideId, pillar: PillarSlot },
}

/// A candidate target of a pending effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub kind: TargetKind,
    pub owner: SideId,
}

impl Target {
    /// Whether the target is a pillar.
    #[must_use]
    pub fn is_pillar(&self) -> bool {
        matches!(self.kind, TargetKind::Pillar { .. })
    }
}

/// An effect waiting for its allocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEffect {
    pub id: EffectId,

    /// Copy of the placed card as it entered the battlefield.
    pub source: Card,

    /// Slot the source card was placed into.
    pub source_slot: u8,

    /// Side that placed the source card.
    pub actor: SideId,

    pub action: ActionKind,

    /// Targets were collected in extended mode (both sides, self included).
    pub extended: bool,

    pub targets: Vec<Target>,

    /// Session time the panel opened.
    pub opened_at_ms: u64,

    /// Session time of the automatic resolution.
    pub deadline_ms: u64,

    allocations: FxHashMap<TargetId, u32>,
    settled: bool,
}

impl PendingEffect {
    /// Open an effect with no allocations.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        id: EffectId,
        source: Card,
        source_slot: u8,
        actor: SideId,
        targets: Vec<Target>,
        extended: bool,
        opened_at_ms: u64,
        deadline_ms: u64,
    ) -> Self {
        let action = ActionKind::for_category(source.category);
        Self {
            id,
            source,
            source_slot,
            actor,
            action,
            extended,
            targets,
            opened_at_ms,
            deadline_ms,
            allocations: FxHashMap::default(),
            settled: false,
        }
    }

    /// Power to distribute.
    #[must_use]
    pub fn power(&self) -> u32 {
        self.source.power
    }

    /// Whether an inauspicious Damage effect must cost its owner a point.
    #[must_use]
    pub fn has_self_cost(&self) -> bool {
        self.source.category == CardCategory::Inauspicious && self.action == ActionKind::Damage
    }

    /// Whether the effect has been resolved.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub(crate) fn mark_settled(&mut self) {
        self.settled = true;
    }

    /// Candidate target by id.
    #[must_use]
    pub fn target(&self, id: TargetId) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    /// Candidate targets owned by `side`, in collection order.
    pub fn targets_owned_by(&self, side: SideId) -> impl Iterator<Item = &Target> {
        self.targets.iter().filter(move |t| t.owner == side)
    }

    /// Points allocated to a target so far.
    #[must_use]
    pub fn allocated_to(&self, id: TargetId) -> u32 {
        self.allocations.get(&id).copied().unwrap_or(0)
    }

    /// Sum of all allocations.
    #[must_use]
    pub fn allocated_total(&self) -> u32 {
        self.allocations.values().sum()
    }

    /// Power not yet allocated.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.power().saturating_sub(self.allocated_total())
    }

    /// Whether nothing has been allocated.
    #[must_use]
    pub fn has_allocations(&self) -> bool {
        self.allocations.values().any(|&v| v > 0)
    }

    /// Current allocations ordered by target id.
    #[must_use]
    pub fn allocation_plan(&self) -> Vec<(TargetId, u32)> {
        let mut plan: Vec<_> = self
            .allocations
            .iter()
            .filter(|(_, &v)| v > 0)
            .map(|(&id, &v)| (id, v))
            .collect();
        plan.sort_unstable_by_key(|(id, _)| *id);
        plan
    }

    pub(crate) fn add_allocation(&mut self, id: TargetId, value: u32) {
        *self.allocations.entry(id).or_insert(0) += value;
        assert!(
            self.allocated_total() <= self.power(),
            "{} allocations exceed power {}",
            self.id,
            self.power()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardCatalog, CardId};
    use crate::core::EntityAllocator;

    fn pending(card: u32) -> PendingEffect {
        let mut ids = EntityAllocator::default();
        let source = CardCatalog::standard()
            .instantiate(CardId::new(card), &mut ids)
            .unwrap();
        let targets = vec![
            Target {
                id: TargetId::new(0),
                kind: TargetKind::Pillar { side: SideId::Player, pillar: PillarSlot::Year },
                owner: SideId::Player,
            },
            Target {
                id: TargetId::new(1),
                kind: TargetKind::Pillar { side: SideId::Opponent, pillar: PillarSlot::Year },
                owner: SideId::Opponent,
            },
        ];
        PendingEffect::new(EffectId::new(1), source, 4, SideId::Player, targets, true, 0, 15_000)
    }

    #[test]
    fn test_action_for_category() {
        assert_eq!(ActionKind::for_category(CardCategory::Auspicious), ActionKind::Buff);
        assert_eq!(ActionKind::for_category(CardCategory::Inauspicious), ActionKind::Damage);
        assert_eq!(ActionKind::for_category(CardCategory::Special), ActionKind::Damage);
        assert_eq!(ActionKind::Damage.intended_side(SideId::Player), SideId::Opponent);
        assert_eq!(ActionKind::Buff.intended_side(SideId::Player), SideId::Player);
    }

    #[test]
    fn test_self_cost_applies_to_inauspicious_only() {
        assert!(pending(12).has_self_cost());
        assert!(!pending(21).has_self_cost());
        assert!(!pending(1).has_self_cost());
    }

    #[test]
    fn test_allocation_bookkeeping() {
        let mut effect = pending(12);
        assert_eq!(effect.remaining(), 3);
        assert!(!effect.has_allocations());

        effect.add_allocation(TargetId::new(1), 2);
        effect.add_allocation(TargetId::new(0), 1);
        assert_eq!(effect.allocated_total(), 3);
        assert_eq!(effect.remaining(), 0);
        assert_eq!(
            effect.allocation_plan(),
            vec![(TargetId::new(0), 1), (TargetId::new(1), 2)]
        );
    }

    #[test]
    #[should_panic(expected = "exceed power")]
    fn test_over_power_allocation_panics() {
        let mut effect = pending(12);
        effect.add_allocation(TargetId::new(1), 4);
    }

    #[test]
    fn test_targets_owned_by() {
        let effect = pending(12);
        assert_eq!(effect.targets_owned_by(SideId::Player).count(), 1);
    }
}
