//! Target collection and validation.
//!
//! Candidates are listed pillars first (player Year..Hour, then opponent
//! Year..Hour) followed by active field cards in slot order. Ids are
//! assigned in that order, so the first target of a side is also its
//! representative for automatic allocation.

use crate::battlefield::BattlefieldState;
use crate::bazi::PillarSlot;
use crate::core::{EntityId, SideId};
use crate::error::EngineError;

use super::pending::{ActionKind, PendingEffect, Target, TargetId, TargetKind};

/// Stateless target rules.
pub struct TargetResolver;

impl TargetResolver {
    /// Enumerate candidate targets for an action by `actor`.
    ///
    /// Extended mode lists every pillar and every active field card of both
    /// sides. Otherwise Damage drops the actor's own targets and Buff drops
    /// the other side's. `exclude` removes one field entity, normally the
    /// card whose effect is being opened.
    #[must_use]
    pub fn collect(
        battlefield: &BattlefieldState,
        actor: SideId,
        action: ActionKind,
        extended: bool,
        exclude: Option<EntityId>,
    ) -> Vec<Target> {
        let pillars = SideId::all().flat_map(|side| {
            PillarSlot::ALL
                .into_iter()
                .map(move |pillar| (TargetKind::Pillar { side, pillar }, side))
        });
        let cards = battlefield
            .active()
            .filter(|(_, placed)| Some(placed.card.entity) != exclude)
            .map(|(slot, placed)| {
                (
                    TargetKind::FieldCard { slot, entity: placed.card.entity },
                    placed.owner,
                )
            })
            .collect::<Vec<_>>();

        pillars
            .chain(cards)
            .filter(|&(_, owner)| extended || Self::side_allowed(actor, action, owner))
            .enumerate()
            .map(|(i, (kind, owner))| Target {
                id: TargetId::new(i as u32),
                kind,
                owner,
            })
            .collect()
    }

    /// Check that a target of `pending` can still receive an allocation.
    pub fn validate<'a>(
        pending: &'a PendingEffect,
        battlefield: &BattlefieldState,
        id: TargetId,
    ) -> Result<&'a Target, EngineError> {
        let target = pending.target(id).ok_or(EngineError::InvalidTarget(id))?;

        if let TargetKind::FieldCard { slot, entity } = target.kind {
            let placed = battlefield
                .get_entity(slot, entity)
                .ok_or(EngineError::InvalidTarget(id))?;
            if placed.neutralized {
                return Err(EngineError::AlreadyNeutralized(id));
            }
        }

        if !pending.extended && !Self::side_allowed(pending.actor, pending.action, target.owner) {
            return Err(EngineError::WrongSideForAction {
                target: id,
                action: pending.action,
            });
        }

        Ok(target)
    }

    /// Whether a target owned by `owner` suits `action` in strict mode.
    #[must_use]
    pub fn side_allowed(actor: SideId, action: ActionKind, owner: SideId) -> bool {
        match action {
            ActionKind::Damage => owner != actor,
            ActionKind::Buff => owner == actor,
        }
    }
}
