//! Opponent decision policies.
//!
//! A policy looks at an `AiView` (a read-only summary built by the
//! session) and picks an `AiAction`, rolling any randomness up front so
//! the session only has to apply it.

use serde::{Deserialize, Serialize};

use crate::cards::CardCategory;
use crate::core::{EntityId, GameRng, MAX_LIFE};

use super::config::OpponentConfig;

/// A hand card as the opponent sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandCard {
    pub entity: EntityId,
    pub category: CardCategory,
    pub power: u32,
}

/// What the opponent knows when it decides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AiView {
    pub own_life: u32,
    pub player_life: u32,
    pub elapsed_ms: u64,
    pub can_act: bool,
    pub hand: Vec<HandCard>,
}

/// An opponent move, with its random outcome already decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiAction {
    /// Damage the player's life directly.
    DirectAttack { damage: u32 },
    /// Spend a hand card: Auspicious cards heal the opponent by their
    /// power, everything else damages the player.
    CardPlay { card: EntityId },
    /// Hold back; heal by `heal` (possibly zero).
    Defensive { heal: u32 },
    /// Observe without changing state.
    Probe,
}

/// Policy deciding the opponent's move in a reaction or think window.
pub trait OpponentPolicy: Send + Sync {
    /// Choose a move.
    fn choose_action(&self, view: &AiView, rng: &mut GameRng) -> AiAction;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Threshold rules with a difficulty-weighted card choice.
#[derive(Clone, Debug, Default)]
pub struct RuleBasedOpponent {
    pub config: OpponentConfig,
}

impl RuleBasedOpponent {
    #[must_use]
    pub fn new(config: OpponentConfig) -> Self {
        Self { config }
    }

    /// Difficulty in `[0, 1]`: rises with elapsed time and with the
    /// player's life lead.
    #[must_use]
    pub fn difficulty(&self, view: &AiView) -> f64 {
        let ramp = self.config.difficulty_ramp_ms.max(1) as f64;
        let time = (view.elapsed_ms as f64 / ramp).min(1.0);
        let span = f64::from(MAX_LIFE);
        let lead = (f64::from(view.player_life) - f64::from(view.own_life) + span) / (2.0 * span);
        (time * 0.4 + lead.clamp(0.0, 1.0) * 0.6).clamp(0.0, 1.0)
    }

    /// Weighted hand pick: stronger cards are favoured as difficulty rises.
    fn pick_card(&self, view: &AiView, rng: &mut GameRng) -> Option<EntityId> {
        let difficulty = self.difficulty(view);
        let weights: Vec<f64> = view
            .hand
            .iter()
            .map(|c| 1.0 + difficulty * f64::from(c.power))
            .collect();
        rng.choose_weighted(&weights).map(|i| view.hand[i].entity)
    }

    fn direct_attack(&self, rng: &mut GameRng) -> AiAction {
        let damage = rng.gen_range_u32(self.config.attack_min..=self.config.attack_max);
        AiAction::DirectAttack { damage }
    }
}

impl OpponentPolicy for RuleBasedOpponent {
    fn choose_action(&self, view: &AiView, rng: &mut GameRng) -> AiAction {
        if !view.can_act {
            return AiAction::Probe;
        }
        if view.own_life <= self.config.defensive_threshold {
            let heal = if rng.roll(self.config.heal_chance) {
                self.config.heal_amount
            } else {
                0
            };
            return AiAction::Defensive { heal };
        }
        if view.player_life <= self.config.aggressive_threshold {
            return self.direct_attack(rng);
        }
        if !view.hand.is_empty() && rng.roll(self.config.card_play_chance) {
            if let Some(card) = self.pick_card(view, rng) {
                return AiAction::CardPlay { card };
            }
        }
        self.direct_attack(rng)
    }

    fn name(&self) -> &'static str {
        "rule-based"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(own_life: u32, player_life: u32, hand: usize) -> AiView {
        AiView {
            own_life,
            player_life,
            elapsed_ms: 0,
            can_act: true,
            hand: (0..hand)
                .map(|i| HandCard {
                    entity: EntityId::new(i as u32),
                    category: CardCategory::Inauspicious,
                    power: i as u32 + 1,
                })
                .collect(),
        }
    }

    #[test]
    fn test_probe_while_on_cooldown() {
        let ai = RuleBasedOpponent::default();
        let mut rng = GameRng::new(1);
        let mut v = view(8, 8, 3);
        v.can_act = false;
        assert_eq!(ai.choose_action(&v, &mut rng), AiAction::Probe);
    }

    #[test]
    fn test_low_life_is_defensive() {
        let ai = RuleBasedOpponent::default();
        let mut rng = GameRng::new(1);
        for _ in 0..20 {
            let action = ai.choose_action(&view(2, 1, 3), &mut rng);
            assert!(matches!(action, AiAction::Defensive { heal: 0 | 1 }));
        }
    }

    #[test]
    fn test_weak_player_is_attacked() {
        let ai = RuleBasedOpponent::default();
        let mut rng = GameRng::new(7);
        for _ in 0..20 {
            match ai.choose_action(&view(8, 3, 3), &mut rng) {
                AiAction::DirectAttack { damage } => assert!((1..=2).contains(&damage)),
                other => panic!("expected a direct attack, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_empty_hand_attacks() {
        let ai = RuleBasedOpponent::default();
        let mut rng = GameRng::new(3);
        assert!(matches!(
            ai.choose_action(&view(8, 8, 0), &mut rng),
            AiAction::DirectAttack { .. }
        ));
    }

    #[test]
    fn test_card_play_picks_hand_card() {
        let ai = RuleBasedOpponent::new(OpponentConfig::default().with_card_play_chance(1.0));
        let mut rng = GameRng::new(11);
        let v = view(8, 8, 4);
        match ai.choose_action(&v, &mut rng) {
            AiAction::CardPlay { card } => assert!(v.hand.iter().any(|c| c.entity == card)),
            other => panic!("expected a card play, got {other:?}"),
        }
    }

    #[test]
    fn test_difficulty_bounds() {
        let ai = RuleBasedOpponent::default();
        let even = ai.difficulty(&view(8, 8, 0));
        assert!((even - 0.3).abs() < 1e-9);

        let mut late = view(0, 8, 0);
        late.elapsed_ms = 600_000;
        assert!((ai.difficulty(&late) - 1.0).abs() < 1e-9);
    }
}
