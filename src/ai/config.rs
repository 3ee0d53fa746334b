//! Opponent tuning.

use serde::{Deserialize, Serialize};

/// Thresholds and probabilities of the rule-based opponent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OpponentConfig {
    /// Own life at or below which the opponent turns defensive (default: 2).
    pub defensive_threshold: u32,

    /// Player life at or below which the opponent attacks directly (default: 3).
    pub aggressive_threshold: u32,

    /// Chance to play a card when the hand is not empty (default: 0.6).
    pub card_play_chance: f64,

    /// Chance that a defensive action heals (default: 0.3).
    pub heal_chance: f64,

    /// Life healed by a successful defensive action (default: 1).
    pub heal_amount: u32,

    /// Minimum direct attack damage (default: 1).
    pub attack_min: u32,

    /// Maximum direct attack damage (default: 2).
    pub attack_max: u32,

    /// Game time after which elapsed time stops raising the difficulty
    /// (default: 300s).
    pub difficulty_ramp_ms: u64,
}

impl Default for OpponentConfig {
    fn default() -> Self {
        Self {
            defensive_threshold: 2,
            aggressive_threshold: 3,
            card_play_chance: 0.6,
            heal_chance: 0.3,
            heal_amount: 1,
            attack_min: 1,
            attack_max: 2,
            difficulty_ramp_ms: 300_000,
        }
    }
}

impl OpponentConfig {
    /// Set the card-play probability.
    #[must_use]
    pub fn with_card_play_chance(mut self, chance: f64) -> Self {
        self.card_play_chance = chance;
        self
    }

    /// Set the defensive heal probability.
    #[must_use]
    pub fn with_heal_chance(mut self, chance: f64) -> Self {
        self.heal_chance = chance;
        self
    }

    /// Set the direct attack damage range.
    #[must_use]
    pub fn with_attack_range(mut self, min: u32, max: u32) -> Self {
        self.attack_min = min;
        self.attack_max = max.max(min);
        self
    }

    /// Set both life thresholds.
    #[must_use]
    pub fn with_thresholds(mut self, defensive: u32, aggressive: u32) -> Self {
        self.defensive_threshold = defensive;
        self.aggressive_threshold = aggressive;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OpponentConfig::default();
        assert_eq!(config.defensive_threshold, 2);
        assert_eq!(config.aggressive_threshold, 3);
        assert_eq!((config.attack_min, config.attack_max), (1, 2));
    }

    #[test]
    fn test_attack_range_is_ordered() {
        let config = OpponentConfig::default().with_attack_range(3, 1);
        assert_eq!((config.attack_min, config.attack_max), (3, 3));
    }

    #[test]
    fn test_builders() {
        let config = OpponentConfig::default()
            .with_heal_chance(1.0)
            .with_card_play_chance(0.0)
            .with_thresholds(4, 1);
        assert_eq!(config.heal_chance, 1.0);
        assert_eq!(config.card_play_chance, 0.0);
        assert_eq!((config.defensive_threshold, config.aggressive_threshold), (4, 1));
    }
}
