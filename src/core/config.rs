//! Engine configuration.
//!
//! All model time is integer milliseconds. Every timing and probability
//! constant the engine uses lives here, so sessions can be tuned without
//! touching rule code.
//!
//! ```
//! use bazi_duel::core::EngineConfig;
//!
//! let config = EngineConfig::default()
//!     .with_seed(7)
//!     .with_reaction_chance(0.0)
//!     .with_effect_deadline_ms(5_000);
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.ticks_per(config.effect_deadline_ms), 50);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::CardId;

/// Upper bound of a side's life pool.
pub const MAX_LIFE: u32 = 8;

/// Number of pillars in a chart.
pub const PILLAR_COUNT: usize = 4;

/// Rejected configuration values.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("tick period must be positive")]
    ZeroTick,
    #[error("{name} ({value}ms) must be at least one tick ({tick}ms)")]
    ShorterThanTick {
        name: &'static str,
        value: u64,
        tick: u64,
    },
    #[error("probability {name} = {value} is outside [0, 1]")]
    Probability { name: &'static str, value: f64 },
    #[error("hand limit must be positive")]
    ZeroHandLimit,
    #[error("starting hand {starting} exceeds hand limit {limit}")]
    StartingHandTooLarge { starting: usize, limit: usize },
    #[error("deck list references unknown card {0}")]
    UnknownCard(CardId),
}

/// Engine tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Scheduler tick period (default: 100ms).
    pub tick_ms: u64,

    /// Length of one cycle (default: 10s).
    /// Per-cycle generation and upkeep run on each boundary.
    pub cycle_ms: u64,

    /// Priority is released after being held this long (default: 15s).
    pub priority_hold_ms: u64,

    /// Interval of the automatic draw hook (default: 3s).
    pub auto_draw_interval_ms: u64,

    /// Maximum hand size (default: 7).
    pub hand_limit: usize,

    /// Cards dealt to each side at session start (default: 5).
    pub starting_hand: usize,

    /// Cooldown applied to a side after it places a card (default: 2s).
    pub placement_cooldown_ms: u64,

    /// Cooldown applied after a manual draw (default: 1s).
    pub draw_cooldown_ms: u64,

    /// Deadline after which an open effect auto-resolves (default: 15s).
    pub effect_deadline_ms: u64,

    /// Delay between neutralization and discard (default: 2s).
    pub discard_delay_ms: u64,

    /// How long a buffed marker stays on a field card (default: 3s).
    pub buff_marker_ms: u64,

    /// Probability that a neutralization check fires (default: 0.3).
    pub neutralization_chance: f64,

    /// Interval of the sampled neutralization check (default: every tick).
    pub neutralization_sample_ms: u64,

    /// Probability of a reaction window after an effect settles (default: 0.4).
    pub reaction_chance: f64,

    /// Interval of the opponent's own action window (default: 5s, 0 = disabled).
    pub ai_think_interval_ms: u64,

    /// Life elements a charged resident card spends per cycle (default: 1).
    pub life_upkeep_per_cycle: u32,

    /// Root seed for every random stream in the session.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            cycle_ms: 10_000,
            priority_hold_ms: 15_000,
            auto_draw_interval_ms: 3_000,
            hand_limit: 7,
            starting_hand: 5,
            placement_cooldown_ms: 2_000,
            draw_cooldown_ms: 1_000,
            effect_deadline_ms: 15_000,
            discard_delay_ms: 2_000,
            buff_marker_ms: 3_000,
            neutralization_chance: 0.3,
            neutralization_sample_ms: 100,
            reaction_chance: 0.4,
            ai_think_interval_ms: 5_000,
            life_upkeep_per_cycle: 1,
            seed: 42,
        }
    }
}

impl EngineConfig {
    /// Set the root seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the cycle duration.
    #[must_use]
    pub fn with_cycle_ms(mut self, ms: u64) -> Self {
        self.cycle_ms = ms;
        self
    }

    /// Set the effect deadline.
    #[must_use]
    pub fn with_effect_deadline_ms(mut self, ms: u64) -> Self {
        self.effect_deadline_ms = ms;
        self
    }

    /// Set the neutralization discard delay.
    #[must_use]
    pub fn with_discard_delay_ms(mut self, ms: u64) -> Self {
        self.discard_delay_ms = ms;
        self
    }

    /// Set the placement cooldown.
    #[must_use]
    pub fn with_placement_cooldown_ms(mut self, ms: u64) -> Self {
        self.placement_cooldown_ms = ms;
        self
    }

    /// Set the neutralization probability.
    #[must_use]
    pub fn with_neutralization_chance(mut self, chance: f64) -> Self {
        self.neutralization_chance = chance;
        self
    }

    /// Set the reaction window probability.
    #[must_use]
    pub fn with_reaction_chance(mut self, chance: f64) -> Self {
        self.reaction_chance = chance;
        self
    }

    /// Set the opponent think interval. Zero disables the periodic window.
    #[must_use]
    pub fn with_ai_think_interval_ms(mut self, ms: u64) -> Self {
        self.ai_think_interval_ms = ms;
        self
    }

    /// Set the auto-draw interval.
    #[must_use]
    pub fn with_auto_draw_interval_ms(mut self, ms: u64) -> Self {
        self.auto_draw_interval_ms = ms;
        self
    }

    /// Set the per-cycle life-element upkeep.
    #[must_use]
    pub fn with_life_upkeep(mut self, upkeep: u32) -> Self {
        self.life_upkeep_per_cycle = upkeep;
        self
    }

    /// Set the starting hand size.
    #[must_use]
    pub fn with_starting_hand(mut self, cards: usize) -> Self {
        self.starting_hand = cards;
        self
    }

    /// Number of ticks needed to cover `ms` (rounded up).
    #[must_use]
    pub fn ticks_per(&self, ms: u64) -> u64 {
        if self.tick_ms == 0 {
            return 0;
        }
        ms.div_ceil(self.tick_ms)
    }

    /// Check that the tunables describe a runnable session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTick);
        }

        let periods = [
            ("cycle_ms", self.cycle_ms),
            ("auto_draw_interval_ms", self.auto_draw_interval_ms),
            ("neutralization_sample_ms", self.neutralization_sample_ms),
            ("effect_deadline_ms", self.effect_deadline_ms),
        ];
        for (name, value) in periods {
            if value < self.tick_ms {
                return Err(ConfigError::ShorterThanTick {
                    name,
                    value,
                    tick: self.tick_ms,
                });
            }
        }

        let chances = [
            ("neutralization_chance", self.neutralization_chance),
            ("reaction_chance", self.reaction_chance),
        ];
        for (name, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Probability { name, value });
            }
        }

        if self.hand_limit == 0 {
            return Err(ConfigError::ZeroHandLimit);
        }
        if self.starting_hand > self.hand_limit {
            return Err(ConfigError::StartingHandTooLarge {
                starting: self.starting_hand,
                limit: self.hand_limit,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.tick_ms, 100);
        assert_eq!(config.effect_deadline_ms, 15_000);
        assert_eq!(config.discard_delay_ms, 2_000);
        assert_eq!(config.hand_limit, 7);
        assert_eq!(config.neutralization_sample_ms, config.tick_ms);
        assert!((config.neutralization_chance - 0.3).abs() < f64::EPSILON);
        assert!((config.reaction_chance - 0.4).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = EngineConfig::default()
            .with_seed(99)
            .with_cycle_ms(2_000)
            .with_neutralization_chance(1.0)
            .with_ai_think_interval_ms(0)
            .with_auto_draw_interval_ms(500)
            .with_discard_delay_ms(700)
            .with_placement_cooldown_ms(300)
            .with_life_upkeep(2);

        assert_eq!(config.seed, 99);
        assert_eq!(config.auto_draw_interval_ms, 500);
        assert_eq!(config.discard_delay_ms, 700);
        assert_eq!(config.placement_cooldown_ms, 300);
        assert_eq!(config.life_upkeep_per_cycle, 2);
        assert_eq!(config.cycle_ms, 2_000);
        assert_eq!(config.ai_think_interval_ms, 0);
    }

    #[test]
    fn test_ticks_per_rounds_up() {
        let config = EngineConfig::default();
        assert_eq!(config.ticks_per(15_000), 150);
        assert_eq!(config.ticks_per(150), 2);
        assert_eq!(config.ticks_per(0), 0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_tick = EngineConfig { tick_ms: 0, ..EngineConfig::default() };
        assert_eq!(zero_tick.validate(), Err(ConfigError::ZeroTick));

        let bad_chance = EngineConfig::default().with_reaction_chance(1.5);
        assert!(matches!(
            bad_chance.validate(),
            Err(ConfigError::Probability { name: "reaction_chance", .. })
        ));

        let short_cycle = EngineConfig::default().with_cycle_ms(50);
        assert!(matches!(
            short_cycle.validate(),
            Err(ConfigError::ShorterThanTick { name: "cycle_ms", .. })
        ));

        let big_hand = EngineConfig::default().with_starting_hand(8);
        assert_eq!(
            big_hand.validate(),
            Err(ConfigError::StartingHandTooLarge { starting: 8, limit: 7 })
        );
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = EngineConfig::default().with_seed(1234);
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
