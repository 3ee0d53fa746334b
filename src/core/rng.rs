//! Deterministic random number generation for replayable sessions.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Context streams**: Independent sequences per subsystem, so an extra
//!   AI roll never shifts the neutralization rolls
//! - **Serializable**: O(1) state capture and restore, used by session save/resume
//!
//! ```
//! use bazi_duel::core::GameRng;
//!
//! let root = GameRng::new(42);
//! let mut reaction = root.for_context("reaction");
//! let mut reaction_again = GameRng::new(42).for_context("reaction");
//!
//! assert_eq!(reaction.roll(0.4), reaction_again.roll(0.4));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::ops::RangeInclusive;

/// Deterministic RNG backed by ChaCha8.
///
/// Serializes as its [`GameRngState`], so any structure holding a `GameRng`
/// can derive serde directly.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(into = "GameRngState", from = "GameRngState")]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an independent stream for a specific context.
    ///
    /// The same context always produces the same stream from the same seed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Seed this stream was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform integer in an inclusive range.
    pub fn gen_range_u32(&mut self, range: RangeInclusive<u32>) -> u32 {
        self.inner.gen_range(range)
    }

    /// Bernoulli trial. Probabilities outside `[0, 1]` are clamped.
    pub fn roll(&mut self, probability: f64) -> bool {
        let p = if probability.is_nan() { 0.0 } else { probability.clamp(0.0, 1.0) };
        self.inner.gen_bool(p)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Choose an index with weighted probability.
    ///
    /// Weights do not need to sum to 1.0. Returns `None` if weights are
    /// empty or all zero.
    pub fn choose_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }

        let mut threshold = self.inner.gen::<f64>() * total;
        let mut last_positive = None;

        for (i, &weight) in weights.iter().enumerate() {
            if weight <= 0.0 {
                continue;
            }
            last_positive = Some(i);
            threshold -= weight;
            if threshold <= 0.0 {
                return Some(i);
            }
        }

        // Floating point edge case
        last_positive
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl From<GameRng> for GameRngState {
    fn from(rng: GameRng) -> Self {
        rng.state()
    }
}

impl From<GameRngState> for GameRng {
    fn from(state: GameRngState) -> Self {
        GameRng::from_state(&state)
    }
}

/// Serializable RNG state.
///
/// Uses the ChaCha8 word position, so capture is O(1) regardless of how
/// many numbers were drawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Stream seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}
