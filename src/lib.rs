//! # bazi-duel
//!
//! A real-time, two-sided card battle engine themed on Four-Pillars (BaZi)
//! astrology. A player and an AI opponent each have eight life, a birth
//! chart, a hand and a row of four battlefield slots.
//!
//! ## Design Principles
//!
//! 1. **Single Owner**: All mutable state lives in `SessionState`, owned by
//!    `Session`. Rule components are stateless services over borrowed
//!    state.
//!
//! 2. **Deterministic Time**: Time is integer milliseconds advanced by a
//!    fixed tick. Delayed work is a scheduled `(fire_at, action)` entry, not
//!    a callback, so a seed plus a command sequence replays exactly.
//!
//! 3. **Commands In, Events Out**: Presentation layers submit `Command`s
//!    and drain `Event`s. The engine never calls into them.
//!
//! ## Modules
//!
//! - `core`: Sides, entity ids, RNG, configuration, per-side state
//! - `bazi`: Elements, pillars, charts, chart analysis, conditions
//! - `cards`: Card definitions, instances and the catalog
//! - `life`: Life-element generation, upkeep and burn-out
//! - `battlefield`: The eight shared slots
//! - `effects`: Effect targets, allocation and resolution
//! - `neutralization`: Wu Xing overcoming between resident cards
//! - `scheduler`: Clock, priority, pause state and timers
//! - `ai`: Opponent policies
//! - `session`: The controller tying everything together

pub mod core;
pub mod error;
pub mod bazi;
pub mod cards;
pub mod life;
pub mod battlefield;
pub mod effects;
pub mod neutralization;
pub mod scheduler;
pub mod ai;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    EntityId, SideId, SideMap,
    GameRng, GameRngState,
    EngineConfig, ConfigError, Side,
    MAX_LIFE,
};

pub use crate::error::{BlockReason, EngineError};

pub use crate::bazi::{
    BaziEngine, Chart, Condition, ConditionEvaluator, Element, PillarSlot,
};

pub use crate::cards::{Card, CardCatalog, CardCategory, CardDefinition, CardId};

pub use crate::life::LifeElementEngine;

pub use crate::battlefield::{BattlefieldState, PlacedCard};

pub use crate::effects::{
    ActionKind, EffectResolver, PendingEffect, Target, TargetId, TargetKind, TargetResolver,
};

pub use crate::neutralization::NeutralizationEngine;

pub use crate::scheduler::{GameClock, PauseReason, RealtimeScheduler, TimerAction};

pub use crate::ai::{AiAction, OpponentConfig, OpponentPolicy, RuleBasedOpponent};

pub use crate::session::{
    Command, Event, Phase, PersistError, Session, SessionBuilder, SessionSnapshot,
};
