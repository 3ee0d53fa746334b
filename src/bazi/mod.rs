//! Four-pillar charts and the five elements.
//!
//! - `element`: Wu Xing elements, relations and tallies
//! - `pillar`: Stems, branches, pillars and charts
//! - `analysis`: `BaziEngine` pure chart analysis
//! - `condition`: Appear conditions and their evaluator

pub mod element;
pub mod pillar;
pub mod analysis;
pub mod condition;

pub use element::{Element, ElementCounts, Relation};
pub use pillar::{Chart, EarthlyBranch, HeavenlyStem, Pillar, PillarSlot, Season};
pub use analysis::{BaziEngine, DayMasterStrength};
pub use condition::{BranchCombination, ChartPattern, Condition, ConditionEvaluator};
