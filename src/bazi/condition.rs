//! Appear conditions.
//!
//! A `Condition` is a closed tagged union evaluated against one side's
//! chart. New kinds of checks are added as new variants with their own arm
//! in [`ConditionEvaluator::evaluate`].

use serde::{Deserialize, Serialize};

use super::analysis::{BaziEngine, DayMasterStrength};
use super::element::Element;
use super::pillar::{Chart, EarthlyBranch, Season};

/// Whole-chart patterns.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartPattern {
    /// Day master classified strong.
    StrongDayMaster,
    /// Day master classified weak.
    WeakDayMaster,
    /// Day master neither strong nor weak.
    BalancedDayMaster,
    /// Day stem has this element.
    DayMasterIs(Element),
    /// This element strictly outnumbers every other one.
    DominantElement(Element),
    /// This element does not appear among the eight characters.
    MissingElement(Element),
    /// All five elements appear.
    AllElementsPresent,
}

/// Branch combinations.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BranchCombination {
    /// Any of the six harmony pairs.
    SixHarmony,
    /// Any of the six clash pairs.
    SixClash,
    /// The full three-harmony frame of an element.
    ThreeHarmony(Element),
    /// Two specific branches.
    Pair(EarthlyBranch, EarthlyBranch),
}

/// A condition over one side's chart.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    // === Chart checks ===

    /// Match a whole-chart pattern.
    ChartPattern(ChartPattern),

    /// Match the season of the month branch.
    Season(Season),

    /// At least `min` of the eight characters carry `element`.
    ElementThreshold { element: Element, min: u32 },

    /// Match a branch combination.
    BranchCombination(BranchCombination),

    // === Combinators ===

    /// All conditions must be true.
    All(Vec<Condition>),

    /// At least one condition must be true.
    Any(Vec<Condition>),

    /// Condition must be false.
    Not(Box<Condition>),
}

impl Condition {
    /// Create a chart pattern condition.
    pub fn pattern(pattern: ChartPattern) -> Self {
        Self::ChartPattern(pattern)
    }

    /// Create a season condition.
    pub fn season(season: Season) -> Self {
        Self::Season(season)
    }

    /// Create an element threshold condition.
    pub fn at_least(element: Element, min: u32) -> Self {
        Self::ElementThreshold { element, min }
    }

    /// Create a branch combination condition.
    pub fn branches(combination: BranchCombination) -> Self {
        Self::BranchCombination(combination)
    }

    /// Create an AND condition.
    pub fn all(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self::All(conditions.into_iter().collect())
    }

    /// Create an OR condition.
    pub fn any(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self::Any(conditions.into_iter().collect())
    }

    /// Negate this condition.
    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Combine with another condition (AND).
    #[must_use]
    pub fn and(self, other: Condition) -> Self {
        match self {
            Self::All(mut conditions) => {
                conditions.push(other);
                Self::All(conditions)
            }
            _ => Self::All(vec![self, other]),
        }
    }

    /// Combine with another condition (OR).
    #[must_use]
    pub fn or(self, other: Condition) -> Self {
        match self {
            Self::Any(mut conditions) => {
                conditions.push(other);
                Self::Any(conditions)
            }
            _ => Self::Any(vec![self, other]),
        }
    }
}

/// Evaluates conditions against a chart.
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// Evaluate a single condition.
    #[must_use]
    pub fn evaluate(condition: &Condition, chart: &Chart) -> bool {
        match condition {
            Condition::ChartPattern(pattern) => Self::evaluate_pattern(pattern, chart),

            Condition::Season(season) => BaziEngine::season(chart) == *season,

            Condition::ElementThreshold { element, min } => {
                BaziEngine::tally(chart).get(*element) >= *min
            }

            Condition::BranchCombination(combination) => {
                Self::evaluate_combination(combination, chart)
            }

            Condition::All(conditions) => conditions.iter().all(|c| Self::evaluate(c, chart)),

            Condition::Any(conditions) => conditions.iter().any(|c| Self::evaluate(c, chart)),

            Condition::Not(inner) => !Self::evaluate(inner, chart),
        }
    }

    /// Whether an appear-condition list is met: any one condition suffices,
    /// and an empty list is unconditional.
    #[must_use]
    pub fn any_satisfied(conditions: &[Condition], chart: &Chart) -> bool {
        conditions.is_empty() || conditions.iter().any(|c| Self::evaluate(c, chart))
    }

    fn evaluate_pattern(pattern: &ChartPattern, chart: &Chart) -> bool {
        match pattern {
            ChartPattern::StrongDayMaster => {
                BaziEngine::strength(chart) == DayMasterStrength::Strong
            }
            ChartPattern::WeakDayMaster => BaziEngine::strength(chart) == DayMasterStrength::Weak,
            ChartPattern::BalancedDayMaster => {
                BaziEngine::strength(chart) == DayMasterStrength::Balanced
            }
            ChartPattern::DayMasterIs(element) => BaziEngine::day_master_element(chart) == *element,
            ChartPattern::DominantElement(element) => {
                BaziEngine::tally(chart).dominant() == Some(*element)
            }
            ChartPattern::MissingElement(element) => BaziEngine::tally(chart).get(*element) == 0,
            ChartPattern::AllElementsPresent => BaziEngine::tally(chart).missing().next().is_none(),
        }
    }

    fn evaluate_combination(combination: &BranchCombination, chart: &Chart) -> bool {
        match combination {
            BranchCombination::SixHarmony => BaziEngine::has_six_harmony(chart),
            BranchCombination::SixClash => BaziEngine::has_six_clash(chart),
            BranchCombination::ThreeHarmony(element) => {
                BaziEngine::has_three_harmony(chart, *element)
            }
            BranchCombination::Pair(a, b) => BaziEngine::has_branch_pair(chart, *a, *b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Chart {
        Chart::default_player()
    }

    fn opponent() -> Chart {
        Chart::default_opponent()
    }

    #[test]
    fn test_chart_patterns() {
        let weak = Condition::pattern(ChartPattern::WeakDayMaster);
        assert!(ConditionEvaluator::evaluate(&weak, &player()));
        assert!(!ConditionEvaluator::evaluate(&weak, &opponent()));

        let water = Condition::pattern(ChartPattern::DominantElement(Element::Water));
        assert!(ConditionEvaluator::evaluate(&water, &opponent()));
        assert!(!ConditionEvaluator::evaluate(&water, &player()));

        let no_wood = Condition::pattern(ChartPattern::MissingElement(Element::Wood));
        assert!(ConditionEvaluator::evaluate(&no_wood, &opponent()));

        let complete = Condition::pattern(ChartPattern::AllElementsPresent);
        assert!(ConditionEvaluator::evaluate(&complete, &player()));
        assert!(!ConditionEvaluator::evaluate(&complete, &opponent()));

        let earth_master = Condition::pattern(ChartPattern::DayMasterIs(Element::Earth));
        assert!(ConditionEvaluator::evaluate(&earth_master, &player()));
    }

    #[test]
    fn test_season_and_threshold() {
        assert!(ConditionEvaluator::evaluate(&Condition::season(Season::Spring), &player()));
        assert!(!ConditionEvaluator::evaluate(&Condition::season(Season::Spring), &opponent()));

        assert!(ConditionEvaluator::evaluate(&Condition::at_least(Element::Water, 3), &opponent()));
        assert!(!ConditionEvaluator::evaluate(&Condition::at_least(Element::Water, 4), &opponent()));
    }

    #[test]
    fn test_branch_combinations() {
        let harmony = Condition::branches(BranchCombination::SixHarmony);
        assert!(ConditionEvaluator::evaluate(&harmony, &opponent()));
        assert!(!ConditionEvaluator::evaluate(&harmony, &player()));

        let frame = Condition::branches(BranchCombination::ThreeHarmony(Element::Water));
        assert!(ConditionEvaluator::evaluate(&frame, &player()));

        let pair = Condition::branches(BranchCombination::Pair(EarthlyBranch::Wu, EarthlyBranch::Hai));
        assert!(ConditionEvaluator::evaluate(&pair, &opponent()));
    }

    #[test]
    fn test_combinators() {
        let spring = Condition::season(Season::Spring);
        let clash = Condition::branches(BranchCombination::SixClash);

        let both = spring.clone().and(clash.clone());
        assert!(ConditionEvaluator::evaluate(&both, &player()));
        assert!(!ConditionEvaluator::evaluate(&both, &opponent()));

        let either = Condition::season(Season::Autumn).or(spring.clone());
        assert!(ConditionEvaluator::evaluate(&either, &player()));
        assert!(ConditionEvaluator::evaluate(&either, &opponent()));

        assert!(!ConditionEvaluator::evaluate(&spring.negate(), &player()));
    }

    #[test]
    fn test_any_satisfied() {
        assert!(ConditionEvaluator::any_satisfied(&[], &player()));

        let list = vec![
            Condition::season(Season::Winter),
            Condition::pattern(ChartPattern::WeakDayMaster),
        ];
        assert!(ConditionEvaluator::any_satisfied(&list, &player()));
        assert!(!ConditionEvaluator::any_satisfied(&list, &opponent()));
    }

    #[test]
    fn test_serde_roundtrip() {
        let condition = Condition::any([
            Condition::at_least(Element::Metal, 2),
            Condition::season(Season::Autumn).negate(),
        ]);
        let json = serde_json::to_string(&condition).unwrap();
        let back: Condition = serde_json::from_str(&json).unwrap();
        assert_eq!(condition, back);
    }
}
