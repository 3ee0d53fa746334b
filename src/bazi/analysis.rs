//! Pure chart analysis.
//!
//! `BaziEngine` is a stateless service: every function takes a borrowed
//! [`Chart`] and returns a value, nothing is cached.
//!
//! ## Sections
//!
//! - Element tallies over the eight characters
//! - Season and day-master strength
//! - Branch combinations (six harmonies, three harmonies, six clashes)

use serde::{Deserialize, Serialize};

use super::element::{Element, ElementCounts};
use super::pillar::{Chart, EarthlyBranch, Season};

/// Supporting characters needed for a strong day master.
const STRONG_SUPPORT: u32 = 4;

/// At or below this many supporting characters the day master is weak.
const WEAK_SUPPORT: u32 = 2;

const SIX_HARMONIES: [(EarthlyBranch, EarthlyBranch); 6] = [
    (EarthlyBranch::Zi, EarthlyBranch::Chou),
    (EarthlyBranch::Yin, EarthlyBranch::Hai),
    (EarthlyBranch::Mao, EarthlyBranch::Xu),
    (EarthlyBranch::Chen, EarthlyBranch::You),
    (EarthlyBranch::Si, EarthlyBranch::Shen),
    (EarthlyBranch::Wu, EarthlyBranch::Wei),
];

const SIX_CLASHES: [(EarthlyBranch, EarthlyBranch); 6] = [
    (EarthlyBranch::Zi, EarthlyBranch::Wu),
    (EarthlyBranch::Chou, EarthlyBranch::Wei),
    (EarthlyBranch::Yin, EarthlyBranch::Shen),
    (EarthlyBranch::Mao, EarthlyBranch::You),
    (EarthlyBranch::Chen, EarthlyBranch::Xu),
    (EarthlyBranch::Si, EarthlyBranch::Hai),
];

/// Strength of the day master.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayMasterStrength {
    Weak,
    Balanced,
    Strong,
}

/// Stateless chart analysis.
pub struct BaziEngine;

impl BaziEngine {
    /// Element tally over all eight characters (four stems, four branches).
    ///
    /// ```
    /// use bazi_duel::bazi::{BaziEngine, Chart, Element};
    ///
    /// let tally = BaziEngine::tally(&Chart::default_opponent());
    /// assert_eq!(tally.total(), 8);
    /// assert_eq!(tally.get(Element::Water), 3);
    /// assert_eq!(tally.get(Element::Wood), 0);
    /// ```
    #[must_use]
    pub fn tally(chart: &Chart) -> ElementCounts {
        chart
            .pillars()
            .iter()
            .flat_map(|p| [p.stem.element(), p.branch.element()])
            .collect()
    }

    /// Season given by the month branch.
    #[must_use]
    pub fn season(chart: &Chart) -> Season {
        chart.month.branch.season()
    }

    /// Element of the day stem.
    #[must_use]
    pub fn day_master_element(chart: &Chart) -> Element {
        chart.day_master().element()
    }

    /// Characters (other than the day stem itself) that share or feed the
    /// day master's element, plus one when the season is in its favour.
    #[must_use]
    pub fn day_master_support(chart: &Chart) -> u32 {
        let master = Self::day_master_element(chart);
        let supports = |e: Element| e == master || e.generates() == master;

        let [year, month, day, hour] = chart.pillars();
        let characters = [
            year.stem.element(),
            year.branch.element(),
            month.stem.element(),
            month.branch.element(),
            day.branch.element(),
            hour.stem.element(),
            hour.branch.element(),
        ];

        let mut support = characters.into_iter().filter(|e| supports(*e)).count() as u32;
        if supports(Self::season(chart).ruling_element()) {
            support += 1;
        }
        support
    }

    /// Classify the day master as weak, balanced or strong.
    #[must_use]
    pub fn strength(chart: &Chart) -> DayMasterStrength {
        let support = Self::day_master_support(chart);
        if support >= STRONG_SUPPORT {
            DayMasterStrength::Strong
        } else if support <= WEAK_SUPPORT {
            DayMasterStrength::Weak
        } else {
            DayMasterStrength::Balanced
        }
    }

    /// Whether the chart holds both branches of a pair. Asking for the same
    /// branch twice requires it to appear at least twice.
    #[must_use]
    pub fn has_branch_pair(chart: &Chart, a: EarthlyBranch, b: EarthlyBranch) -> bool {
        let branches = chart.branches();
        let count = |x: EarthlyBranch| branches.iter().filter(|b| **b == x).count();
        if a == b {
            count(a) >= 2
        } else {
            count(a) > 0 && count(b) > 0
        }
    }

    /// Whether any of the six harmony pairs is present.
    #[must_use]
    pub fn has_six_harmony(chart: &Chart) -> bool {
        SIX_HARMONIES
            .iter()
            .any(|(a, b)| Self::has_branch_pair(chart, *a, *b))
    }

    /// Whether any of the six clash pairs is present.
    #[must_use]
    pub fn has_six_clash(chart: &Chart) -> bool {
        SIX_CLASHES
            .iter()
            .any(|(a, b)| Self::has_branch_pair(chart, *a, *b))
    }

    /// Branches forming the three-harmony frame of an element.
    /// Earth has no frame.
    #[must_use]
    pub fn three_harmony_frame(element: Element) -> Option<[EarthlyBranch; 3]> {
        match element {
            Element::Water => Some([EarthlyBranch::Shen, EarthlyBranch::Zi, EarthlyBranch::Chen]),
            Element::Wood => Some([EarthlyBranch::Hai, EarthlyBranch::Mao, EarthlyBranch::Wei]),
            Element::Fire => Some([EarthlyBranch::Yin, EarthlyBranch::Wu, EarthlyBranch::Xu]),
            Element::Metal => Some([EarthlyBranch::Si, EarthlyBranch::You, EarthlyBranch::Chou]),
            Element::Earth => None,
        }
    }

    /// Whether all three branches of an element's frame are present.
    #[must_use]
    pub fn has_three_harmony(chart: &Chart, element: Element) -> bool {
        let branches = chart.branches();
        Self::three_harmony_frame(element)
            .is_some_and(|frame| frame.iter().all(|b| branches.contains(b)))
    }
}
