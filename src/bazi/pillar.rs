//! Stems, branches, pillars and four-pillar charts.

use serde::{Deserialize, Serialize};

use super::element::Element;

/// The ten Heavenly Stems.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeavenlyStem {
    Jia,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

impl HeavenlyStem {
    /// All stems in order.
    pub const ALL: [HeavenlyStem; 10] = [
        HeavenlyStem::Jia,
        HeavenlyStem::Yi,
        HeavenlyStem::Bing,
        HeavenlyStem::Ding,
        HeavenlyStem::Wu,
        HeavenlyStem::Ji,
        HeavenlyStem::Geng,
        HeavenlyStem::Xin,
        HeavenlyStem::Ren,
        HeavenlyStem::Gui,
    ];

    /// Position in the stem sequence (0-based).
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Element of the stem. Stems come in yang/yin pairs per element.
    #[must_use]
    pub const fn element(self) -> Element {
        match self {
            HeavenlyStem::Jia | HeavenlyStem::Yi => Element::Wood,
            HeavenlyStem::Bing | HeavenlyStem::Ding => Element::Fire,
            HeavenlyStem::Wu | HeavenlyStem::Ji => Element::Earth,
            HeavenlyStem::Geng | HeavenlyStem::Xin => Element::Metal,
            HeavenlyStem::Ren | HeavenlyStem::Gui => Element::Water,
        }
    }

    /// Yang stems sit at even positions.
    #[must_use]
    pub fn is_yang(self) -> bool {
        self.index() % 2 == 0
    }
}

/// The twelve Earthly Branches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EarthlyBranch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

impl EarthlyBranch {
    /// All branches in order.
    pub const ALL: [EarthlyBranch; 12] = [
        EarthlyBranch::Zi,
        EarthlyBranch::Chou,
        EarthlyBranch::Yin,
        EarthlyBranch::Mao,
        EarthlyBranch::Chen,
        EarthlyBranch::Si,
        EarthlyBranch::Wu,
        EarthlyBranch::Wei,
        EarthlyBranch::Shen,
        EarthlyBranch::You,
        EarthlyBranch::Xu,
        EarthlyBranch::Hai,
    ];

    /// Position in the branch sequence (0-based).
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Element of the branch.
    #[must_use]
    pub const fn element(self) -> Element {
        match self {
            EarthlyBranch::Yin | EarthlyBranch::Mao => Element::Wood,
            EarthlyBranch::Si | EarthlyBranch::Wu => Element::Fire,
            EarthlyBranch::Shen | EarthlyBranch::You => Element::Metal,
            EarthlyBranch::Hai | EarthlyBranch::Zi => Element::Water,
            EarthlyBranch::Chen | EarthlyBranch::Wei | EarthlyBranch::Xu | EarthlyBranch::Chou => {
                Element::Earth
            }
        }
    }

    /// Season of the branch when it stands in the month pillar.
    #[must_use]
    pub const fn season(self) -> Season {
        match self {
            EarthlyBranch::Yin | EarthlyBranch::Mao | EarthlyBranch::Chen => Season::Spring,
            EarthlyBranch::Si | EarthlyBranch::Wu | EarthlyBranch::Wei => Season::Summer,
            EarthlyBranch::Shen | EarthlyBranch::You | EarthlyBranch::Xu => Season::Autumn,
            EarthlyBranch::Hai | EarthlyBranch::Zi | EarthlyBranch::Chou => Season::Winter,
        }
    }
}

/// Season derived from the month branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Element in command during the season.
    #[must_use]
    pub const fn ruling_element(self) -> Element {
        match self {
            Season::Spring => Element::Wood,
            Season::Summer => Element::Fire,
            Season::Autumn => Element::Metal,
            Season::Winter => Element::Water,
        }
    }
}

/// One pillar: a stem over a branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pillar {
    pub stem: HeavenlyStem,
    pub branch: EarthlyBranch,
}

impl Pillar {
    /// Create a pillar.
    #[must_use]
    pub const fn new(stem: HeavenlyStem, branch: EarthlyBranch) -> Self {
        Self { stem, branch }
    }

    /// Pillar at position `n` of the sixty-pillar sequence (甲子 = 0).
    ///
    /// ```
    /// use bazi_duel::bazi::{EarthlyBranch, HeavenlyStem, Pillar};
    ///
    /// assert_eq!(Pillar::sexagenary(0), Pillar::new(HeavenlyStem::Jia, EarthlyBranch::Zi));
    /// assert_eq!(Pillar::sexagenary(59), Pillar::new(HeavenlyStem::Gui, EarthlyBranch::Hai));
    /// ```
    #[must_use]
    pub fn sexagenary(n: usize) -> Self {
        let n = n % 60;
        Self {
            stem: HeavenlyStem::ALL[n % 10],
            branch: EarthlyBranch::ALL[n % 12],
        }
    }
}

impl std::fmt::Display for Pillar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}-{:?}", self.stem, self.branch)
    }
}

/// Position of a pillar inside a chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PillarSlot {
    Year,
    Month,
    Day,
    Hour,
}

impl PillarSlot {
    /// All slots in chart order.
    pub const ALL: [PillarSlot; 4] = [
        PillarSlot::Year,
        PillarSlot::Month,
        PillarSlot::Day,
        PillarSlot::Hour,
    ];

    /// Position in chart order.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A four-pillar birth chart. Immutable once assigned to a side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chart {
    pub year: Pillar,
    pub month: Pillar,
    pub day: Pillar,
    pub hour: Pillar,
}

impl Chart {
    /// Create a chart from its four pillars.
    #[must_use]
    pub const fn new(year: Pillar, month: Pillar, day: Pillar, hour: Pillar) -> Self {
        Self { year, month, day, hour }
    }

    /// Default chart for the player side: 甲子 丙寅 戊辰 庚申.
    #[must_use]
    pub const fn default_player() -> Self {
        Self::new(
            Pillar::new(HeavenlyStem::Jia, EarthlyBranch::Zi),
            Pillar::new(HeavenlyStem::Bing, EarthlyBranch::Yin),
            Pillar::new(HeavenlyStem::Wu, EarthlyBranch::Chen),
            Pillar::new(HeavenlyStem::Geng, EarthlyBranch::Shen),
        )
    }

    /// Default chart for the opponent side: 癸亥 辛酉 壬午 丁未.
    #[must_use]
    pub const fn default_opponent() -> Self {
        Self::new(
            Pillar::new(HeavenlyStem::Gui, EarthlyBranch::Hai),
            Pillar::new(HeavenlyStem::Xin, EarthlyBranch::You),
            Pillar::new(HeavenlyStem::Ren, EarthlyBranch::Wu),
            Pillar::new(HeavenlyStem::Ding, EarthlyBranch::Wei),
        )
    }

    /// The four pillars in chart order.
    #[must_use]
    pub fn pillars(&self) -> [Pillar; 4] {
        [self.year, self.month, self.day, self.hour]
    }

    /// Pillar at a slot.
    #[must_use]
    pub fn pillar(&self, slot: PillarSlot) -> Pillar {
        match slot {
            PillarSlot::Year => self.year,
            PillarSlot::Month => self.month,
            PillarSlot::Day => self.day,
            PillarSlot::Hour => self.hour,
        }
    }

    /// The day stem, which stands for the chart's owner.
    #[must_use]
    pub fn day_master(&self) -> HeavenlyStem {
        self.day.stem
    }

    /// The four branches in chart order.
    #[must_use]
    pub fn branches(&self) -> [EarthlyBranch; 4] {
        [self.year.branch, self.month.branch, self.day.branch, self.hour.branch]
    }

    /// The four stems in chart order.
    #[must_use]
    pub fn stems(&self) -> [HeavenlyStem; 4] {
        [self.year.stem, self.month.stem, self.day.stem, self.hour.stem]
    }
}

impl Default for Chart {
    fn default() -> Self {
        Self::default_player()
    }
}

impl std::fmt::Display for Chart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} {}", self.year, self.month, self.day, self.hour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stem_elements_and_polarity() {
        assert_eq!(HeavenlyStem::Jia.element(), Element::Wood);
        assert_eq!(HeavenlyStem::Gui.element(), Element::Water);
        assert!(HeavenlyStem::Jia.is_yang());
        assert!(!HeavenlyStem::Yi.is_yang());
        assert!(HeavenlyStem::Ren.is_yang());
    }

    #[test]
    fn test_branch_elements() {
        let earth: Vec<_> = EarthlyBranch::ALL
            .into_iter()
            .filter(|b| b.element() == Element::Earth)
            .collect();
        assert_eq!(
            earth,
            vec![EarthlyBranch::Chou, EarthlyBranch::Chen, EarthlyBranch::Wei, EarthlyBranch::Xu]
        );
    }

    #[test]
    fn test_seasons() {
        assert_eq!(EarthlyBranch::Yin.season(), Season::Spring);
        assert_eq!(EarthlyBranch::You.season(), Season::Autumn);
        assert_eq!(EarthlyBranch::Chou.season(), Season::Winter);
        assert_eq!(Season::Summer.ruling_element(), Element::Fire);
    }

    #[test]
    fn test_sexagenary_wraps() {
        assert_eq!(Pillar::sexagenary(60), Pillar::sexagenary(0));
        assert_eq!(
            Pillar::sexagenary(10),
            Pillar::new(HeavenlyStem::Jia, EarthlyBranch::Xu)
        );
    }

    #[test]
    fn test_chart_accessors() {
        let chart = Chart::default_player();
        assert_eq!(chart.day_master(), HeavenlyStem::Wu);
        assert_eq!(chart.pillar(PillarSlot::Hour).branch, EarthlyBranch::Shen);
        assert_eq!(chart.branches()[1], EarthlyBranch::Yin);
        assert_eq!(chart.stems()[0], HeavenlyStem::Jia);
        assert_eq!(format!("{}", chart), "Jia-Zi Bing-Yin Wu-Chen Geng-Shen");
    }
}
