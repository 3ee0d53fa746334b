//! The five elements (Wu Xing) and their relations.
//!
//! ## Generating cycle
//!
//! wood → fire → earth → metal → water → wood
//!
//! ## Overcoming cycle
//!
//! metal → wood → earth → water → fire → metal

use serde::{Deserialize, Serialize};

/// One of the five elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

impl Element {
    /// All elements in generating order.
    pub const ALL: [Element; 5] = [
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Water,
    ];

    /// The overcoming cycle, starting from metal.
    pub const OVERCOMING_CYCLE: [Element; 5] = [
        Element::Metal,
        Element::Wood,
        Element::Earth,
        Element::Water,
        Element::Fire,
    ];

    /// Storage index in generating order.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Element::Wood => 0,
            Element::Fire => 1,
            Element::Earth => 2,
            Element::Metal => 3,
            Element::Water => 4,
        }
    }

    /// The element this one produces.
    #[must_use]
    pub const fn generates(self) -> Element {
        match self {
            Element::Wood => Element::Fire,
            Element::Fire => Element::Earth,
            Element::Earth => Element::Metal,
            Element::Metal => Element::Water,
            Element::Water => Element::Wood,
        }
    }

    /// The element that produces this one.
    #[must_use]
    pub const fn generated_by(self) -> Element {
        match self {
            Element::Wood => Element::Water,
            Element::Fire => Element::Wood,
            Element::Earth => Element::Fire,
            Element::Metal => Element::Earth,
            Element::Water => Element::Metal,
        }
    }

    /// The element this one overcomes.
    ///
    /// ```
    /// use bazi_duel::bazi::Element;
    ///
    /// assert_eq!(Element::Metal.overcomes(), Element::Wood);
    /// assert_eq!(Element::Fire.overcomes(), Element::Metal);
    /// ```
    #[must_use]
    pub const fn overcomes(self) -> Element {
        match self {
            Element::Metal => Element::Wood,
            Element::Wood => Element::Earth,
            Element::Earth => Element::Water,
            Element::Water => Element::Fire,
            Element::Fire => Element::Metal,
        }
    }

    /// The element that overcomes this one.
    #[must_use]
    pub const fn overcome_by(self) -> Element {
        match self {
            Element::Wood => Element::Metal,
            Element::Earth => Element::Wood,
            Element::Water => Element::Earth,
            Element::Fire => Element::Water,
            Element::Metal => Element::Fire,
        }
    }

    /// How `self` relates to `other`.
    #[must_use]
    pub fn relation_to(self, other: Element) -> Relation {
        if self == other {
            Relation::Same
        } else if self.generates() == other {
            Relation::Generates
        } else if other.generates() == self {
            Relation::GeneratedBy
        } else if self.overcomes() == other {
            Relation::Overcomes
        } else {
            Relation::OvercomeBy
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Element::Wood => "wood",
            Element::Fire => "fire",
            Element::Earth => "earth",
            Element::Metal => "metal",
            Element::Water => "water",
        };
        f.write_str(name)
    }
}

/// Relation between two elements, from the first one's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    Same,
    Generates,
    GeneratedBy,
    Overcomes,
    OvercomeBy,
}

/// Count per element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementCounts {
    counts: [u32; 5],
}

impl ElementCounts {
    /// Empty tally.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count for one element.
    #[must_use]
    pub fn get(&self, element: Element) -> u32 {
        self.counts[element.index()]
    }

    /// Add `amount` to one element.
    pub fn add(&mut self, element: Element, amount: u32) {
        self.counts[element.index()] += amount;
    }

    /// Sum over all elements.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// The element with the strictly highest count, if there is one.
    #[must_use]
    pub fn dominant(&self) -> Option<Element> {
        let max = self.counts.iter().copied().max().unwrap_or(0);
        if max == 0 {
            return None;
        }
        let mut leaders = Element::ALL.into_iter().filter(|e| self.get(*e) == max);
        let first = leaders.next();
        match leaders.next() {
            Some(_) => None,
            None => first,
        }
    }

    /// Elements with a zero count.
    pub fn missing(&self) -> impl Iterator<Item = Element> + '_ {
        Element::ALL.into_iter().filter(|e| self.get(*e) == 0)
    }

    /// Iterate over (element, count) pairs in generating order.
    pub fn iter(&self) -> impl Iterator<Item = (Element, u32)> + '_ {
        Element::ALL.into_iter().map(|e| (e, self.get(e)))
    }
}

impl FromIterator<Element> for ElementCounts {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        let mut counts = Self::new();
        for element in iter {
            counts.add(element, 1);
        }
        counts
    }
}
