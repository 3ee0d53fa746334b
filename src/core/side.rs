//! Side identification and per-side data storage.
//!
//! ## SideId
//!
//! The two parties of a session: the human-controlled `Player` and the
//! AI-controlled `Opponent`.
//!
//! ## SideMap
//!
//! Fixed two-entry storage indexed by `SideId`, used for anything that
//! exists once per side (life pools, charts, deck lists).

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two parties of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SideId {
    /// The human-controlled side. Owns battlefield slots 4-7.
    Player,
    /// The AI-controlled side. Owns battlefield slots 0-3.
    Opponent,
}

impl SideId {
    /// Both sides in canonical order.
    pub const ALL: [SideId; 2] = [SideId::Player, SideId::Opponent];

    /// Storage index (Player = 0, Opponent = 1).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            SideId::Player => 0,
            SideId::Opponent => 1,
        }
    }

    /// The other side.
    ///
    /// ```
    /// use bazi_duel::core::SideId;
    ///
    /// assert_eq!(SideId::Player.other(), SideId::Opponent);
    /// assert_eq!(SideId::Opponent.other(), SideId::Player);
    /// ```
    #[must_use]
    pub const fn other(self) -> SideId {
        match self {
            SideId::Player => SideId::Opponent,
            SideId::Opponent => SideId::Player,
        }
    }

    /// Iterate over both sides in canonical order.
    pub fn all() -> impl Iterator<Item = SideId> {
        Self::ALL.into_iter()
    }
}

impl std::fmt::Display for SideId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SideId::Player => write!(f, "Player"),
            SideId::Opponent => write!(f, "Opponent"),
        }
    }
}

/// Per-side data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use bazi_duel::core::{SideId, SideMap};
///
/// let mut life: SideMap<u32> = SideMap::with_value(8);
/// life[SideId::Opponent] = 5;
///
/// assert_eq!(life[SideId::Player], 8);
/// assert_eq!(life[SideId::Opponent], 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    data: [T; 2],
}

impl<T> SideMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(mut factory: impl FnMut(SideId) -> T) -> Self {
        Self {
            data: [factory(SideId::Player), factory(SideId::Opponent)],
        }
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a map with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a side's data.
    #[must_use]
    pub fn get(&self, side: SideId) -> &T {
        &self.data[side.index()]
    }

    /// Get a mutable reference to a side's data.
    pub fn get_mut(&mut self, side: SideId) -> &mut T {
        &mut self.data[side.index()]
    }

    /// Iterate over (SideId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (SideId, &T)> {
        SideId::ALL.into_iter().zip(self.data.iter())
    }

    /// Iterate over (SideId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SideId, &mut T)> {
        SideId::ALL.into_iter().zip(self.data.iter_mut())
    }

    /// Transform every entry, keeping side association.
    pub fn map<U>(&self, mut f: impl FnMut(SideId, &T) -> U) -> SideMap<U> {
        SideMap::new(|side| f(side, self.get(side)))
    }
}

impl<T: Default> Default for SideMap<T> {
    fn default() -> Self {
        Self::with_default()
    }
}

impl<T> Index<SideId> for SideMap<T> {
    type Output = T;

    fn index(&self, side: SideId) -> &Self::Output {
        self.get(side)
    }
}

impl<T> IndexMut<SideId> for SideMap<T> {
    fn index_mut(&mut self, side: SideId) -> &mut Self::Output {
        self.get_mut(side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_index_and_other() {
        assert_eq!(SideId::Player.index(), 0);
        assert_eq!(SideId::Opponent.index(), 1);
        assert_eq!(SideId::Player.other().other(), SideId::Player);
    }

    #[test]
    fn test_all_sides() {
        let sides: Vec<_> = SideId::all().collect();
        assert_eq!(sides, vec![SideId::Player, SideId::Opponent]);
    }

    #[test]
    fn test_side_map_factory() {
        let map = SideMap::new(|side| side.index() * 10);
        assert_eq!(map[SideId::Player], 0);
        assert_eq!(map[SideId::Opponent], 10);
    }

    #[test]
    fn test_side_map_mutation() {
        let mut map: SideMap<u32> = SideMap::with_default();
        map[SideId::Player] += 3;
        *map.get_mut(SideId::Opponent) = 7;

        let collected: Vec<_> = map.iter().map(|(s, v)| (s, *v)).collect();
        assert_eq!(collected, vec![(SideId::Player, 3), (SideId::Opponent, 7)]);
    }

    #[test]
    fn test_side_map_map() {
        let map = SideMap::with_value(4u32);
        let doubled = map.map(|_, v| v * 2);
        assert_eq!(doubled[SideId::Opponent], 8);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", SideId::Player), "Player");
        assert_eq!(format!("{}", SideId::Opponent), "Opponent");
    }

    #[test]
    fn test_serde_roundtrip() {
        let map = SideMap::new(|side| side == SideId::Player);
        let json = serde_json::to_string(&map).unwrap();
        let back: SideMap<bool> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, back);
    }
}
