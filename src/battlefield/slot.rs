//! Slot layout and placed cards.
//!
//! Slots 0-3 form the opponent row, slots 4-7 the player row.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::SideId;

/// Number of battlefield slots.
pub const SLOT_COUNT: usize = 8;

/// Slots per row.
pub const ROW_SIZE: u8 = 4;

/// Side whose row contains `slot`, or `None` for an out-of-range index.
///
/// ```
/// use bazi_duel::battlefield::row_owner;
/// use bazi_duel::core::SideId;
///
/// assert_eq!(row_owner(0), Some(SideId::Opponent));
/// assert_eq!(row_owner(7), Some(SideId::Player));
/// assert_eq!(row_owner(8), None);
/// ```
#[must_use]
pub fn row_owner(slot: u8) -> Option<SideId> {
    match slot {
        0..=3 => Some(SideId::Opponent),
        4..=7 => Some(SideId::Player),
        _ => None,
    }
}

/// Slots in a side's row, left to right.
pub fn row(side: SideId) -> impl Iterator<Item = u8> {
    let start = match side {
        SideId::Opponent => 0,
        SideId::Player => ROW_SIZE,
    };
    start..start + ROW_SIZE
}

/// A card resident in a slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedCard {
    pub card: Card,
    pub owner: SideId,

    /// Inert and waiting for its scheduled discard.
    pub neutralized: bool,

    /// Transient marker left by a Buff allocation.
    pub buffed: bool,

    /// Set once the card has held at least one life element.
    pub charged_once: bool,

    /// Session time of placement.
    pub placed_at_ms: u64,
}

impl PlacedCard {
    /// Wrap a card placed by `owner` at `placed_at_ms`.
    #[must_use]
    pub fn new(card: Card, owner: SideId, placed_at_ms: u64) -> Self {
        let charged_once = card.current_life_elements() > 0;
        Self {
            card,
            owner,
            neutralized: false,
            buffed: false,
            charged_once,
            placed_at_ms,
        }
    }

    /// Resident and not neutralized.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.neutralized
    }

    /// Record a charge, so later depletion counts as burn-out.
    pub fn note_charge(&mut self) {
        if self.card.current_life_elements() > 0 {
            self.charged_once = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows() {
        let opponent: Vec<_> = row(SideId::Opponent).collect();
        let player: Vec<_> = row(SideId::Player).collect();
        assert_eq!(opponent, vec![0, 1, 2, 3]);
        assert_eq!(player, vec![4, 5, 6, 7]);

        for slot in player {
            assert_eq!(row_owner(slot), Some(SideId::Player));
        }
    }
}
