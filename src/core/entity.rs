//! Card instance identification.
//!
//! Every card drawn into a session gets a unique `EntityId`, distinct from
//! its catalog `CardId`: two copies of the same catalog card in one deck are
//! two entities. Ids are never reused within a session; a restart starts a
//! fresh allocation.
//!
//! ```
//! use bazi_duel::core::EntityAllocator;
//!
//! let mut ids = EntityAllocator::default();
//! let a = ids.allocate();
//! let b = ids.allocate();
//! assert_ne!(a, b);
//! assert_eq!(a.raw() + 1, b.raw());
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a card instance within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Create a new entity ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card#{}", self.0)
    }
}

/// Monotonic allocator for entity ids.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityAllocator {
    next: u32,
}

impl EntityAllocator {
    /// Allocate the next unused id.
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    #[must_use]
    pub fn allocated(&self) -> u32 {
        self.next
    }
}
