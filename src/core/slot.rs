//! Slot indices for the three card positions.
//!
//! ## Slot
//!
//! Type-safe index over the three positions a card can occupy.
//! Slots are 0-based and serialize as their bare integer so persisted
//! rows match historical logs.

use serde::{Deserialize, Serialize};

/// Number of card positions in a round.
pub const SLOT_COUNT: u8 = 3;

/// Card position identifier, always in `0..3`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slot(u8);

impl Slot {
    /// Create a new slot.
    ///
    /// Panics if `index` is not in `0..3`. Use [`Slot::try_new`] for
    /// unvalidated input.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        assert!(index < SLOT_COUNT, "Slot index must be in 0..3");
        Self(index)
    }

    /// Create a slot from unvalidated input.
    #[must_use]
    pub fn try_new(index: u8) -> Option<Self> {
        (index < SLOT_COUNT).then(|| Self(index))
    }

    /// Get the raw 0-based index.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Get the index as a usize.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all three slots in order.
    pub fn all() -> impl Iterator<Item = Slot> {
        (0..SLOT_COUNT).map(Slot)
    }

    /// Iterate over the two slots other than this one.
    pub fn others(self) -> impl Iterator<Item = Slot> {
        Slot::all().filter(move |s| *s != self)
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card {}", self.0)
    }
}
