//! Parking slot type definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of slots seeded on first run
pub const DEFAULT_SLOT_COUNT: u32 = 20;

/// Slot number, starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(pub u32);

impl SlotId {
    pub fn get(self) -> u32 {
        self.0
    }

    /// Zero-based (row, column) of this slot in a grid `columns` wide
    pub fn grid_position(self, columns: u32) -> (u32, u32) {
        let index = self.0.saturating_sub(1);
        (index / columns, index % columns)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A parking slot and whether a car currently holds it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: SlotId,
    pub occupied: bool,
}

/// Occupied/total counts over the slot pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Occupancy {
    pub occupied: usize,
    pub total: usize,
}

impl Occupancy {
    pub fn from_slots(slots: &[Slot]) -> Self {
        Self {
            occupied: slots.iter().filter(|s| s.occupied).count(),
            total: slots.len(),
        }
    }

    pub fn free(&self) -> usize {
        self.total - self.occupied
    }

    pub fn is_full(&self) -> bool {
        self.occupied >= self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_position() {
        assert_eq!(SlotId(1).grid_position(5), (0, 0));
        assert_eq!(SlotId(5).grid_position(5), (0, 4));
        assert_eq!(SlotId(6).grid_position(5), (1, 0));
        assert_eq!(SlotId(20).grid_position(5), (3, 4));
    }

    #[test]
    fn test_occupancy() {
        let slots = vec![
            Slot { id: SlotId(1), occupied: true },
            Slot { id: SlotId(2), occupied: false },
            Slot { id: SlotId(3), occupied: true },
        ];
        let occupancy = Occupancy::from_slots(&slots);
        assert_eq!(occupancy.occupied, 2);
        assert_eq!(occupancy.free(), 1);
        assert!(!occupancy.is_full());
    }
}
