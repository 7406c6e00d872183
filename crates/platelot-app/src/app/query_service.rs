//! Query Service - read-only views of the lot for display

use platelot_domain::repository::LedgerRepository;
use platelot_domain::{HistoryRecord, Ledger, Occupancy, SlotId};
use platelot_types::Result;
use serde::Serialize;

/// Slot grid width used by every view
pub const GRID_COLUMNS: u32 = 5;

/// One slot with its grid cell and current holder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotView {
    pub id: SlotId,
    pub occupied: bool,
    pub row: u32,
    pub column: u32,
    /// Plate of the session bound to this slot, if any
    pub plate: Option<String>,
}

/// Everything the slot grid and the exit panel show
#[derive(Debug, Clone, Serialize)]
pub struct LotSnapshot {
    pub slots: Vec<SlotView>,
    pub occupancy: Occupancy,
    pub recent_exits: Vec<HistoryRecord>,
    /// Sessions recorded while the lot was full
    pub waiting: Vec<String>,
}

impl LotSnapshot {
    pub fn load<R: LedgerRepository>(ledger: &Ledger<R>, history_limit: usize) -> Result<Self> {
        let slots = ledger.slots()?;
        let sessions = ledger.open_sessions()?;

        let views = slots
            .iter()
            .map(|slot| {
                let (row, column) = slot.id.grid_position(GRID_COLUMNS);
                SlotView {
                    id: slot.id,
                    occupied: slot.occupied,
                    row,
                    column,
                    plate: sessions
                        .iter()
                        .find(|s| s.slot == Some(slot.id))
                        .map(|s| s.plate.clone()),
                }
            })
            .collect();

        let waiting = sessions
            .iter()
            .filter(|s| s.slot.is_none())
            .map(|s| s.plate.clone())
            .collect();

        Ok(Self {
            slots: views,
            occupancy: Occupancy::from_slots(&slots),
            recent_exits: ledger.recent_exits(history_limit)?,
            waiting,
        })
    }

    /// Number of grid rows needed for the slot pool
    pub fn grid_rows(&self) -> u32 {
        self.slots.iter().map(|s| s.row + 1).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use platelot_domain::repository::MemoryLedgerRepository;

    #[test]
    fn test_snapshot() {
        let t0 = NaiveDate::from_ymd_opt(2024, 2, 2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let ledger = Ledger::new(MemoryLedgerRepository::with_slots(7));
        for plate in ["A1", "B2", "C3"] {
            ledger.process_detection(plate, t0).unwrap();
        }
        ledger.process_detection("B2", t0 + Duration::minutes(9)).unwrap();

        let snapshot = LotSnapshot::load(&ledger, 10).unwrap();
        assert_eq!(snapshot.occupancy.occupied, 2);
        assert_eq!(snapshot.grid_rows(), 2);
        assert_eq!(snapshot.slots[0].plate.as_deref(), Some("A1"));
        assert_eq!(snapshot.slots[1].plate, None);
        assert_eq!(snapshot.slots[6].row, 1);
        assert_eq!(snapshot.slots[6].column, 1);
        assert_eq!(snapshot.recent_exits.len(), 1);
        assert_eq!(snapshot.recent_exits[0].duration.to_string(), "0:09:00");
        assert!(snapshot.waiting.is_empty());
    }
}
