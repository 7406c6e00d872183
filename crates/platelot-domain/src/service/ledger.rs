//! Parking ledger
//!
//! Decides whether a detected plate is entering or leaving and updates
//! slots, open sessions and exit history in one unit of work:
//!
//! - an open session for the plate means the car is leaving: its slot is
//!   freed, the session is closed and a history record is appended
//! - otherwise the car is entering and gets the lowest-numbered free slot
//! - with no free slot, a session without a slot is still recorded, so the
//!   next detection of that plate is treated as its exit

use chrono::{NaiveDateTime, SubsecRound};
use log::{debug, info};
use platelot_types::Result;

use crate::model::{HistoryRecord, Occupancy, Outcome, Session, Slot};
use crate::repository::LedgerRepository;

pub struct Ledger<R> {
    repo: R,
}

impl<R: LedgerRepository> Ledger<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Apply one detection of `plate` (already normalized) at `now`
    pub fn process_detection(&self, plate: &str, now: NaiveDateTime) -> Result<Outcome> {
        let now = now.trunc_subsecs(0);

        let outcome = self.repo.unit_of_work(|unit| {
            if let Some(session) = unit.latest_session(plate)? {
                if let Some(slot) = session.slot {
                    unit.set_occupied(slot, false)?;
                }
                unit.remove_session(session.id)?;

                let record = HistoryRecord::close(&session, now);
                unit.append_history(&record)?;

                return Ok(Outcome::Exited {
                    slot: session.slot,
                    duration: record.duration,
                });
            }

            match unit.first_free_slot()? {
                Some(slot) => {
                    unit.set_occupied(slot, true)?;
                    unit.insert_session(plate, now, Some(slot))?;
                    Ok(Outcome::Entered { slot })
                }
                None => {
                    unit.insert_session(plate, now, None)?;
                    Ok(Outcome::LotFull)
                }
            }
        })?;

        info!("Plate '{}' at {}: {}", plate, now, outcome.label());
        debug!("Ledger outcome: {:?}", outcome);
        Ok(outcome)
    }

    pub fn slots(&self) -> Result<Vec<Slot>> {
        self.repo.slots()
    }

    pub fn occupancy(&self) -> Result<Occupancy> {
        Ok(Occupancy::from_slots(&self.repo.slots()?))
    }

    pub fn open_sessions(&self) -> Result<Vec<Session>> {
        self.repo.open_sessions()
    }

    pub fn recent_exits(&self, limit: usize) -> Result<Vec<HistoryRecord>> {
        self.repo.recent_exits(limit)
    }
}
