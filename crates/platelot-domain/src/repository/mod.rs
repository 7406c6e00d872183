//! Repository trait definitions for ledger persistence

mod memory;

pub use memory::MemoryLedgerRepository;

use chrono::NaiveDateTime;

use crate::model::{HistoryRecord, Session, SessionId, Slot, SlotId};
use platelot_types::Error;

/// Reads and writes available inside one unit of work.
///
/// Every change made through a unit is committed together, or not at all
/// when the work returns an error.
pub trait LedgerUnit {
    /// Most recent open session for `plate` (latest entry, then latest insert)
    fn latest_session(&mut self, plate: &str) -> Result<Option<Session>, Error>;

    /// Lowest-numbered slot that is not occupied
    fn first_free_slot(&mut self) -> Result<Option<SlotId>, Error>;

    /// Set the occupancy flag of one slot
    fn set_occupied(&mut self, slot: SlotId, occupied: bool) -> Result<(), Error>;

    /// Record a new open session
    fn insert_session(
        &mut self,
        plate: &str,
        entered_at: NaiveDateTime,
        slot: Option<SlotId>,
    ) -> Result<Session, Error>;

    /// Remove exactly one open session
    fn remove_session(&mut self, id: SessionId) -> Result<(), Error>;

    /// Append an exit to the history
    fn append_history(&mut self, record: &HistoryRecord) -> Result<(), Error>;
}

/// Storage for slots, open sessions and exit history
pub trait LedgerRepository {
    /// Run `work` as a single atomic unit
    fn unit_of_work<T, F>(&self, work: F) -> Result<T, Error>
    where
        F: FnOnce(&mut dyn LedgerUnit) -> Result<T, Error>;

    /// Seed slots `1..=count` as free if the pool is empty.
    /// Returns `true` when seeding happened.
    fn seed_slots(&self, count: u32) -> Result<bool, Error>;

    /// All slots in ascending order
    fn slots(&self) -> Result<Vec<Slot>, Error>;

    /// All open sessions, newest entry first
    fn open_sessions(&self) -> Result<Vec<Session>, Error>;

    /// Most recent exits, newest exit first
    fn recent_exits(&self, limit: usize) -> Result<Vec<HistoryRecord>, Error>;
}
