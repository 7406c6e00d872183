//! In-memory ledger repository

use std::cell::RefCell;
use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use super::{LedgerRepository, LedgerUnit};
use crate::model::{HistoryRecord, Session, SessionId, Slot, SlotId};
use platelot_types::Error;

#[derive(Debug, Clone, Default)]
struct State {
    slots: BTreeMap<SlotId, bool>,
    sessions: Vec<Session>,
    history: Vec<HistoryRecord>,
    next_session_id: i64,
}

impl LedgerUnit for State {
    fn latest_session(&mut self, plate: &str) -> Result<Option<Session>, Error> {
        Ok(self
            .sessions
            .iter()
            .filter(|s| s.plate == plate)
            .max_by_key(|s| (s.entered_at, s.id.0))
            .cloned())
    }

    fn first_free_slot(&mut self) -> Result<Option<SlotId>, Error> {
        Ok(self
            .slots
            .iter()
            .find(|(_, occupied)| !**occupied)
            .map(|(id, _)| *id))
    }

    fn set_occupied(&mut self, slot: SlotId, occupied: bool) -> Result<(), Error> {
        // Unknown slots are ignored, like an UPDATE matching no row
        if let Some(flag) = self.slots.get_mut(&slot) {
            *flag = occupied;
        }
        Ok(())
    }

    fn insert_session(
        &mut self,
        plate: &str,
        entered_at: NaiveDateTime,
        slot: Option<SlotId>,
    ) -> Result<Session, Error> {
        self.next_session_id += 1;
        let session = Session {
            id: SessionId(self.next_session_id),
            plate: plate.to_string(),
            entered_at,
            slot,
        };
        self.sessions.push(session.clone());
        Ok(session)
    }

    fn remove_session(&mut self, id: SessionId) -> Result<(), Error> {
        self.sessions.retain(|s| s.id != id);
        Ok(())
    }

    fn append_history(&mut self, record: &HistoryRecord) -> Result<(), Error> {
        self.history.push(record.clone());
        Ok(())
    }
}

/// Ledger storage held in memory, with the same commit-or-discard
/// behavior as the SQLite store. Useful for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryLedgerRepository {
    state: RefCell<State>,
}

impl MemoryLedgerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository with `count` free slots already seeded
    pub fn with_slots(count: u32) -> Self {
        let repo = Self::new();
        {
            let mut state = repo.state.borrow_mut();
            for n in 1..=count {
                state.slots.insert(SlotId(n), false);
            }
        }
        repo
    }

    /// Mark a slot occupied without going through a session
    pub fn force_occupied(&self, slot: SlotId, occupied: bool) {
        if let Some(flag) = self.state.borrow_mut().slots.get_mut(&slot) {
            *flag = occupied;
        }
    }
}

impl LedgerRepository for MemoryLedgerRepository {
    fn unit_of_work<T, F>(&self, work: F) -> Result<T, Error>
    where
        F: FnOnce(&mut dyn LedgerUnit) -> Result<T, Error>,
    {
        let mut draft = self.state.borrow().clone();
        let value = work(&mut draft)?;
        *self.state.borrow_mut() = draft;
        Ok(value)
    }

    fn seed_slots(&self, count: u32) -> Result<bool, Error> {
        let mut state = self.state.borrow_mut();
        if !state.slots.is_empty() {
            return Ok(false);
        }
        for n in 1..=count {
            state.slots.insert(SlotId(n), false);
        }
        Ok(true)
    }

    fn slots(&self) -> Result<Vec<Slot>, Error> {
        Ok(self
            .state
            .borrow()
            .slots
            .iter()
            .map(|(id, occupied)| Slot {
                id: *id,
                occupied: *occupied,
            })
            .collect())
    }

    fn open_sessions(&self) -> Result<Vec<Session>, Error> {
        let mut sessions = self.state.borrow().sessions.clone();
        sessions.sort_by(|a, b| (b.entered_at, b.id.0).cmp(&(a.entered_at, a.id.0)));
        Ok(sessions)
    }

    fn recent_exits(&self, limit: usize) -> Result<Vec<HistoryRecord>, Error> {
        let mut history = self.state.borrow().history.clone();
        history.reverse();
        history.sort_by(|a, b| b.time_out.cmp(&a.time_out));
        history.truncate(limit);
        Ok(history)
    }
}
