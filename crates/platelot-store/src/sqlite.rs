//! SQLite implementation of `LedgerRepository`

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDateTime;
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension};

use platelot_domain::model::{format_timestamp, parse_timestamp};
use platelot_domain::repository::{LedgerRepository, LedgerUnit};
use platelot_domain::{HistoryRecord, Session, SessionId, Slot, SlotId, StayDuration};
use platelot_types::{Error, Result};

use crate::schema::ensure_schema;

/// How long a connection waits for the file lock before failing
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(10);

/// Ledger storage in a local SQLite file
#[derive(Debug, Clone)]
pub struct SqliteLedgerRepository {
    db_path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteLedgerRepository {
    /// Create or open the database file and make sure the tables exist
    pub fn open(db_path: PathBuf) -> Result<Self> {
        Self::open_with_timeout(db_path, DEFAULT_BUSY_TIMEOUT)
    }

    pub fn open_with_timeout(db_path: PathBuf, busy_timeout: Duration) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let repo = Self {
            db_path,
            busy_timeout,
        };
        let conn = repo.connect()?;
        ensure_schema(&conn)?;
        info!("Ledger database at {}", repo.db_path.display());
        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)?;
        conn.busy_timeout(self.busy_timeout)?;
        Ok(conn)
    }
}

fn to_slot_id(value: i64) -> Result<SlotId> {
    u32::try_from(value)
        .ok()
        .filter(|n| *n > 0)
        .map(SlotId)
        .ok_or_else(|| Error::InvalidStoredValue(format!("slot number {}", value)))
}

fn to_sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

type SessionRow = (i64, String, String, Option<i64>);

fn read_session_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SessionRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn session_from_row((rowid, plate, timestamp, slot): SessionRow) -> Result<Session> {
    Ok(Session {
        id: SessionId(rowid),
        plate,
        entered_at: parse_timestamp(&timestamp)?,
        slot: slot.map(to_slot_id).transpose()?,
    })
}

type HistoryRow = (String, String, String, String);

fn history_from_row((plate, time_in, time_out, duration): HistoryRow) -> Result<HistoryRecord> {
    Ok(HistoryRecord {
        plate,
        time_in: parse_timestamp(&time_in)?,
        time_out: parse_timestamp(&time_out)?,
        duration: duration
            .parse::<StayDuration>()
            .map_err(Error::InvalidStoredValue)?,
    })
}

/// One open transaction
struct SqliteUnit<'a> {
    conn: &'a Connection,
}

impl LedgerUnit for SqliteUnit<'_> {
    fn latest_session(&mut self, plate: &str) -> Result<Option<Session>> {
        let row = self
            .conn
            .query_row(
                "SELECT rowid, license_plate, timestamp, parking_slot FROM cars
                 WHERE license_plate = ?1
                 ORDER BY timestamp DESC, rowid DESC LIMIT 1",
                params![plate],
                read_session_row,
            )
            .optional()?;
        row.map(session_from_row).transpose()
    }

    fn first_free_slot(&mut self) -> Result<Option<SlotId>> {
        let slot: Option<i64> = self
            .conn
            .query_row(
                "SELECT slot_number FROM parking_slots
                 WHERE occupied = 0 ORDER BY slot_number LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        slot.map(to_slot_id).transpose()
    }

    fn set_occupied(&mut self, slot: SlotId, occupied: bool) -> Result<()> {
        self.conn.execute(
            "UPDATE parking_slots SET occupied = ?1 WHERE slot_number = ?2",
            params![occupied, slot.get()],
        )?;
        Ok(())
    }

    fn insert_session(
        &mut self,
        plate: &str,
        entered_at: NaiveDateTime,
        slot: Option<SlotId>,
    ) -> Result<Session> {
        self.conn.execute(
            "INSERT INTO cars (license_plate, timestamp, parking_slot) VALUES (?1, ?2, ?3)",
            params![plate, format_timestamp(&entered_at), slot.map(SlotId::get)],
        )?;
        Ok(Session {
            id: SessionId(self.conn.last_insert_rowid()),
            plate: plate.to_string(),
            entered_at,
            slot,
        })
    }

    fn remove_session(&mut self, id: SessionId) -> Result<()> {
        self.conn
            .execute("DELETE FROM cars WHERE rowid = ?1", params![id.0])?;
        Ok(())
    }

    fn append_history(&mut self, record: &HistoryRecord) -> Result<()> {
        self.conn.execute(
            "INSERT INTO exited_cars (license_plate, time_in, time_out, duration)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                record.plate,
                format_timestamp(&record.time_in),
                format_timestamp(&record.time_out),
                record.duration.to_string(),
            ],
        )?;
        Ok(())
    }
}

impl LedgerRepository for SqliteLedgerRepository {
    fn unit_of_work<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce(&mut dyn LedgerUnit) -> Result<T>,
    {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let value = {
            let mut unit = SqliteUnit { conn: &tx };
            work(&mut unit)?
        };
        tx.commit()?;
        Ok(value)
    }

    fn seed_slots(&self, count: u32) -> Result<bool> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let existing: i64 = tx.query_row("SELECT COUNT(*) FROM parking_slots", [], |row| row.get(0))?;
        if existing > 0 {
            return Ok(false);
        }

        {
            let mut stmt =
                tx.prepare("INSERT INTO parking_slots (slot_number, occupied) VALUES (?1, ?2)")?;
            for n in 1..=count {
                stmt.execute(params![n, false])?;
            }
        }
        tx.commit()?;

        debug!("Seeded {} parking slots", count);
        Ok(true)
    }

    fn slots(&self) -> Result<Vec<Slot>> {
        let conn = self.connect()?;
        let mut stmt =
            conn.prepare("SELECT slot_number, occupied FROM parking_slots ORDER BY slot_number")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, bool>(1)?)))?;

        let mut slots = Vec::new();
        for row in rows {
            let (number, occupied) = row?;
            slots.push(Slot {
                id: to_slot_id(number)?,
                occupied,
            });
        }
        Ok(slots)
    }

    fn open_sessions(&self) -> Result<Vec<Session>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT rowid, license_plate, timestamp, parking_slot FROM cars
             ORDER BY timestamp DESC, rowid DESC",
        )?;
        let rows = stmt.query_map([], read_session_row)?;

        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(session_from_row(row?)?);
        }
        Ok(sessions)
    }

    fn recent_exits(&self, limit: usize) -> Result<Vec<HistoryRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT license_plate, time_in, time_out, duration FROM exited_cars
             ORDER BY time_out DESC, rowid DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![to_sql_limit(limit)], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(history_from_row(row?)?);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_to_slot_id_rejects_zero_and_negative() {
        assert_eq!(to_slot_id(4).unwrap(), SlotId(4));
        assert!(to_slot_id(0).is_err());
        assert!(to_slot_id(-3).is_err());
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("lot").join("car_database.db");
        let repo = SqliteLedgerRepository::open(path.clone()).unwrap();
        assert!(path.exists());
        assert_eq!(repo.path(), path.as_path());
    }

    #[test]
    fn test_seed_slots_once() {
        let dir = tempdir().unwrap();
        let repo = SqliteLedgerRepository::open(dir.path().join("lot.db")).unwrap();
        assert!(repo.seed_slots(20).unwrap());
        assert!(!repo.seed_slots(30).unwrap());

        let slots = repo.slots().unwrap();
        assert_eq!(slots.len(), 20);
        assert_eq!(slots.first().unwrap().id, SlotId(1));
        assert_eq!(slots.last().unwrap().id, SlotId(20));
        assert!(slots.iter().all(|s| !s.occupied));
    }

    #[test]
    fn test_failed_unit_rolls_back() {
        let dir = tempdir().unwrap();
        let repo = SqliteLedgerRepository::open(dir.path().join("lot.db")).unwrap();
        repo.seed_slots(2).unwrap();

        let result: Result<()> = repo.unit_of_work(|unit| {
            unit.set_occupied(SlotId(1), true)?;
            Err(Error::InvalidStoredValue("abort".to_string()))
        });
        assert!(result.is_err());
        assert!(repo.slots().unwrap().iter().all(|s| !s.occupied));
    }
}
