//! Persistent store for slots, open sessions and exit history
//!
//! Backed by a local SQLite file with three tables:
//!
//! - `cars(license_plate, timestamp, parking_slot)` open sessions
//! - `parking_slots(slot_number PRIMARY KEY, occupied)` the slot pool
//! - `exited_cars(license_plate, time_in, time_out, duration)` exit history
//!
//! A connection is opened for each unit of work and closed when it ends.

mod schema;
mod sqlite;

pub use sqlite::{SqliteLedgerRepository, DEFAULT_BUSY_TIMEOUT};
