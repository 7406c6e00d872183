//! Domain model types

pub mod duration;
pub mod outcome;
pub mod session;
pub mod slot;

pub use duration::StayDuration;
pub use outcome::Outcome;
pub use session::{format_timestamp, parse_timestamp, HistoryRecord, Session, SessionId, TIMESTAMP_FORMAT};
pub use slot::{Occupancy, Slot, SlotId, DEFAULT_SLOT_COUNT};
