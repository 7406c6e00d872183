//! Parking domain: slots, sessions, exit history and the ledger that moves
//! cars between them.

pub mod model;
pub mod plate;
pub mod repository;
pub mod service;

pub use model::{HistoryRecord, Occupancy, Outcome, Session, SessionId, Slot, SlotId, StayDuration};
pub use plate::normalize_plate;
pub use service::Ledger;
