//! Result of applying one plate detection to the ledger

use serde::Serialize;
use std::fmt;

use super::{SlotId, StayDuration};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// New session bound to `slot`
    Entered { slot: SlotId },
    /// Matching session closed. `slot` is `None` when the car entered a full lot.
    Exited {
        slot: Option<SlotId>,
        duration: StayDuration,
    },
    /// No free slot; a session without a slot was still recorded
    LotFull,
}

impl Outcome {
    /// Short label for tables and dialog titles
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Entered { .. } => "entered",
            Outcome::Exited { .. } => "exited",
            Outcome::LotFull => "lot full",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Entered { slot } => write!(f, "Parking Slot Assigned: {}", slot),
            Outcome::Exited { slot: Some(slot), duration } => write!(
                f,
                "Parking Slot {} is now available. Car has exited.\nDuration: {}",
                slot, duration
            ),
            Outcome::Exited { slot: None, duration } => {
                write!(f, "Car has exited (no slot was assigned).\nDuration: {}", duration)
            }
            Outcome::LotFull => write!(f, "Parking is full"),
        }
    }
}
