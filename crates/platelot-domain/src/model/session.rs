//! Open parking sessions and the exit history they turn into

use chrono::NaiveDateTime;
use platelot_types::{Error, Result};
use serde::{Deserialize, Serialize};

use super::{SlotId, StayDuration};

/// Storage format for every timestamp; sorts lexicographically
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map_err(|e| Error::InvalidStoredValue(format!("timestamp '{}': {}", value, e)))
}

/// Storage key of an open session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub i64);

/// A car currently in the lot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    /// Normalized plate text, possibly empty
    pub plate: String,
    pub entered_at: NaiveDateTime,
    /// `None` when the lot was full on entry
    pub slot: Option<SlotId>,
}

/// A finished stay. Never modified once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub plate: String,
    pub time_in: NaiveDateTime,
    pub time_out: NaiveDateTime,
    pub duration: StayDuration,
}

impl HistoryRecord {
    /// Close `session` at `exited_at`
    pub fn close(session: &Session, exited_at: NaiveDateTime) -> Self {
        Self {
            plate: session.plate.clone(),
            time_in: session.entered_at,
            time_out: exited_at,
            duration: StayDuration::between(session.entered_at, exited_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_format_round_trip() {
        let ts = parse_timestamp("2024-03-01 09:15:42").unwrap();
        assert_eq!(format_timestamp(&ts), "2024-03-01 09:15:42");
    }

    #[test]
    fn test_parse_timestamp_rejects_iso_t() {
        assert!(matches!(
            parse_timestamp("2024-03-01T09:15:42"),
            Err(Error::InvalidStoredValue(_))
        ));
    }

    #[test]
    fn test_close_session() {
        let session = Session {
            id: SessionId(7),
            plate: "ABC123".to_string(),
            entered_at: parse_timestamp("2024-03-01 09:00:00").unwrap(),
            slot: Some(SlotId(4)),
        };
        let record = HistoryRecord::close(&session, parse_timestamp("2024-03-01 10:30:15").unwrap());
        assert_eq!(record.plate, "ABC123");
        assert_eq!(record.duration.to_string(), "1:30:15");
    }
}
