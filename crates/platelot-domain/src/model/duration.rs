//! Length of a parking stay
//!
//! Rendered as `H:MM:SS`, with a leading `N day(s), ` once the stay passes
//! 24 hours (for example `0:05:00` or `1 day, 2:03:04`). Negative spans
//! borrow a whole day, so one second before entry reads `-1 day, 23:59:59`.
//! This is also the text stored in the `exited_cars.duration` column.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SECS_PER_DAY: i64 = 86_400;

/// Whole-second span between entry and exit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct StayDuration(i64);

impl StayDuration {
    pub fn from_secs(secs: i64) -> Self {
        Self(secs)
    }

    /// Exact wall-clock subtraction, truncated to whole seconds
    pub fn between(entered_at: NaiveDateTime, exited_at: NaiveDateTime) -> Self {
        Self((exited_at - entered_at).num_seconds())
    }

    pub fn as_secs(self) -> i64 {
        self.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for StayDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days = self.0.div_euclid(SECS_PER_DAY);
        let rest = self.0.rem_euclid(SECS_PER_DAY);
        if days != 0 {
            let unit = if days.abs() == 1 { "day" } else { "days" };
            write!(f, "{} {}, ", days, unit)?;
        }
        write!(f, "{}:{:02}:{:02}", rest / 3600, (rest % 3600) / 60, rest % 60)
    }
}

impl FromStr for StayDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (days, clock) = match s.split_once(", ") {
            Some((day_part, clock)) => {
                let count = day_part
                    .trim_end_matches("days")
                    .trim_end_matches("day")
                    .trim();
                let days: i64 = count
                    .parse()
                    .map_err(|_| format!("invalid day count in duration '{}'", s))?;
                (days, clock)
            }
            None => (0, s),
        };

        let mut parts = clock.split(':');
        let mut next = |name: &str| -> Result<i64, String> {
            parts
                .next()
                .and_then(|p| p.parse::<i64>().ok())
                .filter(|v| *v >= 0)
                .ok_or_else(|| format!("invalid {} in duration '{}'", name, s))
        };
        let hours = next("hours")?;
        let minutes = next("minutes")?;
        let seconds = next("seconds")?;
        if parts.next().is_some() || minutes >= 60 || seconds >= 60 {
            return Err(format!("invalid duration '{}'", s));
        }

        Ok(Self(days * SECS_PER_DAY + hours * 3600 + minutes * 60 + seconds))
    }
}

impl From<StayDuration> for String {
    fn from(duration: StayDuration) -> Self {
        duration.to_string()
    }
}

impl TryFrom<String> for StayDuration {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
