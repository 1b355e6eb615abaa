use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::{BookingError, BookingResult};

pub const HHMM_FORMAT: &str = "%H:%M";

/// A bookable interval on a single calendar date. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl TimeSlot {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }
}

/// Parses a wall-clock time written as `HH:MM`.
pub fn parse_hhmm(value: &str) -> BookingResult<NaiveTime> {
    let trimmed = value.trim();
    if trimmed.len() != 5 {
        return Err(BookingError::Validation(format!(
            "Invalid time '{}', expected HH:MM",
            value
        )));
    }
    NaiveTime::parse_from_str(trimmed, HHMM_FORMAT)
        .map_err(|_| BookingError::Validation(format!("Invalid time '{}', expected HH:MM", value)))
}

pub fn format_hhmm(time: NaiveTime) -> String {
    time.format(HHMM_FORMAT).to_string()
}

/// Adds minutes to a time of day, returning `None` when the result would pass midnight.
///
/// Ending exactly at midnight also counts as passing it, since `00:00` would sort
/// before the start.
pub fn add_minutes(time: NaiveTime, minutes: i64) -> Option<NaiveTime> {
    let (shifted, wrapped_secs) = time.overflowing_add_signed(Duration::minutes(minutes));
    if wrapped_secs != 0 {
        None
    } else {
        Some(shifted)
    }
}

/// Serde adapter for `NaiveTime` as `HH:MM` strings.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_hhmm(*time))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_hhmm(&raw).map_err(serde::de::Error::custom)
    }
}
