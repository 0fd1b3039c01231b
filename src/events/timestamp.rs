//! Timestamp formats used by events.
//!
//! Internally events keep the exact strings the user typed, in
//! `yyyy/MM/dd-HH:mm` (or bare `HH:mm` for train hours). The map file uses
//! `yyyy-MM-ddTHH:mm:00.000Z`, obtained by swapping separators so the internal
//! strings come back unchanged after a load.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// chrono pattern of the internal date-time form
pub const DATE_TIME_PATTERN: &str = "%Y/%m/%d-%H:%M";

/// chrono pattern of the internal time-of-day form
pub const TIME_OF_DAY_PATTERN: &str = "%H:%M";

const EXPORT_SUFFIX: &str = ":00.000Z";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    /// `yyyy/MM/dd-HH:mm`
    DateTime,
    /// `HH:mm`
    TimeOfDay,
}

impl TimestampFormat {
    pub fn pattern(&self) -> &'static str {
        match self {
            TimestampFormat::DateTime => "yyyy/MM/dd-HH:mm",
            TimestampFormat::TimeOfDay => "HH:mm",
        }
    }

    /// Parse into a comparable instant. Times of day are placed on a fixed date.
    pub fn parse(&self, value: &str) -> Option<NaiveDateTime> {
        let value = value.trim();
        match self {
            TimestampFormat::DateTime => {
                NaiveDateTime::parse_from_str(value, DATE_TIME_PATTERN).ok()
            }
            TimestampFormat::TimeOfDay => {
                let time = NaiveTime::parse_from_str(value, TIME_OF_DAY_PATTERN).ok()?;
                NaiveDate::from_ymd_opt(2000, 1, 1).map(|date| date.and_time(time))
            }
        }
    }
}

/// `2024/01/10-08:00` -> `2024-01-10T08:00:00.000Z`. Time-of-day strings are
/// returned unchanged.
pub fn to_export(internal: &str) -> String {
    match internal.split_once('-') {
        Some((date, time)) => format!("{}T{}{}", date.replace('/', "-"), time, EXPORT_SUFFIX),
        None => internal.to_string(),
    }
}

/// Inverse of [`to_export`].
pub fn from_export(exported: &str) -> String {
    let trimmed = exported.trim();
    let Some(body) = trimmed.strip_suffix(EXPORT_SUFFIX) else {
        return trimmed.to_string();
    };
    match body.split_once('T') {
        Some((date, time)) => format!("{}-{}", date.replace('-', "/"), time),
        None => trimmed.to_string(),
    }
}
