//! Calendar day canonicalization and weekday arithmetic.
//!
//! The canonical time zone is UTC, fixed for the whole process: a "day" is
//! always a UTC calendar date, never a per-request local date. Every
//! component (schedule resolver, ledger, analytics) goes through these
//! helpers so the Monday=0 weekday convention stays consistent.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::error::{Error, Result};

/// Weekday labels indexed Monday=0 through Sunday=6.
pub const WEEKDAY_LABELS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Abbreviated weekday labels, same indexing.
pub const WEEKDAY_LABELS_SHORT: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Truncate a timestamp to its UTC calendar day.
pub fn day_of(ts: DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}

/// Weekday index with Monday=0 .. Sunday=6.
pub fn weekday_index(day: NaiveDate) -> u32 {
    day.weekday().num_days_from_monday()
}

/// Full weekday label ("Monday" .. "Sunday").
pub fn weekday_label(day: NaiveDate) -> &'static str {
    WEEKDAY_LABELS[weekday_index(day) as usize]
}

/// Abbreviated weekday label ("Mon" .. "Sun").
pub fn weekday_label_short(day: NaiveDate) -> &'static str {
    WEEKDAY_LABELS_SHORT[weekday_index(day) as usize]
}

/// Signed day count `b - a`.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days()
}

/// Parse an ISO-8601 calendar date or timestamp into a canonical day.
///
/// Accepts plain dates (`2024-01-01`) and RFC 3339 timestamps
/// (`2024-01-01T08:30:00Z`); timestamps are converted to UTC before
/// truncation.
pub fn parse_day(input: &str) -> Result<NaiveDate> {
    if let Ok(day) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(day);
    }

    DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| Error::Validation(format!("invalid date: {}", input)))
}
