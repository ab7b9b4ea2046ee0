//! Canonical timestamp form for `last_updated_dt`.
//!
//! Timestamps are stored as zero-padded strings with microsecond precision so that
//! byte order on the index sort key equals chronological order.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use super::ValidationError;

/// Format used for every stored timestamp and every range bound.
pub const CANONICAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Formats a timestamp in the canonical stored form.
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(CANONICAL_TIMESTAMP_FORMAT).to_string()
}

/// Parses a stored timestamp. Accepts any fractional precision.
pub fn parse_stored_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

/// Parses a user-supplied timestamp.
///
/// Accepts RFC 3339 (normalised to UTC), `YYYY-MM-DD HH:MM[:SS[.ffffff]]` with a
/// space or `T` separator, and a bare date meaning midnight.
pub fn parse_request_timestamp(s: &str) -> Result<NaiveDateTime, ValidationError> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }

    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
    {
        return Ok(dt);
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| ValidationError::InvalidTimestamp(s.to_string()))
}
