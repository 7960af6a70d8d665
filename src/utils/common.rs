//! Timestamp helpers
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC text with millisecond
//! precision, so sorting the text sorts by time.

use chrono::{DateTime, SecondsFormat, Utc};
use crate::error::{CacheError, Result};

/// Convert DateTime to database string format
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored timestamp. Any RFC 3339 offset is accepted.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Rewrite any RFC 3339 timestamp into the stored form (UTC, milliseconds)
pub fn normalize_timestamp(s: &str) -> Result<String> {
    parse_timestamp(s)
        .map(|dt| format_timestamp(&dt))
        .ok_or_else(|| CacheError::InvalidTimestamp(s.to_string()))
}

/// Get current timestamp formatted for database
pub fn now_timestamp() -> String {
    format_timestamp(&Utc::now())
}
