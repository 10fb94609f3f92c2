//! Timestamp utilities
//!
//! All persisted timestamps use one fixed-width UTC form
//! (`2025-01-05T20:00:00.000Z`) so that text comparison in SQLite matches
//! chronological order.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Format a timestamp in the canonical stored form
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an ISO-8601 date or date-time
///
/// Accepts full RFC 3339 (`2025-01-05T20:00:00+01:00`), naive date-times
/// (`2025-01-05T20:00`, `2025-01-05T20:00:00`, taken as UTC) and plain
/// dates (`2025-01-05`, midnight UTC). Returns `None` for anything else.
pub fn parse_iso8601(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Some(ts.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
