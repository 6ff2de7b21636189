//! Time helpers. Timestamps travel as Unix milliseconds (UTC).

use chrono::{DateTime, SecondsFormat, Utc};

/// Current Unix timestamp in milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert a Unix timestamp in milliseconds to RFC 3339 (UTC, millisecond precision).
///
/// Out-of-range values fall back to the Unix epoch rather than panicking.
pub fn millis_to_rfc3339(timestamp_millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_millis)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}
