//! Timestamp helpers
//!
//! All persisted timestamps are Unix epoch milliseconds (i64).

use chrono::Utc;

/// Current wall-clock time as Unix milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Milliseconds in one hour
pub const HOUR_MS: i64 = 60 * 60 * 1000;

/// Milliseconds in one day
pub const DAY_MS: i64 = 24 * HOUR_MS;
