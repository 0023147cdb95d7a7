// Human-readable timestamps for run log lines

use chrono::{DateTime, Local, TimeZone};

/// Render millis since epoch in local time with a strftime pattern
///
/// Out-of-range values fall back to the raw millis.
pub fn format_local(millis: i64, pattern: &str) -> String {
    match Local.timestamp_millis_opt(millis).earliest() {
        Some(dt) => dt.format(pattern).to_string(),
        None => match DateTime::from_timestamp_millis(millis) {
            Some(utc) => utc.format(pattern).to_string(),
            None => millis.to_string(),
        },
    }
}
