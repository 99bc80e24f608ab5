//! Display formatting for durations and dates

use chrono::{DateTime, Local, TimeZone};

/// Returned by [`format_duration`] for negative or non-finite input
pub const DURATION_FALLBACK: &str = "0:00";

/// Returned by [`format_date`] when the timestamp cannot be parsed
pub const INVALID_DATE: &str = "Invalid Date";

/// Format milliseconds as `M:SS`.
///
/// Minutes are not padded and may exceed 59.
pub fn format_duration(millis: f64) -> String {
    if !millis.is_finite() || millis < 0.0 {
        return DURATION_FALLBACK.to_string();
    }

    let total_secs = (millis / 1000.0).floor() as u64;
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;

    format!("{}:{:02}", minutes, seconds)
}

/// Format an ISO-8601 timestamp in local time, e.g. "Jan 15, 02:30 PM"
pub fn format_date(iso: &str) -> String {
    format_date_in(iso, &Local)
}

/// Format an ISO-8601 timestamp in the given time zone
pub fn format_date_in<Tz>(iso: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match DateTime::parse_from_rfc3339(iso.trim()) {
        Ok(date) => date
            .with_timezone(tz)
            .format("%b %-d, %I:%M %p")
            .to_string(),
        Err(_) => INVALID_DATE.to_string(),
    }
}
