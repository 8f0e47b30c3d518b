//! Date parsing and timezone-safe display
//!
//! Instants are stored in UTC. Display converts instants into the configured
//! reporting offset, while calendar dates (next due date) are stored as UTC
//! midnight and always rendered from their UTC date so they never drift by a
//! day.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

const NAIVE_FORMATS: [&str; 4] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

fn parse_naive(input: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
}

/// Parse an instant. Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` (taken as UTC)
/// and a bare `YYYY-MM-DD` (UTC midnight).
pub fn parse_datetime(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(naive) = parse_naive(input) {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parse a calendar date, keeping the date as written even when a time and
/// offset are attached, and store it as UTC midnight. The whole input must
/// be a valid date or date-time.
pub fn parse_calendar_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    let date = DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| parse_naive(input).map(|naive| naive.date()))
        .or_else(|| NaiveDate::parse_from_str(input, "%Y-%m-%d").ok())?;
    date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc())
}

/// Instant rendered in the reporting offset, RFC 3339
pub fn format_instant(dt: &DateTime<Utc>, offset: FixedOffset) -> String {
    dt.with_timezone(&offset).to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Audit timestamp (created/updated) in the reporting offset, minute precision
pub fn format_audit(dt: &DateTime<Utc>, offset: FixedOffset) -> String {
    dt.with_timezone(&offset).format("%Y-%m-%d %H:%M").to_string()
}

/// Calendar date taken from the stored UTC date, with no conversion
pub fn format_calendar_date(dt: &DateTime<Utc>) -> String {
    dt.date_naive().format("%Y-%m-%d").to_string()
}
