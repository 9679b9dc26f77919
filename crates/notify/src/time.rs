//! Timestamp parsing and display helpers.
//!
//! Start times arrive from callers as free-form strings. Anything we can
//! recognize is rendered in a fixed UTC format; anything else is shown
//! verbatim so a notification never fails over a date.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Naive formats accepted in addition to RFC 3339. Interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Epoch values above this are treated as milliseconds.
const EPOCH_MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Parse a caller-supplied timestamp.
///
/// Accepts RFC 3339, the naive forms in [`NAIVE_FORMATS`], and Unix epoch
/// seconds or milliseconds.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    let epoch: i64 = raw.parse().ok()?;
    if epoch.unsigned_abs() >= EPOCH_MILLIS_THRESHOLD.unsigned_abs() {
        DateTime::from_timestamp_millis(epoch)
    } else {
        DateTime::from_timestamp(epoch, 0)
    }
}

/// Render a timestamp as e.g. `Mon, Jan 15 2024 at 18:30 UTC`.
#[must_use]
pub fn format_display(dt: DateTime<Utc>) -> String {
    dt.format("%a, %b %-d %Y at %H:%M UTC").to_string()
}

/// Render a start time for an embed field, relative to `now`.
///
/// Unparseable input is passed through unchanged.
#[must_use]
pub fn display_start_time(raw: &str, now: DateTime<Utc>) -> String {
    match parse_timestamp(raw) {
        Some(dt) => format!("{} ({})", format_display(dt), time_until(now, dt)),
        None => raw.trim().to_string(),
    }
}

/// Describe how far `then` lies after `now`, e.g. `in 2h 15m`.
#[must_use]
pub fn time_until(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    let secs = (then - now).num_seconds();
    if secs <= 0 {
        "started".to_string()
    } else {
        format!("in {}", format_duration(secs.unsigned_abs()))
    }
}

/// Format seconds into a human-readable duration.
#[must_use]
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        if remaining_secs == 0 {
            format!("{mins}m")
        } else {
            format!("{mins}m {remaining_secs}s")
        }
    } else if secs < 86_400 {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        if mins == 0 {
            format!("{hours}h")
        } else {
            format!("{hours}h {mins}m")
        }
    } else {
        let days = secs / 86_400;
        let hours = (secs % 86_400) / 3600;
        if hours == 0 {
            format!("{days}d")
        } else {
            format!("{days}d {hours}h")
        }
    }
}
