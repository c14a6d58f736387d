//! Date helper functions

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate};
use std::fmt::Write;

/// Display format used when none is configured, or the configured one is invalid
pub const DEFAULT_DATE_FORMAT: &str = "%b %-d, %Y";

/// Whether `format` only contains specifiers chrono understands
pub fn is_valid_date_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Format a post date for display.
///
/// Accepts `YYYY-MM-DD` or RFC 3339 timestamps; anything else is shown
/// verbatim. An invalid `format` falls back to [`DEFAULT_DATE_FORMAT`].
///
/// # Examples
/// ```ignore
/// display_date("2025-12-20", "%b %-d, %Y") // -> "Dec 20, 2025"
/// ```
pub fn display_date(date: &str, format: &str) -> String {
    let date = date.trim();

    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(date)
                .ok()
                .map(|parsed| parsed.date_naive())
        });

    match parsed {
        Some(day) => format_day(day, format),
        None => date.to_string(),
    }
}

fn format_day(day: NaiveDate, format: &str) -> String {
    let mut out = String::new();
    if is_valid_date_format(format) && write!(out, "{}", day.format(format)).is_ok() {
        return out;
    }

    tracing::warn!("Invalid date format {:?}, using {:?}", format, DEFAULT_DATE_FORMAT);
    day.format(DEFAULT_DATE_FORMAT).to_string()
}
