use chrono::{DateTime, Local, NaiveDate, TimeZone};
use std::fmt::Write;

/// Format a `publishedAt` value as a date in the viewer's time zone.
///
/// RFC 3339 timestamps are shifted to local time first. A bare `YYYY-MM-DD`
/// is already a calendar date and is formatted as-is. Anything else, or a
/// pattern chrono cannot render, comes back verbatim.
pub fn format_published_at(raw: &str, pattern: &str) -> String {
    format_published_in(raw, pattern, &Local)
}

pub(crate) fn format_published_in<Tz>(raw: &str, pattern: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let trimmed = raw.trim();
    let mut out = String::new();

    let rendered = if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        write!(out, "{}", ts.with_timezone(tz).format(pattern))
    } else if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        write!(out, "{}", date.format(pattern))
    } else {
        return raw.to_string();
    };

    match rendered {
        Ok(()) => out,
        Err(_) => raw.to_string(),
    }
}
