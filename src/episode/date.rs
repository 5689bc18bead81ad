use chrono::{DateTime, FixedOffset, NaiveDateTime};

/// How a publication date is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// `15/1/2024`
    Day,
    /// `15/1/2024, 12:00:00`
    DayTime,
}

impl DateStyle {
    fn pattern(self) -> &'static str {
        match self {
            DateStyle::Day => "%-d/%-m/%Y",
            DateStyle::DayTime => "%-d/%-m/%Y, %H:%M:%S",
        }
    }
}

/// Parse a publication date from either a feed (RFC 2822) or the API (ISO 8601)
pub fn parse_pub_date(date_str: &str) -> Option<DateTime<FixedOffset>> {
    let date_str = date_str.trim();
    if date_str.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc2822(date_str)
        .or_else(|_| DateTime::parse_from_rfc3339(date_str))
        .ok()
        .or_else(|| parse_relaxed_date(date_str))
}

/// Try to parse dates that don't strictly conform to RFC 2822 or RFC 3339
fn parse_relaxed_date(date_str: &str) -> Option<DateTime<FixedOffset>> {
    let offset_formats = [
        "%a, %d %b %Y %H:%M:%S %z",
        "%Y-%m-%dT%H:%M:%S%:z",
        "%Y-%m-%d %H:%M:%S %z",
    ];

    for format in offset_formats {
        if let Ok(dt) = DateTime::parse_from_str(date_str, format) {
            return Some(dt);
        }
    }

    // Zone-less timestamps are taken as UTC
    let naive_formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%a, %d %b %Y %H:%M:%S GMT",
    ];

    naive_formats.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(date_str, format)
            .ok()
            .map(|naive| naive.and_utc().fixed_offset())
    })
}

/// Format a raw publication date for display.
///
/// Empty input yields an empty string; input that cannot be parsed is shown
/// as-is.
pub fn format_display_date(raw: &str, style: DateStyle) -> String {
    match parse_pub_date(raw) {
        Some(dt) => dt.format(style.pattern()).to_string(),
        None => raw.trim().to_string(),
    }
}
