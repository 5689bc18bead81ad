/// Parse a clock-style duration (`m:ss` or `h:mm:ss`) into whole seconds.
///
/// Returns `None` for any other shape or for non-numeric components.
pub fn parse_clock(duration: &str) -> Option<u64> {
    let parts: Vec<u64> = duration
        .trim()
        .split(':')
        .map(|part| part.trim().parse::<u64>().ok())
        .collect::<Option<_>>()?;

    match parts.as_slice() {
        [minutes, seconds] => minutes.checked_mul(60)?.checked_add(*seconds),
        [hours, minutes, seconds] => hours
            .checked_mul(3600)?
            .checked_add(minutes.checked_mul(60)?)?
            .checked_add(*seconds),
        _ => None,
    }
}

/// Format whole seconds as `m:ss`, or `h:mm:ss` from one hour on
pub fn format_clock(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Format a decoded duration in (possibly fractional) seconds, truncating
pub fn format_seconds(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return format_clock(0);
    }
    format_clock(seconds.floor() as u64)
}

/// Bring a feed duration into display form.
///
/// Clock values are kept as they are, plain second counts are converted and
/// anything unrecognized is passed through untouched.
pub fn normalize_duration(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() || raw.contains(':') {
        return raw.to_string();
    }

    match raw.parse::<u64>() {
        Ok(seconds) => format_clock(seconds),
        Err(_) => raw.to_string(),
    }
}

/// Render a total as whole hours and minutes, e.g. `2h 5m`
pub fn format_hours_minutes(total_seconds: u64) -> String {
    let total_minutes = total_seconds / 60;
    format!("{}h {}m", total_minutes / 60, total_minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minutes_and_hours() {
        assert_eq!(parse_clock("1:30"), Some(90));
        assert_eq!(parse_clock("45:00"), Some(2700));
        assert_eq!(parse_clock("1:02:03"), Some(3723));
    }

    #[test]
    fn rejects_other_shapes() {
        assert_eq!(parse_clock(""), None);
        assert_eq!(parse_clock("3600"), None);
        assert_eq!(parse_clock("1:2:3:4"), None);
        assert_eq!(parse_clock("ab:cd"), None);
        assert_eq!(parse_clock("1:"), None);
    }

    #[test]
    fn out_of_range_clocks_are_rejected() {
        assert_eq!(parse_clock("400000000000000000:00"), None);
        assert_eq!(parse_clock("18446744073709551615:00"), None);
        assert_eq!(parse_clock("5124095576030432:00:00"), None);
        assert_eq!(parse_clock("5124095576030431:59:59"), None);
        assert_eq!(parse_clock("307445734561825860:15"), Some(18_446_744_073_709_551_615));
    }

    #[test]
    fn formats_clock() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(65), "1:05");
        assert_eq!(format_clock(3599), "59:59");
        assert_eq!(format_clock(3725), "1:02:05");
    }

    #[test]
    fn formats_fractional_seconds_by_truncation() {
        assert_eq!(format_seconds(125.9), "2:05");
        assert_eq!(format_seconds(f64::NAN), "0:00");
    }

    #[test]
    fn normalizes_feed_durations() {
        assert_eq!(normalize_duration("2712"), "45:12");
        assert_eq!(normalize_duration("45:12"), "45:12");
        assert_eq!(normalize_duration("1:00:00"), "1:00:00");
        assert_eq!(normalize_duration("about an hour"), "about an hour");
        assert_eq!(normalize_duration(""), "");
    }

    #[test]
    fn hours_minutes_truncates() {
        assert_eq!(format_hours_minutes(210), "0h 3m");
        assert_eq!(format_hours_minutes(7559), "2h 5m");
    }
}
