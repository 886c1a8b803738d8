//! `m:ss` clock strings used by the catalog for track lengths

use std::time::Duration;

/// Parse a catalog duration string into a `Duration`
///
/// Accepts `m:ss`, `h:mm:ss` and bare seconds. Seconds are not required to be
/// zero-padded (`"3:5"` is three minutes five seconds), matching what the
/// upload pipeline writes. Returns `None` for anything else.
pub fn parse_clock(text: &str) -> Option<Duration> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let mut total: u64 = 0;
    let mut parts = 0;
    for part in text.split(':') {
        let value: u64 = part.trim().parse().ok()?;
        if parts > 0 && value >= 60 {
            return None;
        }
        total = total.checked_mul(60)?.checked_add(value)?;
        parts += 1;
    }

    if parts > 3 {
        return None;
    }

    Some(Duration::from_secs(total))
}

/// Format a duration as `m:ss` (or `h:mm:ss` past the hour)
pub fn format_clock(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minutes_and_seconds() {
        assert_eq!(parse_clock("3:45"), Some(Duration::from_secs(225)));
        assert_eq!(parse_clock("0:07"), Some(Duration::from_secs(7)));
    }

    #[test]
    fn parses_unpadded_seconds() {
        assert_eq!(parse_clock("3:5"), Some(Duration::from_secs(185)));
    }

    #[test]
    fn parses_hours_and_bare_seconds() {
        assert_eq!(parse_clock("1:02:03"), Some(Duration::from_secs(3723)));
        assert_eq!(parse_clock("42"), Some(Duration::from_secs(42)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_clock(""), None);
        assert_eq!(parse_clock("NaN:NaN"), None);
        assert_eq!(parse_clock("3:75"), None);
        assert_eq!(parse_clock("1:2:3:4"), None);
    }

    #[test]
    fn formats_clock() {
        assert_eq!(format_clock(Duration::from_secs(185)), "3:05");
        assert_eq!(format_clock(Duration::from_secs(59)), "0:59");
        assert_eq!(format_clock(Duration::from_secs(3723)), "1:02:03");
    }
}
