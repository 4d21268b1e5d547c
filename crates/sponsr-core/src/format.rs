//! Display formatting shared by the listing and detail views.

use chrono::{DateTime, NaiveDate};

/// Words per minute used to estimate reading time.
pub const WORDS_PER_MINUTE: usize = 200;

/// Formats an ISO-like date as "January 15, 2025".
///
/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates. Anything else,
/// including dates that are already formatted, is returned unchanged.
///
/// # Examples
///
/// ```
/// use sponsr_core::format::format_date;
///
/// assert_eq!(format_date("2024-11-22T09:30:00Z"), "November 22, 2024");
/// assert_eq!(format_date("January 8, 2025"), "January 8, 2025");
/// ```
pub fn format_date(raw: &str) -> String {
    let trimmed = raw.trim();
    let date = DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"));

    match date {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Formats a minute count as "N min read". Never reports less than one minute.
pub fn format_read_time(minutes: u32) -> String {
    format!("{} min read", minutes.max(1))
}

/// Estimates reading minutes for a word count, rounding up.
pub fn estimate_read_minutes(words: usize) -> u32 {
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_plain_date() {
        assert_eq!(format_date("2025-01-15"), "January 15, 2025");
    }

    #[test]
    fn test_format_rfc3339_with_offset() {
        assert_eq!(format_date("2024-12-05T23:15:00+02:00"), "December 5, 2024");
    }

    #[test]
    fn test_unparseable_date_passes_through() {
        assert_eq!(format_date("soon"), "soon");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn test_format_read_time() {
        assert_eq!(format_read_time(8), "8 min read");
        assert_eq!(format_read_time(0), "1 min read");
    }

    #[test]
    fn test_estimate_read_minutes() {
        assert_eq!(estimate_read_minutes(0), 1);
        assert_eq!(estimate_read_minutes(200), 1);
        assert_eq!(estimate_read_minutes(201), 2);
        assert_eq!(estimate_read_minutes(1600), 8);
    }
}
