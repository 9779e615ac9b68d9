// Utility functions
use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.?\d*").expect("valid number pattern"));

/// Parses an RFC 3339 or naive ISO-8601 timestamp; naive values are read as UTC.
pub fn parse_datetime(date_str: &str) -> Option<DateTime<Utc>> {
    let date_str = date_str.trim();
    DateTime::parse_from_rfc3339(date_str)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(date_str, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// Drops every non-ASCII character (emoji and decorative glyphs in the value list).
pub fn strip_non_ascii(text: &str) -> String {
    text.chars().filter(char::is_ascii).collect()
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First number in a cell such as "1,250k" or "~300 (est)"; 0 when there is none.
pub fn extract_number(text: &str) -> f64 {
    let without_separators = text.replace(',', "");
    NUMBER_RE
        .find(&without_separators)
        .and_then(|m| m.as_str().trim_end_matches('.').parse::<f64>().ok())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn numbers_tolerate_separators_and_suffixes() {
        assert_eq!(extract_number("1,250"), 1250.0);
        assert_eq!(extract_number("3,000k"), 3000.0);
        assert_eq!(extract_number("~12.5 each"), 12.5);
        assert_eq!(extract_number("N/A"), 0.0);
        assert_eq!(extract_number(""), 0.0);
    }

    #[test]
    fn strip_non_ascii_removes_emoji() {
        assert_eq!(strip_non_ascii("🔥 AK-47 Ace 🔥").trim(), "AK-47 Ace");
    }

    #[test]
    fn parse_datetime_accepts_naive_iso() {
        let dt = parse_datetime("2025-03-01T10:20:30.123456").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.hour()), (2025, 3, 10));
        assert!(parse_datetime("2025-03-01T10:20:30+02:00").is_some());
        assert!(parse_datetime("yesterday").is_none());
    }

    #[test]
    fn collapse_whitespace_trims_and_joins() {
        assert_eq!(collapse_whitespace("  ak-47   redline \n"), "ak-47 redline");
    }
}
