//! Time utilities: parsing HH:MM and formatting hours.

use crate::errors::{AppError, AppResult};
use chrono::{NaiveTime, Timelike};

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t.trim(), "%H:%M").ok()
}

/// `HH:MM` → minutes since midnight. `None` for anything else.
pub fn parse_time_of_day(t: &str) -> Option<i64> {
    parse_time(t).map(|tm| tm.hour() as i64 * 60 + tm.minute() as i64)
}

/// Validates user input and normalises it to zero-padded `HH:MM`.
pub fn normalize_time(t: &str) -> AppResult<String> {
    let tm = parse_time(t).ok_or_else(|| AppError::InvalidTime(t.to_string()))?;
    Ok(tm.format("%H:%M").to_string())
}

/// One-decimal hours, the way reports show them ("12.5h").
pub fn format_hours(hours: f64) -> String {
    format!("{:.1}h", hours)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_times() {
        assert_eq!(parse_time_of_day("00:00"), Some(0));
        assert_eq!(parse_time_of_day("08:30"), Some(510));
        assert_eq!(parse_time_of_day("23:59"), Some(1439));
    }

    #[test]
    fn rejects_malformed_times() {
        assert_eq!(parse_time_of_day(""), None);
        assert_eq!(parse_time_of_day("25:00"), None);
        assert_eq!(parse_time_of_day("12:61"), None);
        assert_eq!(parse_time_of_day("noon"), None);
        assert_eq!(parse_time_of_day("12-30"), None);
    }

    #[test]
    fn normalizes_input() {
        assert_eq!(normalize_time(" 09:05 ").unwrap(), "09:05");
        assert!(normalize_time("9h05").is_err());
    }

    #[test]
    fn formats_hours() {
        assert_eq!(format_hours(12.5), "12.5h");
        assert_eq!(format_hours(0.0), "0.0h");
    }
}
