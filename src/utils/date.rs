use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Strict `YYYY-MM-DD` for user input.
pub fn require_date(s: &str) -> AppResult<NaiveDate> {
    parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string()))
}

/// Optional user date, today when absent.
pub fn date_or_today(s: Option<&str>) -> AppResult<NaiveDate> {
    s.map(require_date).unwrap_or_else(|| Ok(today()))
}

pub fn month_last_day(year: i32, month: u32) -> Option<u32> {
    let (ny, nm) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(ny, nm, 1)?
        .pred_opt()
        .map(|d| d.day())
}

/// Parse a period expression into an inclusive (start, end) pair.
///
/// Supports:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - START:END with any of the above on either side
pub fn parse_period(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let p = p.trim();

    if let Some((start_raw, end_raw)) = p.split_once(':') {
        let (start, _) = parse_single(start_raw.trim())?;
        let (_, end) = parse_single(end_raw.trim())?;

        if end < start {
            return Err(AppError::InvalidPeriod(format!(
                "{p}: end comes before start"
            )));
        }
        return Ok((start, end));
    }

    parse_single(p)
}

fn parse_single(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let invalid = || AppError::InvalidPeriod(p.to_string());

    match p.len() {
        // YYYY-MM-DD
        10 => {
            let d = parse_date(p).ok_or_else(invalid)?;
            Ok((d, d))
        }
        // YYYY-MM
        7 => {
            let first =
                NaiveDate::parse_from_str(&format!("{p}-01"), "%Y-%m-%d").map_err(|_| invalid())?;
            let last_day = month_last_day(first.year(), first.month()).ok_or_else(invalid)?;
            let last = NaiveDate::from_ymd_opt(first.year(), first.month(), last_day)
                .ok_or_else(invalid)?;
            Ok((first, last))
        }
        // YYYY
        4 => {
            let year: i32 = p.parse().map_err(|_| invalid())?;
            let first = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid)?;
            let last = NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(invalid)?;
            Ok((first, last))
        }
        _ => Err(invalid()),
    }
}
