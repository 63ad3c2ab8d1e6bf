//! Calendar ranges used by the reports. Weeks start on Monday.

use chrono::{Datelike, Days, NaiveDate};
use clap::ValueEnum;
use serde::Serialize;

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as u64;
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// Monday..=Sunday containing `date`.
pub fn week_range(date: NaiveDate) -> DateRange {
    let start = week_start(date);
    let end = start.checked_add_days(Days::new(6)).unwrap_or(start);
    DateRange::new(start, end)
}

/// First..=last calendar day of `date`'s month.
pub fn month_range(date: NaiveDate) -> DateRange {
    let start = date.with_day(1).unwrap_or(date);
    let end = start
        .checked_add_months(chrono::Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date);
    DateRange::new(start, end)
}

/// Number of Monday-starting weeks that overlap the calendar month of `date`.
///
/// A month whose first day is a Monday and that has 28 days spans exactly 4
/// weeks; most months touch 5, and a 31-day month starting on a Sunday touches 6.
pub fn weeks_in_month(date: NaiveDate) -> u32 {
    let month = month_range(date);
    let first_week = week_start(month.start);
    let last_week = week_start(month.end);
    ((last_week - first_week).num_days() / 7 + 1) as u32
}

/// Relative window used by the task views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TimeFilter {
    Day,
    Week,
    Month,
    #[default]
    All,
}

impl TimeFilter {
    /// Window `[start, today]`, or `None` for `All`.
    pub fn range(&self, today: NaiveDate) -> Option<DateRange> {
        let start = match self {
            TimeFilter::Day => today,
            TimeFilter::Week => week_start(today),
            TimeFilter::Month => month_range(today).start,
            TimeFilter::All => return None,
        };
        Some(DateRange::new(start, today))
    }

    pub fn label(&self, today: NaiveDate) -> String {
        match self {
            TimeFilter::Day => format!("Today ({})", today.format("%d/%m/%Y")),
            TimeFilter::Week => format!(
                "This week ({} - {})",
                week_start(today).format("%d/%m/%Y"),
                today.format("%d/%m/%Y")
            ),
            TimeFilter::Month => format!("This month ({})", today.format("%B %Y")),
            TimeFilter::All => "All records".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn week_runs_monday_to_sunday() {
        // 2026-10-21 is a Wednesday
        assert_eq!(week_range(d("2026-10-21")), DateRange::new(d("2026-10-19"), d("2026-10-25")));
        // Sunday belongs to the week that started six days earlier
        assert_eq!(week_range(d("2026-10-25")).start, d("2026-10-19"));
        assert_eq!(week_range(d("2026-10-19")).start, d("2026-10-19"));
    }

    #[test]
    fn month_bounds() {
        assert_eq!(month_range(d("2024-02-10")), DateRange::new(d("2024-02-01"), d("2024-02-29")));
        assert_eq!(month_range(d("2025-12-31")), DateRange::new(d("2025-12-01"), d("2025-12-31")));
    }

    #[test]
    fn weeks_overlapping_month() {
        assert_eq!(weeks_in_month(d("2021-02-15")), 4);
        assert_eq!(weeks_in_month(d("2026-10-01")), 5);
        assert_eq!(weeks_in_month(d("2026-03-31")), 6);
    }

    #[test]
    fn range_is_inclusive() {
        let r = DateRange::new(d("2025-01-01"), d("2025-01-31"));
        assert!(r.contains(d("2025-01-01")));
        assert!(r.contains(d("2025-01-31")));
        assert!(!r.contains(d("2025-02-01")));
    }

    #[test]
    fn time_filter_windows() {
        let today = d("2026-10-21");
        assert_eq!(TimeFilter::Day.range(today), Some(DateRange::new(today, today)));
        assert_eq!(TimeFilter::Week.range(today).unwrap().start, d("2026-10-19"));
        assert_eq!(TimeFilter::Month.range(today).unwrap().start, d("2026-10-01"));
        assert_eq!(TimeFilter::All.range(today), None);
    }
}
