use crate::core::calculator::hours::compute_worked_hours;
use crate::core::calculator::period::{DateRange, month_range, week_range, weeks_in_month};
use crate::models::attendance::{AttendanceFilter, AttendanceRecord};
use crate::models::space::Space;
use crate::models::summary::PersonHoursSummary;
use chrono::NaiveDate;

/// Default weekly target, in hours.
pub const DEFAULT_WEEKLY_TARGET_HOURS: f64 = 20.0;

fn records_in(records: &[AttendanceRecord], range: &DateRange) -> Vec<AttendanceRecord> {
    records
        .iter()
        .filter(|r| range.contains(r.date))
        .cloned()
        .collect()
}

/// Weekly / monthly totals for one person against the targets.
///
/// `records` must already be restricted to that person. The monthly target
/// scales with the number of Monday-starting weeks touching `month`.
pub fn summarize(
    person_name: &str,
    records: &[AttendanceRecord],
    week: &DateRange,
    month: &DateRange,
    weekly_target_hours: f64,
) -> PersonHoursSummary {
    let weekly_hours = compute_worked_hours(&records_in(records, week));
    let monthly_hours = compute_worked_hours(&records_in(records, month));

    let monthly_target_hours = weekly_target_hours * weeks_in_month(month.start) as f64;

    PersonHoursSummary {
        person_name: person_name.to_string(),
        weekly_hours,
        monthly_hours,
        weekly_target_hours,
        monthly_target_hours,
        is_under_weekly_target: weekly_hours < weekly_target_hours,
        hours_remaining_this_month: (monthly_target_hours - monthly_hours).max(0.0),
    }
}

/// Names to report on: the configured roster, or everyone seen in `records`
/// (sorted) when the space has no roster.
pub fn roster_or_seen(roster: &[String], records: &[AttendanceRecord]) -> Vec<String> {
    if !roster.is_empty() {
        return roster.to_vec();
    }
    let mut seen: Vec<String> = records.iter().map(|r| r.person_name.clone()).collect();
    seen.sort();
    seen.dedup();
    seen
}

/// One summary per roster member, for the week and month containing `today`.
///
/// `all_records` may contain everyone; it is split by name (and by space
/// when one is given) before aggregating.
pub fn summarize_roster(
    all_records: &[AttendanceRecord],
    roster: &[String],
    space: Option<Space>,
    today: NaiveDate,
    weekly_target_hours: f64,
) -> Vec<PersonHoursSummary> {
    let week = week_range(today);
    let month = month_range(today);

    roster
        .iter()
        .map(|name| {
            let filter = AttendanceFilter {
                person_name: Some(name.clone()),
                space,
                ..Default::default()
            };
            let own: Vec<AttendanceRecord> = all_records
                .iter()
                .filter(|r| filter.matches(r))
                .cloned()
                .collect();
            summarize(name, &own, &week, &month, weekly_target_hours)
        })
        .collect()
}
