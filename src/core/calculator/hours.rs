//! Worked time from raw entry/exit events.
//!
//! Records are grouped by calendar date and scanned in time-of-day order with
//! at most one open entry per day:
//!
//! | state          | event           | next           | effect            |
//! |----------------|-----------------|----------------|-------------------|
//! | no open entry  | entry@t         | open(t)        |                   |
//! | no open entry  | exit@t          | no open entry  | ignored           |
//! | open(t0)       | entry@t1        | open(t1)       | t0 discarded      |
//! | open(t0)       | exit@t1, t1>t0  | no open entry  | add t1 - t0       |
//! | open(t0)       | exit@t1, t1<=t0 | no open entry  | discarded         |
//!
//! Records whose time of day is not `HH:MM` are left out of the scan.

use crate::models::attendance::AttendanceRecord;
use crate::models::event_type::EventType;
use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DayState {
    NoOpenEntry,
    OpenEntry(i64),
}

impl DayState {
    /// Advance the state; returns the next state and the minutes to credit.
    fn step(self, kind: EventType, minute: i64) -> (DayState, i64) {
        match (self, kind) {
            (_, EventType::Entry) => (DayState::OpenEntry(minute), 0),
            (DayState::NoOpenEntry, EventType::Exit) => (DayState::NoOpenEntry, 0),
            (DayState::OpenEntry(start), EventType::Exit) => {
                let diff = minute - start;
                (DayState::NoOpenEntry, if diff > 0 { diff } else { 0 })
            }
        }
    }
}

/// Minutes worked on a single day. `events` may be in any order.
pub fn day_minutes(events: &[(i64, EventType)]) -> i64 {
    let mut sorted = events.to_vec();
    sorted.sort_by_key(|(minute, _)| *minute);

    let mut state = DayState::NoOpenEntry;
    let mut total = 0;

    for (minute, kind) in sorted {
        let (next, credit) = state.step(kind, minute);
        state = next;
        total += credit;
    }

    total
}

/// Worked minutes per date, for records that already belong to one person.
pub fn minutes_by_date(records: &[AttendanceRecord]) -> BTreeMap<NaiveDate, i64> {
    let mut by_date: BTreeMap<NaiveDate, Vec<(i64, EventType)>> = BTreeMap::new();

    for rec in records {
        // malformed HH:MM: unusable for pairing, skip the record only
        let Some(minute) = rec.minutes_of_day() else {
            continue;
        };
        by_date
            .entry(rec.date)
            .or_default()
            .push((minute, rec.event_type));
    }

    by_date
        .into_iter()
        .map(|(date, events)| (date, day_minutes(&events)))
        .collect()
}

pub fn compute_worked_minutes(records: &[AttendanceRecord]) -> i64 {
    minutes_by_date(records).values().sum()
}

/// Total worked hours across all dates in `records`.
pub fn compute_worked_hours(records: &[AttendanceRecord]) -> f64 {
    compute_worked_minutes(records) as f64 / 60.0
}
