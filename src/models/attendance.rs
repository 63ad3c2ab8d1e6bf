use super::{event_type::EventType, space::Space};
use crate::utils::time::parse_time_of_day;
use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;

/// One clock-in or clock-out event.
///
/// `date` and `time_of_day` describe the real-world event, `created_at` is when
/// the record was submitted. `time_of_day` stays a raw `HH:MM` string because
/// rows coming back from storage are not guaranteed to be well formed.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceRecord {
    pub id: Option<i64>,           // ⇔ attendance.id (assigned on insert)
    pub person_name: String,       // ⇔ attendance.person_name
    pub date: NaiveDate,           // ⇔ attendance.date (TEXT "YYYY-MM-DD")
    pub time_of_day: String,       // ⇔ attendance.time (TEXT "HH:MM")
    pub event_type: EventType,     // ⇔ attendance.kind ('entry' | 'exit')
    pub space: Space,              // ⇔ attendance.space ('office' | 'auditorium')
    pub created_at: DateTime<Local>, // ⇔ attendance.created_at (TEXT, RFC 3339)
    pub latitude: f64,
    pub longitude: f64,
    pub distance_meters: f64,
}

impl AttendanceRecord {
    /// Builds a record that has not been persisted yet.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        person_name: &str,
        date: NaiveDate,
        time_of_day: &str,
        event_type: EventType,
        space: Space,
        latitude: f64,
        longitude: f64,
        distance_meters: f64,
    ) -> Self {
        Self {
            id: None,
            person_name: person_name.to_string(),
            date,
            time_of_day: time_of_day.to_string(),
            event_type,
            space,
            created_at: Local::now(),
            latitude,
            longitude,
            distance_meters,
        }
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Minutes since midnight, or `None` when `time_of_day` is not `HH:MM`.
    pub fn minutes_of_day(&self) -> Option<i64> {
        parse_time_of_day(&self.time_of_day)
    }
}

/// Selection of attendance rows, applied in SQL by the store and in memory
/// when splitting a snapshot per person.
#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    pub person_name: Option<String>,
    pub space: Option<Space>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl AttendanceFilter {
    pub fn matches(&self, rec: &AttendanceRecord) -> bool {
        if let Some(name) = &self.person_name
            && &rec.person_name != name
        {
            return false;
        }
        if let Some(space) = self.space
            && rec.space != space
        {
            return false;
        }
        if let Some(from) = self.from
            && rec.date < from
        {
            return false;
        }
        if let Some(to) = self.to
            && rec.date > to
        {
            return false;
        }
        true
    }
}
