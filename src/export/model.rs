// src/export/model.rs

use crate::config::Config;
use crate::models::attendance::AttendanceRecord;
use crate::models::summary::PersonHoursSummary;
use crate::models::task::TaskEntry;
use serde::Serialize;

/// Flat attendance row for CSV / JSON.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct AttendanceExport {
    pub id: i64,
    pub person_name: String,
    pub date: String,
    pub time: String,
    pub kind: String,
    pub space: String,
    pub latitude: f64,
    pub longitude: f64,
    pub distance_meters: f64,
    pub created_at: String,
}

impl From<&AttendanceRecord> for AttendanceExport {
    fn from(r: &AttendanceRecord) -> Self {
        Self {
            id: r.id.unwrap_or_default(),
            person_name: r.person_name.clone(),
            date: r.date_str(),
            time: r.time_of_day.clone(),
            kind: r.event_type.to_db_str().to_string(),
            space: r.space.to_db_str().to_string(),
            latitude: r.latitude,
            longitude: r.longitude,
            distance_meters: round1(r.distance_meters),
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

/// One roster member's hours, rounded to one decimal.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SummaryExport {
    pub person_name: String,
    pub weekly_hours: f64,
    pub weekly_target_hours: f64,
    pub weekly_percentage: f64,
    pub monthly_hours: f64,
    pub monthly_target_hours: f64,
    pub hours_remaining_this_month: f64,
    pub under_weekly_target: bool,
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

impl From<&PersonHoursSummary> for SummaryExport {
    fn from(s: &PersonHoursSummary) -> Self {
        Self {
            person_name: s.person_name.clone(),
            weekly_hours: round1(s.weekly_hours),
            weekly_target_hours: s.weekly_target_hours,
            weekly_percentage: round1(s.weekly_percentage()),
            monthly_hours: round1(s.monthly_hours),
            monthly_target_hours: s.monthly_target_hours,
            hours_remaining_this_month: round1(s.hours_remaining_this_month),
            under_weekly_target: s.is_under_weekly_target,
        }
    }
}

/// Flat task row; the category is exported with its display label.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TaskExport {
    pub id: i64,
    pub event_date: String,
    pub due_date: String,
    pub title: String,
    pub description: String,
    pub responsible: String,
    pub category: String,
    pub completed: bool,
    pub created_at: String,
}

impl TaskExport {
    pub fn from_task(t: &TaskEntry, cfg: &Config) -> Self {
        Self {
            id: t.id.unwrap_or_default(),
            event_date: t.event_date.format("%Y-%m-%d").to_string(),
            due_date: t.due_date.format("%Y-%m-%d").to_string(),
            title: t.title.clone(),
            description: t.description.clone(),
            responsible: t.responsible.clone(),
            category: cfg.category_label(&t.category).to_string(),
            completed: t.completed,
            created_at: t.created_at.to_rfc3339(),
        }
    }
}
