//! Persistence boundary used by the core logic.
//!
//! The core never talks SQL; it goes through these traits. `DbPool`
//! implements them on top of SQLite (see `queries.rs` and `tasks.rs`).

use crate::errors::AppResult;
use crate::models::attendance::{AttendanceFilter, AttendanceRecord};
use crate::models::task::TaskEntry;
use chrono::NaiveDate;

pub trait AttendanceStore {
    /// Persist a new record and return the id assigned to it.
    fn save_attendance(&mut self, rec: &AttendanceRecord) -> AppResult<i64>;

    /// Every record, newest submission first.
    fn load_all_attendance(&mut self) -> AppResult<Vec<AttendanceRecord>>;

    fn load_filtered_attendance(
        &mut self,
        filter: &AttendanceFilter,
    ) -> AppResult<Vec<AttendanceRecord>>;
}

pub trait TaskStore {
    fn save_task(&mut self, task: &TaskEntry) -> AppResult<i64>;

    fn update_task(&mut self, task: &TaskEntry) -> AppResult<()>;

    fn set_task_completed(&mut self, id: i64, completed: bool) -> AppResult<()>;

    fn load_task(&mut self, id: i64) -> AppResult<Option<TaskEntry>>;

    /// Every task, newest `created_at` first.
    fn load_all_tasks(&mut self) -> AppResult<Vec<TaskEntry>>;

    /// Tasks whose event date falls in `[from, to]`, newest event date first.
    fn load_tasks_between(&mut self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<TaskEntry>>;
}

/// Audit trail for mutations (the internal `log` table).
pub trait AuditLog {
    fn audit(&mut self, operation: &str, target: &str, message: &str) -> AppResult<()>;
}
