use chrono::{DateTime, Days, Local, NaiveDate};
use clap::ValueEnum;
use serde::Serialize;

/// Days added to the event date when a task is created without a due date.
pub const DEFAULT_DUE_DAYS: u64 = 7;

#[derive(Debug, Clone, Serialize)]
pub struct TaskEntry {
    pub id: Option<i64>,
    pub event_date: NaiveDate,
    pub due_date: NaiveDate,
    pub title: String,
    pub description: String,
    pub responsible: String,
    pub category: String, // category code, labels live in the config
    pub created_at: DateTime<Local>,
    pub completed: bool,
}

impl TaskEntry {
    pub fn new(
        event_date: NaiveDate,
        due_date: Option<NaiveDate>,
        title: &str,
        description: &str,
        responsible: &str,
        category: &str,
    ) -> Self {
        Self {
            id: None,
            event_date,
            due_date: due_date.unwrap_or_else(|| default_due_date(event_date)),
            title: title.to_string(),
            description: description.to_string(),
            responsible: responsible.to_string(),
            category: category.to_string(),
            created_at: Local::now(),
            completed: false,
        }
    }

    /// Pending and past its due date.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date < today
    }
}

pub fn default_due_date(event_date: NaiveDate) -> NaiveDate {
    event_date
        .checked_add_days(Days::new(DEFAULT_DUE_DAYS))
        .unwrap_or(event_date)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TaskStatus {
    Completed,
    Pending,
}

impl TaskStatus {
    pub fn matches(&self, completed: bool) -> bool {
        match self {
            TaskStatus::Completed => completed,
            TaskStatus::Pending => !completed,
        }
    }
}

/// Filter applied to the task log (all criteria are combined with AND).
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub responsible: Option<String>,
    pub status: Option<TaskStatus>,
    pub overdue_only: bool,
}

impl TaskFilter {
    pub fn is_empty(&self) -> bool {
        self.responsible.is_none() && self.status.is_none() && !self.overdue_only
    }

    pub fn matches(&self, task: &TaskEntry, today: NaiveDate) -> bool {
        if let Some(r) = &self.responsible
            && &task.responsible != r
        {
            return false;
        }
        if let Some(st) = self.status
            && !st.matches(task.completed)
        {
            return false;
        }
        !self.overdue_only || task.is_overdue(today)
    }
}
