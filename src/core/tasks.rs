use crate::config::Config;
use crate::core::calculator::period::TimeFilter;
use crate::db::store::{AuditLog, TaskStore};
use crate::errors::{AppError, AppResult};
use crate::models::task::{TaskEntry, TaskFilter};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-person completion counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponsibleStats {
    pub responsible: String,
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

/// Fields that `edit` may change; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub responsible: Option<String>,
    pub category: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.responsible.is_none()
            && self.category.is_none()
            && self.event_date.is_none()
            && self.due_date.is_none()
    }
}

fn validate(task: &TaskEntry) -> AppResult<()> {
    if task.title.trim().is_empty() {
        return Err(AppError::InvalidTask("title is required".into()));
    }
    if task.responsible.trim().is_empty() {
        return Err(AppError::InvalidTask("responsible is required".into()));
    }
    if task.category.trim().is_empty() {
        return Err(AppError::InvalidTask("category is required".into()));
    }
    if task.due_date < task.event_date {
        return Err(AppError::InvalidTask(format!(
            "due date {} is before event date {}",
            task.due_date, task.event_date
        )));
    }
    Ok(())
}

/// High-level business logic for the `task` command family.
pub struct TaskLogic;

impl TaskLogic {
    pub fn add<S>(store: &mut S, mut task: TaskEntry) -> AppResult<TaskEntry>
    where
        S: TaskStore + AuditLog,
    {
        validate(&task)?;
        let id = store.save_task(&task)?;
        task.id = Some(id);

        store.audit("task_add", &id.to_string(), &task.title)?;
        Ok(task)
    }

    pub fn update<S>(store: &mut S, id: i64, changes: TaskChanges) -> AppResult<TaskEntry>
    where
        S: TaskStore + AuditLog,
    {
        let mut task = store.load_task(id)?.ok_or(AppError::TaskNotFound(id))?;

        if let Some(v) = changes.title {
            task.title = v;
        }
        if let Some(v) = changes.description {
            task.description = v;
        }
        if let Some(v) = changes.responsible {
            task.responsible = v;
        }
        if let Some(v) = changes.category {
            task.category = v;
        }
        if let Some(v) = changes.event_date {
            task.event_date = v;
        }
        if let Some(v) = changes.due_date {
            task.due_date = v;
        }

        validate(&task)?;
        store.update_task(&task)?;
        store.audit("task_edit", &id.to_string(), &task.title)?;
        Ok(task)
    }

    pub fn set_completed<S>(store: &mut S, id: i64, completed: bool) -> AppResult<()>
    where
        S: TaskStore + AuditLog,
    {
        store.set_task_completed(id, completed)?;
        let op = if completed { "task_done" } else { "task_undo" };
        store.audit(op, &id.to_string(), if completed { "marked completed" } else { "marked pending" })
    }

    /// Flip the completion flag, returns the new value.
    pub fn toggle<S>(store: &mut S, id: i64) -> AppResult<bool>
    where
        S: TaskStore + AuditLog,
    {
        let task = store.load_task(id)?.ok_or(AppError::TaskNotFound(id))?;
        let completed = !task.completed;
        Self::set_completed(store, id, completed)?;
        Ok(completed)
    }

    pub fn load_all<S: TaskStore>(store: &mut S) -> AppResult<Vec<TaskEntry>> {
        store.load_all_tasks()
    }

    pub fn filter(tasks: &[TaskEntry], filter: &TaskFilter, today: NaiveDate) -> Vec<TaskEntry> {
        tasks
            .iter()
            .filter(|t| filter.matches(t, today))
            .cloned()
            .collect()
    }

    /// Tasks whose event date falls between the filter start and `today`.
    pub fn by_time_filter<S: TaskStore>(
        store: &mut S,
        time_filter: TimeFilter,
        today: NaiveDate,
    ) -> AppResult<Vec<TaskEntry>> {
        match time_filter.range(today) {
            Some(range) => store.load_tasks_between(range.start, today),
            None => {
                let mut all = store.load_all_tasks()?;
                all.sort_by(|a, b| b.event_date.cmp(&a.event_date));
                Ok(all)
            }
        }
    }

    pub fn unique_responsibles(tasks: &[TaskEntry]) -> Vec<String> {
        let mut names: Vec<String> = tasks.iter().map(|t| t.responsible.clone()).collect();
        names.sort();
        names.dedup();
        names
    }

    /// Category labels: those used by existing tasks first (sorted), then the
    /// remaining configured ones. Unknown codes are shown as they are.
    pub fn category_labels(cfg: &Config, tasks: &[TaskEntry]) -> Vec<String> {
        let mut used: Vec<String> = tasks
            .iter()
            .map(|t| cfg.category_label(&t.category).to_string())
            .collect();
        used.sort();
        used.dedup();

        for label in cfg.categories.values() {
            if !used.contains(label) {
                used.push(label.clone());
            }
        }
        used
    }

    /// Totals per responsible, busiest first.
    pub fn responsible_stats(tasks: &[TaskEntry]) -> Vec<ResponsibleStats> {
        let mut by_name: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for t in tasks {
            let e = by_name.entry(t.responsible.as_str()).or_default();
            e.0 += 1;
            if t.completed {
                e.1 += 1;
            }
        }

        let mut out: Vec<ResponsibleStats> = by_name
            .into_iter()
            .map(|(name, (total, completed))| ResponsibleStats {
                responsible: name.to_string(),
                total,
                completed,
                pending: total - completed,
            })
            .collect();

        // stable: ties keep alphabetical order
        out.sort_by(|a, b| b.total.cmp(&a.total));
        out
    }

    /// Task count per category label, largest first.
    pub fn category_stats(cfg: &Config, tasks: &[TaskEntry]) -> Vec<(String, usize)> {
        let mut by_label: BTreeMap<String, usize> = BTreeMap::new();
        for t in tasks {
            *by_label
                .entry(cfg.category_label(&t.category).to_string())
                .or_default() += 1;
        }

        let mut out: Vec<(String, usize)> = by_label.into_iter().collect();
        out.sort_by(|a, b| b.1.cmp(&a.1));
        out
    }
}
