use crate::db::pool::DbPool;
use crate::db::queries::{parse_db_date, parse_db_timestamp};
use crate::db::store::TaskStore;
use crate::errors::{AppError, AppResult};
use crate::models::task::{TaskEntry, default_due_date};
use chrono::NaiveDate;
use rusqlite::{OptionalExtension, Result, Row, params};

pub fn map_task_row(row: &Row) -> Result<TaskEntry> {
    let event_str: String = row.get("event_date")?;
    let event_date = parse_db_date(1, &event_str)?;

    // rows without a due date fall back to one week after the event
    let due_date = match row.get::<_, Option<String>>("due_date")? {
        Some(s) if !s.is_empty() => parse_db_date(2, &s)?,
        _ => default_due_date(event_date),
    };

    let created_str: String = row.get("created_at")?;

    Ok(TaskEntry {
        id: Some(row.get("id")?),
        event_date,
        due_date,
        title: row.get("title")?,
        description: row.get("description")?,
        responsible: row.get("responsible")?,
        category: row.get("category")?,
        created_at: parse_db_timestamp(7, &created_str)?,
        completed: row.get::<_, i32>("completed")? == 1,
    })
}

fn collect(stmt: &mut rusqlite::Statement<'_>, p: impl rusqlite::Params) -> AppResult<Vec<TaskEntry>> {
    let rows = stmt.query_map(p, map_task_row)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

impl TaskStore for DbPool {
    fn save_task(&mut self, task: &TaskEntry) -> AppResult<i64> {
        self.conn.execute(
            "INSERT INTO tasks (event_date, due_date, title, description, responsible, category, created_at, completed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                task.event_date.format("%Y-%m-%d").to_string(),
                task.due_date.format("%Y-%m-%d").to_string(),
                task.title,
                task.description,
                task.responsible,
                task.category,
                task.created_at.to_rfc3339(),
                if task.completed { 1 } else { 0 },
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_task(&mut self, task: &TaskEntry) -> AppResult<()> {
        let id = task
            .id
            .ok_or_else(|| AppError::InvalidTask("cannot update a task without id".into()))?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET event_date = ?1, due_date = ?2, title = ?3, description = ?4,
                 responsible = ?5, category = ?6, created_at = ?7, completed = ?8
             WHERE id = ?9",
            params![
                task.event_date.format("%Y-%m-%d").to_string(),
                task.due_date.format("%Y-%m-%d").to_string(),
                task.title,
                task.description,
                task.responsible,
                task.category,
                task.created_at.to_rfc3339(),
                if task.completed { 1 } else { 0 },
                id,
            ],
        )?;

        if changed == 0 {
            return Err(AppError::TaskNotFound(id));
        }
        Ok(())
    }

    fn set_task_completed(&mut self, id: i64, completed: bool) -> AppResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks SET completed = ?1 WHERE id = ?2",
            params![if completed { 1 } else { 0 }, id],
        )?;
        if changed == 0 {
            return Err(AppError::TaskNotFound(id));
        }
        Ok(())
    }

    fn load_task(&mut self, id: i64) -> AppResult<Option<TaskEntry>> {
        let task = self
            .conn
            .query_row("SELECT * FROM tasks WHERE id = ?1", [id], map_task_row)
            .optional()?;
        Ok(task)
    }

    fn load_all_tasks(&mut self) -> AppResult<Vec<TaskEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM tasks ORDER BY created_at DESC, id DESC")?;
        collect(&mut stmt, [])
    }

    fn load_tasks_between(&mut self, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<TaskEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT * FROM tasks
             WHERE event_date >= ?1 AND event_date <= ?2
             ORDER BY event_date DESC, id DESC",
        )?;
        collect(
            &mut stmt,
            params![
                from.format("%Y-%m-%d").to_string(),
                to.format("%Y-%m-%d").to_string()
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;

    fn pool() -> DbPool {
        let pool = DbPool::in_memory().unwrap();
        init_db(&pool.conn).unwrap();
        pool
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn save_update_and_complete() {
        let mut pool = pool();
        let mut t = TaskEntry::new(d("2025-03-03"), None, "Informe", "mensual", "ANA", "informe");
        let id = pool.save_task(&t).unwrap();

        t.id = Some(id);
        t.title = "Informe final".into();
        pool.update_task(&t).unwrap();
        pool.set_task_completed(id, true).unwrap();

        let got = pool.load_task(id).unwrap().unwrap();
        assert_eq!(got.title, "Informe final");
        assert_eq!(got.due_date, d("2025-03-10"));
        assert!(got.completed);
    }

    #[test]
    fn missing_task_is_reported() {
        let mut pool = pool();
        assert!(matches!(
            pool.set_task_completed(42, true),
            Err(AppError::TaskNotFound(42))
        ));
        assert!(pool.load_task(42).unwrap().is_none());
    }

    #[test]
    fn null_due_date_defaults_to_a_week_later() {
        let mut pool = pool();
        pool.conn
            .execute(
                "INSERT INTO tasks (event_date, title, responsible, category, created_at)
                 VALUES ('2025-03-28', 't', 'ANA', 'reunion', '2025-03-28T10:00:00+00:00')",
                [],
            )
            .unwrap();
        let all = pool.load_all_tasks().unwrap();
        assert_eq!(all[0].due_date, d("2025-04-04"));
    }

    #[test]
    fn between_is_inclusive_and_newest_first() {
        let mut pool = pool();
        for day in ["2025-03-01", "2025-03-05", "2025-03-10"] {
            pool.save_task(&TaskEntry::new(d(day), None, day, "", "ANA", "reunion"))
                .unwrap();
        }
        let got = pool.load_tasks_between(d("2025-03-01"), d("2025-03-05")).unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].event_date, d("2025-03-05"));
    }
}
