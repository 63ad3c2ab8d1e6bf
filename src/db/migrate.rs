use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists. Applied migrations are recorded in it,
/// so it has to exist before anything else.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// Check if `table` has a column named `column`.
fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{table}')"))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn create_attendance_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS attendance (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            person_name  TEXT NOT NULL,
            date         TEXT NOT NULL,
            time         TEXT NOT NULL,
            kind         TEXT NOT NULL CHECK(kind IN ('entry','exit')),
            created_at   TEXT NOT NULL,
            latitude     REAL NOT NULL DEFAULT 0,
            longitude    REAL NOT NULL DEFAULT 0,
            distance     REAL NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_attendance_person_date ON attendance(person_name, date);
        "#,
    )
}

/// Older databases only knew a single implicit space.
fn add_space_to_attendance(conn: &Connection) -> Result<()> {
    if has_column(conn, "attendance", "space")? {
        return Ok(());
    }
    conn.execute_batch(
        r#"
        ALTER TABLE attendance
            ADD COLUMN space TEXT NOT NULL DEFAULT 'office'
            CHECK(space IN ('office','auditorium'));
        "#,
    )
}

fn create_tasks_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            event_date   TEXT NOT NULL,
            due_date     TEXT,
            title        TEXT NOT NULL,
            description  TEXT NOT NULL DEFAULT '',
            responsible  TEXT NOT NULL,
            category     TEXT NOT NULL,
            created_at   TEXT NOT NULL,
            completed    INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_responsible ON tasks(responsible);
        CREATE INDEX IF NOT EXISTS idx_tasks_event_date ON tasks(event_date);
        "#,
    )
}

type Step = fn(&Connection) -> Result<()>;

/// Ordered list of schema steps: (version, description, step).
const MIGRATIONS: &[(&str, &str, Step)] = &[
    (
        "20250301_0001_create_attendance",
        "Created attendance table",
        create_attendance_table,
    ),
    (
        "20250315_0002_add_attendance_space",
        "Added 'space' to attendance table",
        add_space_to_attendance,
    ),
    (
        "20250315_0003_create_tasks",
        "Created tasks table",
        create_tasks_table,
    ),
];

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> AppResult<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;

    for (version, message, step) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }

        step(conn).map_err(|e| AppError::Migration(format!("{version}: {e}")))?;
        mark_applied(conn, version, message)?;

        success(format!("Migration applied: {version} → {message}"));
        applied += 1;
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(run_pending_migrations(&conn).unwrap(), MIGRATIONS.len());
        assert_eq!(run_pending_migrations(&conn).unwrap(), 0);

        assert!(has_column(&conn, "attendance", "space").unwrap());
        assert!(has_column(&conn, "tasks", "completed").unwrap());
    }

    #[test]
    fn legacy_attendance_rows_default_to_office() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_log_table(&conn).unwrap();
        create_attendance_table(&conn).unwrap();
        mark_applied(&conn, MIGRATIONS[0].0, "legacy").unwrap();

        conn.execute(
            "INSERT INTO attendance (person_name, date, time, kind, created_at)
             VALUES ('ANA', '2025-03-01', '08:00', 'entry', '2025-03-01T08:00:00+00:00')",
            [],
        )
        .unwrap();

        run_pending_migrations(&conn).unwrap();

        let space: String = conn
            .query_row("SELECT space FROM attendance", [], |r| r.get(0))
            .unwrap();
        assert_eq!(space, "office");
    }
}
