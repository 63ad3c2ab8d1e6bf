use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::store::{AttendanceStore, AuditLog};
use crate::errors::{AppError, AppResult};
use crate::models::attendance::{AttendanceFilter, AttendanceRecord};
use crate::models::event_type::EventType;
use crate::models::space::Space;
use chrono::{DateTime, Local, NaiveDate};
use rusqlite::types::{ToSql, Type};
use rusqlite::{Connection, Result, Row, params};

/// Column order shared by every attendance SELECT; `map_row` error indices follow it.
const ATTENDANCE_COLUMNS: &str =
    "id, person_name, date, time, kind, space, created_at, latitude, longitude, distance";

fn conversion_error(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

pub(crate) fn parse_db_date(idx: usize, s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| conversion_error(idx, AppError::InvalidDate(s.to_string())))
}

pub(crate) fn parse_db_timestamp(idx: usize, s: &str) -> Result<DateTime<Local>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|_| conversion_error(idx, AppError::InvalidDate(s.to_string())))
}

pub fn map_row(row: &Row) -> Result<AttendanceRecord> {
    let date_str: String = row.get("date")?;
    let date = parse_db_date(2, &date_str)?;

    let kind_str: String = row.get("kind")?;
    let event_type = EventType::from_db_str(&kind_str)
        .ok_or_else(|| conversion_error(4, AppError::InvalidEventType(kind_str.clone())))?;

    // rows written before spaces existed belong to the single implicit space
    let space = match row.get::<_, Option<String>>("space")? {
        Some(s) => Space::from_db_str(&s)
            .ok_or_else(|| conversion_error(5, AppError::InvalidSpace(s.clone())))?,
        None => Space::default(),
    };

    let created_str: String = row.get("created_at")?;
    let created_at = parse_db_timestamp(6, &created_str)?;

    Ok(AttendanceRecord {
        id: Some(row.get("id")?),
        person_name: row.get("person_name")?,
        date,
        time_of_day: row.get("time")?,
        event_type,
        space,
        created_at,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        distance_meters: row.get("distance")?,
    })
}

pub fn insert_attendance(conn: &Connection, rec: &AttendanceRecord) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO attendance (person_name, date, time, kind, space, created_at, latitude, longitude, distance)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            rec.person_name,
            rec.date_str(),
            rec.time_of_day,
            rec.event_type.to_db_str(),
            rec.space.to_db_str(),
            rec.created_at.to_rfc3339(),
            rec.latitude,
            rec.longitude,
            rec.distance_meters,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_attendance(conn: &Connection, filter: &AttendanceFilter) -> AppResult<Vec<AttendanceRecord>> {
    let mut clauses: Vec<&str> = Vec::new();
    let mut values: Vec<Box<dyn ToSql>> = Vec::new();

    if let Some(name) = &filter.person_name {
        clauses.push("person_name = ?");
        values.push(Box::new(name.clone()));
    }
    if let Some(space) = filter.space {
        clauses.push("space = ?");
        values.push(Box::new(space.to_db_str()));
    }
    if let Some(from) = filter.from {
        clauses.push("date >= ?");
        values.push(Box::new(from.format("%Y-%m-%d").to_string()));
    }
    if let Some(to) = filter.to {
        clauses.push("date <= ?");
        values.push(Box::new(to.format("%Y-%m-%d").to_string()));
    }

    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };

    let sql = format!(
        "SELECT {ATTENDANCE_COLUMNS} FROM attendance {where_sql} ORDER BY created_at DESC, id DESC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        rusqlite::params_from_iter(values.iter().map(|v| v.as_ref())),
        map_row,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

impl AttendanceStore for DbPool {
    fn save_attendance(&mut self, rec: &AttendanceRecord) -> AppResult<i64> {
        insert_attendance(&self.conn, rec)
    }

    fn load_all_attendance(&mut self) -> AppResult<Vec<AttendanceRecord>> {
        load_attendance(&self.conn, &AttendanceFilter::default())
    }

    fn load_filtered_attendance(
        &mut self,
        filter: &AttendanceFilter,
    ) -> AppResult<Vec<AttendanceRecord>> {
        load_attendance(&self.conn, filter)
    }
}

impl AuditLog for DbPool {
    fn audit(&mut self, operation: &str, target: &str, message: &str) -> AppResult<()> {
        ttlog(&self.conn, operation, target, message)
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

    fn rec(name: &str, date: &str, time: &str, kind: EventType, space: Space) -> AttendanceRecord {
        AttendanceRecord::new(name, d(date), time, kind, space, 3.372, -76.534, 12.5)
    }

    #[test]
    fn save_assigns_ids_and_round_trips_fields() {
        let mut pool = pool();
        let a = rec("ANA", "2025-03-03", "08:00", EventType::Entry, Space::Auditorium);
        let id = pool.save_attendance(&a).unwrap();
        assert!(id > 0);

        let all = pool.load_all_attendance().unwrap();
        assert_eq!(all.len(), 1);
        let got = &all[0];
        assert_eq!(got.id, Some(id));
        assert_eq!(got.person_name, "ANA");
        assert_eq!(got.date, d("2025-03-03"));
        assert_eq!(got.time_of_day, "08:00");
        assert_eq!(got.event_type, EventType::Entry);
        assert_eq!(got.space, Space::Auditorium);
        assert_eq!(got.distance_meters, 12.5);
    }

    #[test]
    fn filters_combine() {
        let mut pool = pool();
        for r in [
            rec("ANA", "2025-03-03", "08:00", EventType::Entry, Space::Office),
            rec("ANA", "2025-03-10", "08:00", EventType::Entry, Space::Office),
            rec("ANA", "2025-03-04", "08:00", EventType::Entry, Space::Auditorium),
            rec("LUIS", "2025-03-03", "09:00", EventType::Entry, Space::Office),
        ] {
            pool.save_attendance(&r).unwrap();
        }

        let f = AttendanceFilter {
            person_name: Some("ANA".into()),
            space: Some(Space::Office),
            from: Some(d("2025-03-01")),
            to: Some(d("2025-03-09")),
        };
        let got = pool.load_filtered_attendance(&f).unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].date, d("2025-03-03"));
        assert!(got.iter().all(|r| f.matches(r)));

        let only_luis = AttendanceFilter {
            person_name: Some("LUIS".into()),
            ..Default::default()
        };
        assert_eq!(pool.load_filtered_attendance(&only_luis).unwrap().len(), 1);
    }

    #[test]
    fn malformed_time_is_loaded_as_is() {
        let mut pool = pool();
        pool.save_attendance(&rec("ANA", "2025-03-03", "8h", EventType::Exit, Space::Office))
            .unwrap();
        let all = pool.load_all_attendance().unwrap();
        assert_eq!(all[0].time_of_day, "8h");
        assert_eq!(all[0].minutes_of_day(), None);
    }

    #[test]
    fn bad_stored_values_name_their_column() {
        let pool = pool();
        pool.conn
            .execute(
                "INSERT INTO attendance (person_name, date, time, kind, space, created_at)
                 VALUES ('ANA', '2025-03-03', '08:00', 'entry', 'office', 'yesterday')",
                [],
            )
            .unwrap();

        let err = load_attendance(&pool.conn, &AttendanceFilter::default()).unwrap_err();
        let AppError::Db(rusqlite::Error::FromSqlConversionFailure(idx, _, _)) = err else {
            panic!("unexpected error: {err:?}");
        };
        let columns: Vec<&str> = ATTENDANCE_COLUMNS.split(", ").collect();
        assert_eq!(columns[idx], "created_at");

        pool.conn
            .execute("UPDATE attendance SET created_at = '2025-03-03T08:00:00+00:00', date = '2025-13-40'", [])
            .unwrap();
        let err = load_attendance(&pool.conn, &AttendanceFilter::default()).unwrap_err();
        let AppError::Db(rusqlite::Error::FromSqlConversionFailure(idx, _, _)) = err else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(columns[idx], "date");
    }

    #[test]
    fn audit_writes_log_rows() {
        let mut pool = pool();
        pool.audit("attend", "ANA", "Entry at 08:00").unwrap();
        let rows = crate::db::log::load_log(&pool.conn).unwrap();
        let last = rows.last().unwrap();
        assert_eq!(last.operation, "attend");
        assert_eq!(last.target, "ANA");
    }
}
