use crate::core::geofence::LocationError;
use crate::core::watch::LocationWatcher;
use crate::db::store::{AttendanceStore, AuditLog};
use crate::errors::{AppError, AppResult};
use crate::models::attendance::AttendanceRecord;
use crate::models::event_type::EventType;
use crate::models::space::Space;
use crate::utils::time::normalize_time;
use chrono::NaiveDate;

/// What the person fills in; position comes from the watcher.
#[derive(Debug, Clone)]
pub struct AttendanceRequest {
    pub person_name: String,
    pub event_type: EventType,
    pub space: Space,
    pub date: NaiveDate,
    pub time_of_day: String,
}

/// High-level business logic for the `attend` command.
pub struct AttendanceLogic;

impl AttendanceLogic {
    /// Validate the person against the roster of the selected space.
    /// An empty roster accepts any non-empty name.
    pub fn check_person(name: &str, roster: &[String]) -> AppResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidPerson("name is required".into()));
        }
        if !roster.is_empty() && !roster.iter().any(|r| r == name) {
            return Err(AppError::InvalidPerson(name.to_string()));
        }
        Ok(name.to_string())
    }

    /// Gate a submission on the current location status, stamp it and persist it.
    ///
    /// Nothing is written unless the watcher reports an in-range position.
    pub fn submit<S>(
        store: &mut S,
        watcher: &LocationWatcher,
        roster: &[String],
        request: AttendanceRequest,
    ) -> AppResult<AttendanceRecord>
    where
        S: AttendanceStore + AuditLog,
    {
        let allowed = watcher.fence().allowed_range_meters();
        let result = watcher.status().require_in_range(allowed)?;

        let reading = watcher
            .last_reading()
            .ok_or(AppError::LocationUnavailable(LocationError::PositionUnavailable))?;

        let person = Self::check_person(&request.person_name, roster)?;
        let time = normalize_time(&request.time_of_day)?;

        let mut rec = AttendanceRecord::new(
            &person,
            request.date,
            &time,
            request.event_type,
            request.space,
            reading.coordinate.latitude,
            reading.coordinate.longitude,
            result.min_distance_meters,
        );

        let id = store.save_attendance(&rec)?;
        rec.id = Some(id);

        store.audit(
            "attend",
            &person,
            &format!(
                "{} {} at {} {} ({:.1}m)",
                rec.event_type.to_db_str(),
                rec.space.to_db_str(),
                rec.date_str(),
                rec.time_of_day,
                rec.distance_meters
            ),
        )?;

        Ok(rec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geofence::{EARTH_RADIUS_METERS, GeoFence};
    use crate::db::initialize::init_db;
    use crate::db::log::load_log;
    use crate::db::pool::DbPool;
    use crate::models::coordinate::{PositionReading, ReferenceLocation};

    const LAT: f64 = 3.372007;
    const LON: f64 = -76.534116;

    fn pool() -> DbPool {
        let pool = DbPool::in_memory().unwrap();
        init_db(&pool.conn).unwrap();
        pool
    }

    fn watcher_at(meters_north: f64) -> LocationWatcher {
        let fence = GeoFence::new(vec![ReferenceLocation::new(LAT, LON, None)], 300.0).unwrap();
        let mut w = LocationWatcher::new(fence);
        let lat = LAT + (meters_north / EARTH_RADIUS_METERS).to_degrees();
        w.apply(Ok(PositionReading::new(lat, LON, Some(5.0))));
        w
    }

    fn request(name: &str, time: &str) -> AttendanceRequest {
        AttendanceRequest {
            person_name: name.into(),
            event_type: EventType::Entry,
            space: Space::Office,
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            time_of_day: time.into(),
        }
    }

    fn roster() -> Vec<String> {
        vec!["ANA".to_string(), "LUIS".to_string()]
    }

    #[test]
    fn in_range_submission_is_stamped_and_saved() {
        let mut pool = pool();
        let rec = AttendanceLogic::submit(&mut pool, &watcher_at(100.0), &roster(), request(" ANA ", "8:05"))
            .unwrap();

        assert!(rec.id.is_some());
        assert_eq!(rec.person_name, "ANA");
        assert_eq!(rec.time_of_day, "08:05");
        assert!((rec.distance_meters - 100.0).abs() < 0.5);

        let all = pool.load_all_attendance().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, rec.id);

        let log = load_log(&pool.conn).unwrap();
        assert!(log.iter().any(|l| l.operation == "attend" && l.target == "ANA"));
    }

    #[test]
    fn out_of_range_is_refused() {
        let mut pool = pool();
        let err = AttendanceLogic::submit(&mut pool, &watcher_at(900.0), &roster(), request("ANA", "08:00"))
            .unwrap_err();
        assert!(matches!(err, AppError::OutOfRange { allowed, .. } if allowed == 300.0));
        assert!(pool.load_all_attendance().unwrap().is_empty());
    }

    #[test]
    fn unavailable_location_is_refused() {
        let mut pool = pool();
        let mut w = watcher_at(10.0);
        w.apply(Err(LocationError::PermissionDenied));

        let err = AttendanceLogic::submit(&mut pool, &w, &roster(), request("ANA", "08:00")).unwrap_err();
        assert!(matches!(
            err,
            AppError::LocationUnavailable(LocationError::PermissionDenied)
        ));
    }

    #[test]
    fn off_roster_or_bad_time_is_refused() {
        let mut pool = pool();
        let w = watcher_at(10.0);

        assert!(matches!(
            AttendanceLogic::submit(&mut pool, &w, &roster(), request("SOFIA", "08:00")),
            Err(AppError::InvalidPerson(_))
        ));
        assert!(matches!(
            AttendanceLogic::submit(&mut pool, &w, &roster(), request("", "08:00")),
            Err(AppError::InvalidPerson(_))
        ));
        assert!(matches!(
            AttendanceLogic::submit(&mut pool, &w, &roster(), request("ANA", "25:00")),
            Err(AppError::InvalidTime(_))
        ));
        assert!(pool.load_all_attendance().unwrap().is_empty());
    }

    #[test]
    fn empty_roster_accepts_anyone() {
        assert_eq!(AttendanceLogic::check_person("Visitor", &[]).unwrap(), "Visitor");
        assert!(AttendanceLogic::check_person("  ", &[]).is_err());
    }
}
