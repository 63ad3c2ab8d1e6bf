use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::attendance::{AttendanceLogic, AttendanceRequest};
use crate::core::watch::{FixedSource, LocationWatcher};
use crate::db::initialize::open_db;
use crate::errors::AppResult;
use crate::models::coordinate::PositionReading;
use crate::ui::messages::{info, success};
use crate::utils::date;
use chrono::Local;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Attend {
        name,
        kind,
        lat,
        lon,
        accuracy,
        space,
        date: date_arg,
        time,
    } = cmd
    {
        let mut watcher = LocationWatcher::new(cfg.fence(*space)?);
        let mut source = FixedSource::new(Ok(PositionReading::new(*lat, *lon, *accuracy)));
        watcher.watch(&mut source).drain();

        info(watcher.status().describe(watcher.fence().allowed_range_meters()));

        let request = AttendanceRequest {
            person_name: name.clone(),
            event_type: *kind,
            space: *space,
            date: date::date_or_today(date_arg.as_deref())?,
            time_of_day: time
                .clone()
                .unwrap_or_else(|| Local::now().format("%H:%M").to_string()),
        };

        let mut pool = open_db(&cfg.database)?;
        let rec = AttendanceLogic::submit(&mut pool, &watcher, cfg.roster(*space), request)?;

        success(format!(
            "{} recorded for {} at {} {} ({}, {:.1}m)",
            rec.event_type.label(),
            rec.person_name,
            rec.date_str(),
            rec.time_of_day,
            rec.space.label(),
            rec.distance_meters
        ));
    }
    Ok(())
}
