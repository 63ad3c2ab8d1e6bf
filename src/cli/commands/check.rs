use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::geofence::{LocationError, LocationStatus, haversine_distance};
use crate::core::watch::{FixedSource, LocationWatcher, PositionSource, ReplaySource};
use crate::errors::{AppError, AppResult};
use crate::models::coordinate::PositionReading;
use crate::utils::colors::{GREEN, GREY, RED, RESET, YELLOW};
use crate::utils::table::{Column, Table};
use std::fs::File;

fn status_line(status: &LocationStatus, allowed: f64) -> String {
    let color = match status {
        LocationStatus::InRange(_) => GREEN,
        LocationStatus::OutOfRange(_) => RED,
        LocationStatus::Unavailable(_) => YELLOW,
        LocationStatus::Acquiring => GREY,
    };
    format!("{color}{}{RESET}", status.describe(allowed))
}

/// Pump `source` through the watcher, printing every status change when `verbose`.
fn follow<S: PositionSource>(watcher: &mut LocationWatcher, source: &mut S, verbose: bool) {
    let allowed = watcher.fence().allowed_range_meters();
    let mut watch = watcher.watch(source);
    let mut step = 0;
    while watch.poll() {
        step += 1;
        if verbose {
            println!("#{step:<3} {}", status_line(watch.status(), allowed));
        }
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Check {
        lat,
        lon,
        accuracy,
        space,
        replay,
    } = cmd
    {
        let fence = cfg.fence(*space)?;
        let allowed = fence.allowed_range_meters();
        let mut watcher = LocationWatcher::new(fence);

        match replay {
            Some(file) => {
                let mut source = ReplaySource::from_reader(File::open(file)?)?;
                follow(&mut watcher, &mut source, true);
            }
            None => {
                let (Some(lat), Some(lon)) = (lat, lon) else {
                    return Err(AppError::LocationUnavailable(
                        LocationError::PositionUnavailable,
                    ));
                };
                let mut source = FixedSource::new(Ok(PositionReading::new(*lat, *lon, *accuracy)));
                follow(&mut watcher, &mut source, false);
            }
        }

        println!("📍 {} space", space.label());

        if let Some(reading) = watcher.last_reading() {
            let mut table = Table::new(vec![
                Column::new("Reference", 24),
                Column::new("Distance", 12),
                Column::new("Radius", 8),
            ]);
            for r in watcher.fence().references() {
                let d = haversine_distance(&reading.coordinate, &r.coordinate);
                table.add_row(vec![
                    r.display_label(),
                    format!("{d:.1}m"),
                    format!("{}m", r.radius_meters.unwrap_or(allowed)),
                ]);
            }
            print!("{}", table.render());
            if let Some(acc) = reading.accuracy_meters {
                println!("Accuracy: ±{acc:.0}m");
            }
        }

        println!("{}", status_line(watcher.status(), allowed));
    }
    Ok(())
}
