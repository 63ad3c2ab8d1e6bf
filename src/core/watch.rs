//! Continuous re-evaluation of the geofence over a stream of position updates.
//!
//! The platform owns the stream ([`PositionSource`]); this module only applies
//! each update to the fence and keeps the latest status. A [`Watch`] is the
//! scoped subscription: dropping it clears the watch on the source.

use crate::core::geofence::{GeoFence, LocationError, LocationStatus};
use crate::errors::{AppError, AppResult};
use crate::models::coordinate::PositionReading;
use std::collections::VecDeque;
use std::io::Read;

pub type PositionUpdate = Result<PositionReading, LocationError>;

pub trait PositionSource {
    /// Next update, or `None` when nothing is pending.
    fn next_update(&mut self) -> Option<PositionUpdate>;

    /// Stop delivering updates. Called exactly once per [`Watch`].
    fn clear_watch(&mut self);
}

#[derive(Debug, Clone)]
pub struct LocationWatcher {
    fence: GeoFence,
    status: LocationStatus,
    last_reading: Option<PositionReading>,
}

impl LocationWatcher {
    pub fn new(fence: GeoFence) -> Self {
        Self {
            fence,
            status: LocationStatus::Acquiring,
            last_reading: None,
        }
    }

    /// Replace the current status with the outcome of `update`.
    pub fn apply(&mut self, update: PositionUpdate) -> &LocationStatus {
        self.status = match update {
            Ok(reading) => {
                self.last_reading = Some(reading);
                LocationStatus::from_result(self.fence.evaluate(&reading))
            }
            Err(e) => LocationStatus::Unavailable(e),
        };
        &self.status
    }

    pub fn status(&self) -> &LocationStatus {
        &self.status
    }

    /// Last good reading. Kept across error updates so it can still be shown.
    pub fn last_reading(&self) -> Option<&PositionReading> {
        self.last_reading.as_ref()
    }

    pub fn fence(&self) -> &GeoFence {
        &self.fence
    }

    pub fn watch<'a, S: PositionSource>(&'a mut self, source: &'a mut S) -> Watch<'a, S> {
        Watch {
            watcher: self,
            source,
            active: true,
        }
    }
}

/// Live subscription of a [`LocationWatcher`] to a [`PositionSource`].
pub struct Watch<'a, S: PositionSource> {
    watcher: &'a mut LocationWatcher,
    source: &'a mut S,
    active: bool,
}

impl<S: PositionSource> Watch<'_, S> {
    /// Apply at most one pending update. Returns `false` when nothing was applied.
    pub fn poll(&mut self) -> bool {
        if !self.active {
            return false;
        }
        match self.source.next_update() {
            Some(update) => {
                self.watcher.apply(update);
                true
            }
            None => false,
        }
    }

    /// Apply every pending update; returns how many were applied.
    pub fn drain(&mut self) -> usize {
        let mut n = 0;
        while self.poll() {
            n += 1;
        }
        n
    }

    pub fn status(&self) -> &LocationStatus {
        self.watcher.status()
    }

    pub fn cancel(&mut self) {
        if self.active {
            self.active = false;
            self.source.clear_watch();
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl<S: PositionSource> Drop for Watch<'_, S> {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Single reading taken from command-line flags.
#[derive(Debug, Clone)]
pub struct FixedSource {
    pending: Option<PositionUpdate>,
}

impl FixedSource {
    pub fn new(update: PositionUpdate) -> Self {
        Self {
            pending: Some(update),
        }
    }
}

impl PositionSource for FixedSource {
    fn next_update(&mut self) -> Option<PositionUpdate> {
        self.pending.take()
    }

    fn clear_watch(&mut self) {
        self.pending = None;
    }
}

/// Recorded track replayed in order.
///
/// Input is header-less CSV, one update per line:
/// `lat,lon[,accuracy]` for a reading, `error,<kind>` for a failure
/// (`denied`, `unavailable`, `timeout`).
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    queue: VecDeque<PositionUpdate>,
    cleared: bool,
}

impl ReplaySource {
    pub fn from_updates(updates: Vec<PositionUpdate>) -> Self {
        Self {
            queue: updates.into(),
            cleared: false,
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> AppResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut updates = Vec::new();
        for (idx, rec) in rdr.records().enumerate() {
            let rec = rec?;
            updates.push(parse_update(&rec).ok_or_else(|| {
                AppError::Config(format!("invalid position on line {}", idx + 1))
            })?);
        }

        Ok(Self::from_updates(updates))
    }

    pub fn is_cleared(&self) -> bool {
        self.cleared
    }
}

fn parse_update(rec: &csv::StringRecord) -> Option<PositionUpdate> {
    let first = rec.get(0)?;

    if first.eq_ignore_ascii_case("error") {
        return LocationError::parse(rec.get(1)?).map(Err);
    }

    let lat: f64 = first.parse().ok()?;
    let lon: f64 = rec.get(1)?.parse().ok()?;
    let accuracy = match rec.get(2) {
        Some(a) if !a.is_empty() => Some(a.parse().ok()?),
        _ => None,
    };

    Some(Ok(PositionReading::new(lat, lon, accuracy)))
}

impl PositionSource for ReplaySource {
    fn next_update(&mut self) -> Option<PositionUpdate> {
        if self.cleared {
            return None;
        }
        self.queue.pop_front()
    }

    fn clear_watch(&mut self) {
        self.cleared = true;
        self.queue.clear();
    }
}
