//! Geofence evaluation: is a live position close enough to a work location?

use crate::errors::{AppError, AppResult};
use crate::models::coordinate::{Coordinate, PositionReading, ReferenceLocation};
use std::fmt;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance in meters (haversine formula). No rounding.
pub fn haversine_distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    // rounding can push h just past 1 near antipodes
    let h = ((d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2))
        .min(1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoFenceResult {
    pub is_in_range: bool,
    pub min_distance_meters: f64,
    pub accuracy_meters: Option<f64>,
}

/// Evaluate `current` against every reference.
///
/// A reference counts as a hit when its own distance is within its own
/// radius (`radius_meters` override, else `allowed_range_meters`), so the
/// nearest reference is not necessarily the one that lets the reading in.
pub fn evaluate(
    current: &PositionReading,
    references: &[ReferenceLocation],
    allowed_range_meters: f64,
) -> GeoFenceResult {
    let mut min_distance = f64::INFINITY;
    let mut in_range = false;

    for reference in references {
        let distance = haversine_distance(&current.coordinate, &reference.coordinate);
        let radius = reference.radius_meters.unwrap_or(allowed_range_meters);

        if distance <= radius {
            in_range = true;
        }
        min_distance = min_distance.min(distance);
    }

    GeoFenceResult {
        is_in_range: in_range,
        min_distance_meters: min_distance,
        accuracy_meters: current.accuracy_meters,
    }
}

/// A validated set of references plus the allowed range.
#[derive(Debug, Clone)]
pub struct GeoFence {
    references: Vec<ReferenceLocation>,
    allowed_range_meters: f64,
}

impl GeoFence {
    pub fn new(references: Vec<ReferenceLocation>, allowed_range_meters: f64) -> AppResult<Self> {
        if references.is_empty() {
            return Err(AppError::Config(
                "geofence needs at least one reference location".into(),
            ));
        }
        if !allowed_range_meters.is_finite() || allowed_range_meters <= 0.0 {
            return Err(AppError::Config(format!(
                "allowed range must be a positive number of meters, got {allowed_range_meters}"
            )));
        }
        if let Some(bad) = references
            .iter()
            .find(|r| r.radius_meters.is_some_and(|m| !m.is_finite() || m <= 0.0))
        {
            return Err(AppError::Config(format!(
                "reference '{}' has a non-positive radius",
                bad.display_label()
            )));
        }

        Ok(Self {
            references,
            allowed_range_meters,
        })
    }

    pub fn evaluate(&self, reading: &PositionReading) -> GeoFenceResult {
        evaluate(reading, &self.references, self.allowed_range_meters)
    }

    pub fn references(&self) -> &[ReferenceLocation] {
        &self.references
    }

    pub fn allowed_range_meters(&self) -> f64 {
        self.allowed_range_meters
    }
}

/// Failure to obtain a position at all. Reported by the position source,
/// never by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationError {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
}

impl LocationError {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "denied" | "permission_denied" | "permission-denied" => Some(Self::PermissionDenied),
            "unavailable" | "position_unavailable" | "position-unavailable" => {
                Some(Self::PositionUnavailable)
            }
            "timeout" => Some(Self::Timeout),
            _ => None,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            LocationError::PermissionDenied => {
                "Location permission denied. Please enable location permissions."
            }
            LocationError::PositionUnavailable => "Location information is unavailable.",
            LocationError::Timeout => "Timed out while acquiring the location.",
        }
    }
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// What the submission form shows: acquiring, unavailable, out of range, in range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationStatus {
    Acquiring,
    Unavailable(LocationError),
    OutOfRange(GeoFenceResult),
    InRange(GeoFenceResult),
}

impl LocationStatus {
    pub fn from_result(result: GeoFenceResult) -> Self {
        if result.is_in_range {
            Self::InRange(result)
        } else {
            Self::OutOfRange(result)
        }
    }

    pub fn can_submit(&self) -> bool {
        matches!(self, LocationStatus::InRange(_))
    }

    pub fn result(&self) -> Option<&GeoFenceResult> {
        match self {
            LocationStatus::InRange(r) | LocationStatus::OutOfRange(r) => Some(r),
            _ => None,
        }
    }

    /// Turns a non-submittable status into the error a submission would hit.
    pub fn require_in_range(&self, allowed_range_meters: f64) -> AppResult<GeoFenceResult> {
        match self {
            LocationStatus::InRange(r) => Ok(*r),
            LocationStatus::OutOfRange(r) => Err(AppError::OutOfRange {
                distance: r.min_distance_meters,
                allowed: allowed_range_meters,
            }),
            LocationStatus::Unavailable(e) => Err(AppError::LocationUnavailable(*e)),
            LocationStatus::Acquiring => {
                Err(AppError::LocationUnavailable(LocationError::PositionUnavailable))
            }
        }
    }

    pub fn describe(&self, allowed_range_meters: f64) -> String {
        match self {
            LocationStatus::Acquiring => "Acquiring location...".to_string(),
            LocationStatus::Unavailable(e) => e.message().to_string(),
            LocationStatus::InRange(r) => {
                format!("Valid location - Distance: {:.1}m", r.min_distance_meters)
            }
            LocationStatus::OutOfRange(r) => format!(
                "Outside the allowed range - Distance: {:.1}m (max {}m)",
                r.min_distance_meters, allowed_range_meters
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAT: f64 = 3.372007;
    const LON: f64 = -76.534116;

    /// Latitude offset (degrees) that moves a point `meters` north.
    fn north(meters: f64) -> f64 {
        (meters / EARTH_RADIUS_METERS).to_degrees()
    }

    fn reference() -> ReferenceLocation {
        ReferenceLocation::new(LAT, LON, Some("Main building"))
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_self() {
        let pairs = [
            ((LAT, LON), (3.375805, -76.532798)),
            ((0.0, 0.0), (0.0, 180.0)),
            ((45.0, 10.0), (-45.0, -170.0)),
            ((0.0, 179.5), (0.0, -179.5)),
            ((89.9, 0.0), (-89.9, 90.0)),
            ((-33.86, 151.21), (51.5, -0.12)),
        ];

        for ((lat1, lon1), (lat2, lon2)) in pairs {
            let a = Coordinate::new(lat1, lon1);
            let b = Coordinate::new(lat2, lon2);
            assert_eq!(haversine_distance(&a, &a), 0.0);
            assert_eq!(haversine_distance(&b, &b), 0.0);

            let ab = haversine_distance(&a, &b);
            let ba = haversine_distance(&b, &a);
            assert!((ab - ba).abs() < 1e-6, "{a:?} / {b:?}: {ab} vs {ba}");
        }

        // the two office buildings are roughly 450m apart
        let d = haversine_distance(&Coordinate::new(LAT, LON), &Coordinate::new(3.375805, -76.532798));
        assert!(d > 400.0 && d < 500.0, "unexpected distance {d}");
    }

    #[test]
    fn antipodes_and_the_antimeridian() {
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_METERS;
        let d = haversine_distance(&Coordinate::new(0.0, 0.0), &Coordinate::new(0.0, 180.0));
        assert!((d - half_circumference).abs() < 1e-3);

        let d = haversine_distance(&Coordinate::new(45.0, 10.0), &Coordinate::new(-45.0, -170.0));
        assert!((d - half_circumference).abs() < 1e-3);

        // one degree of longitude on the equator, measured across ±180°
        let one_degree = EARTH_RADIUS_METERS * 1f64.to_radians();
        let d = haversine_distance(&Coordinate::new(0.0, 179.5), &Coordinate::new(0.0, -179.5));
        assert!((d - one_degree).abs() < 1.0, "unexpected distance {d}");
    }

    #[test]
    fn same_position_is_in_range() {
        let r = evaluate(&PositionReading::new(LAT, LON, Some(5.0)), &[reference()], 300.0);
        assert!(r.is_in_range);
        assert!(r.min_distance_meters.abs() < 1e-6);
        assert_eq!(r.accuracy_meters, Some(5.0));
    }

    #[test]
    fn one_kilometer_away_is_out_of_range() {
        let reading = PositionReading::new(LAT + north(1000.0), LON, None);
        let r = evaluate(&reading, &[reference()], 300.0);
        assert!(!r.is_in_range);
        assert!((r.min_distance_meters - 1000.0).abs() < 0.5);
    }

    #[test]
    fn boundary_distance_is_inclusive() {
        let reading = PositionReading::new(LAT + north(299.0), LON, None);
        assert!(evaluate(&reading, &[reference()], 300.0).is_in_range);
    }

    #[test]
    fn any_reference_in_range_is_enough() {
        let far = ReferenceLocation::new(LAT + north(5000.0), LON, Some("far"));
        let reading = PositionReading::new(LAT + north(100.0), LON, None);
        let r = evaluate(&reading, &[far, reference()], 300.0);
        assert!(r.is_in_range);
        assert!((r.min_distance_meters - 100.0).abs() < 0.5);
    }

    #[test]
    fn per_reference_radius_is_checked_independently() {
        // the nearest reference is too strict, the wider one lets the reading in
        let strict = reference().with_radius(50.0);
        let wide = ReferenceLocation::new(LAT + north(400.0), LON, None).with_radius(500.0);
        let reading = PositionReading::new(LAT + north(100.0), LON, None);

        let r = evaluate(&reading, &[strict.clone(), wide], 300.0);
        assert!(r.is_in_range);
        assert!((r.min_distance_meters - 100.0).abs() < 0.5);

        assert!(!evaluate(&reading, &[strict], 300.0).is_in_range);
    }

    #[test]
    fn empty_reference_list_is_never_in_range() {
        let r = evaluate(&PositionReading::new(LAT, LON, None), &[], 300.0);
        assert!(!r.is_in_range);
        assert!(r.min_distance_meters.is_infinite());
    }

    #[test]
    fn fence_rejects_bad_configuration() {
        assert!(GeoFence::new(vec![], 300.0).is_err());
        assert!(GeoFence::new(vec![reference()], 0.0).is_err());
        assert!(GeoFence::new(vec![reference()], f64::NAN).is_err());
        assert!(GeoFence::new(vec![reference().with_radius(-1.0)], 300.0).is_err());
        assert!(GeoFence::new(vec![reference()], 300.0).is_ok());
    }

    #[test]
    fn status_text_and_gating() {
        let fence = GeoFence::new(vec![reference()], 300.0).unwrap();

        let inside = LocationStatus::from_result(fence.evaluate(&PositionReading::new(LAT, LON, None)));
        assert!(inside.can_submit());
        assert_eq!(inside.describe(300.0), "Valid location - Distance: 0.0m");

        let outside = LocationStatus::from_result(
            fence.evaluate(&PositionReading::new(LAT + north(1000.0), LON, None)),
        );
        assert!(!outside.can_submit());
        assert!(outside.describe(300.0).contains("(max 300m)"));
        assert!(matches!(
            outside.require_in_range(300.0),
            Err(AppError::OutOfRange { .. })
        ));

        let denied = LocationStatus::Unavailable(LocationError::PermissionDenied);
        assert!(!denied.can_submit());
        assert!(matches!(
            denied.require_in_range(300.0),
            Err(AppError::LocationUnavailable(LocationError::PermissionDenied))
        ));
        assert!(!LocationStatus::Acquiring.can_submit());
    }

    #[test]
    fn location_error_kinds_parse() {
        assert_eq!(LocationError::parse("denied"), Some(LocationError::PermissionDenied));
        assert_eq!(LocationError::parse("TIMEOUT"), Some(LocationError::Timeout));
        assert_eq!(
            LocationError::parse("unavailable"),
            Some(LocationError::PositionUnavailable)
        );
        assert_eq!(LocationError::parse("other"), None);
    }
}
