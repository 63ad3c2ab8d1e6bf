use serde::{Deserialize, Serialize};

/// WGS-84 position in decimal degrees.
///
/// Values come straight from the device sensor and are not range-checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// One sample delivered by a position source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionReading {
    pub coordinate: Coordinate,
    pub accuracy_meters: Option<f64>,
}

impl PositionReading {
    pub fn new(latitude: f64, longitude: f64, accuracy_meters: Option<f64>) -> Self {
        Self {
            coordinate: Coordinate::new(latitude, longitude),
            accuracy_meters,
        }
    }
}

/// A recognised work location, configured at deploy time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLocation {
    #[serde(flatten)]
    pub coordinate: Coordinate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Overrides the fence-wide allowed range for this reference only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_meters: Option<f64>,
}

impl ReferenceLocation {
    pub fn new(latitude: f64, longitude: f64, label: Option<&str>) -> Self {
        Self {
            coordinate: Coordinate::new(latitude, longitude),
            label: label.map(str::to_string),
            radius_meters: None,
        }
    }

    pub fn with_radius(mut self, radius_meters: f64) -> Self {
        self.radius_meters = Some(radius_meters);
        self
    }

    pub fn display_label(&self) -> String {
        self.label.clone().unwrap_or_else(|| {
            format!(
                "{:.6}, {:.6}",
                self.coordinate.latitude, self.coordinate.longitude
            )
        })
    }
}
