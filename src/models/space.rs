use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Physical space a record belongs to. Partitions both the roster and the
/// reference locations used by the geofence.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Space {
    #[default]
    Office,
    Auditorium,
}

impl Space {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Space::Office => "office",
            Space::Auditorium => "auditorium",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "office" => Some(Space::Office),
            "auditorium" => Some(Space::Auditorium),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Space::Office => "Office",
            Space::Auditorium => "Auditorium",
        }
    }
}
