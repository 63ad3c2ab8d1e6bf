use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    #[value(alias = "in")]
    Entry,
    #[value(alias = "out")]
    Exit,
}

impl EventType {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            EventType::Entry => "entry",
            EventType::Exit => "exit",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "entry" => Some(EventType::Entry),
            "exit" => Some(EventType::Exit),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventType::Entry => "Entry",
            EventType::Exit => "Exit",
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self, EventType::Entry)
    }
}
