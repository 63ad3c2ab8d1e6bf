use crate::core::calculator::period::TimeFilter;
use crate::export::{ExportFormat, ExportKind};
use crate::models::event_type::EventType;
use crate::models::space::Space;
use crate::models::task::TaskStatus;
use clap::{Parser, Subcommand};

/// Command-line interface definition for bitacora
/// Team log: geofenced attendance, worked hours and tasks in SQLite
#[derive(Parser)]
#[command(
    name = "bitacora",
    version = env!("CARGO_PKG_VERSION"),
    about = "Team log: geofenced attendance check-ins, worked hours against targets, and tasks",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the effective configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Evaluate a position (or a recorded track) against the geofence
    Check {
        #[arg(long, allow_hyphen_values = true, required_unless_present = "replay")]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true, required_unless_present = "replay")]
        lon: Option<f64>,

        #[arg(long, help = "Reported accuracy in meters")]
        accuracy: Option<f64>,

        #[arg(long, value_enum, default_value = "office")]
        space: Space,

        #[arg(
            long,
            value_name = "FILE",
            conflicts_with_all = ["lat", "lon"],
            help = "Replay a track: one `lat,lon[,accuracy]` or `error,<kind>` per line"
        )]
        replay: Option<String>,
    },

    /// Record an entry or exit (only accepted inside the geofence)
    Attend {
        /// Full name, as it appears on the roster
        name: String,

        #[arg(long = "type", value_enum)]
        kind: EventType,

        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        #[arg(long)]
        accuracy: Option<f64>,

        #[arg(long, value_enum, default_value = "office")]
        space: Space,

        #[arg(long, help = "Event date (YYYY-MM-DD), default today")]
        date: Option<String>,

        #[arg(long, help = "Event time (HH:MM), default now")]
        time: Option<String>,
    },

    /// List attendance records, newest first
    List {
        #[arg(long)]
        person: Option<String>,

        #[arg(long, value_enum)]
        space: Option<Space>,

        #[arg(long, short, help = "Filter by year/month/day or a custom range")]
        period: Option<String>,
    },

    /// Weekly and monthly hours against the targets
    Stats {
        #[arg(long)]
        person: Option<String>,

        #[arg(long, value_enum)]
        space: Option<Space>,

        #[arg(long, help = "Reference date (YYYY-MM-DD), default today")]
        date: Option<String>,

        #[arg(long, help = "Weekly target in hours (overrides the configuration)")]
        target: Option<f64>,
    },

    /// Task log
    Task {
        #[command(subcommand)]
        action: TaskCommands,
    },

    /// Export attendance, hour summaries or tasks
    Export {
        #[arg(long, value_enum, default_value = "attendance")]
        kind: ExportKind,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "PERIOD",
            help = "Filter export by year/month/day or a custom range"
        )]
        period: Option<String>,

        #[arg(long, value_enum)]
        space: Option<Space>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Log a new task
    Add {
        title: String,

        #[arg(long)]
        responsible: String,

        #[arg(long, help = "Category code (see `task categories`)")]
        category: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, help = "Event date (YYYY-MM-DD), default today")]
        date: Option<String>,

        #[arg(long, help = "Due date (YYYY-MM-DD), default event date + 7 days")]
        due: Option<String>,
    },

    /// List tasks
    List {
        #[arg(long)]
        responsible: Option<String>,

        #[arg(long, value_enum)]
        status: Option<TaskStatus>,

        #[arg(long, help = "Only pending tasks past their due date")]
        overdue: bool,

        #[arg(long = "when", value_enum, default_value = "all")]
        when: TimeFilter,
    },

    /// Mark a task as completed
    Done { id: i64 },

    /// Mark a task as pending again
    Undo { id: i64 },

    /// Flip the completion flag of a task
    Toggle { id: i64 },

    /// Change fields of a task
    Edit {
        id: i64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        responsible: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        due: Option<String>,
    },

    /// Totals per responsible and per category
    Stats {
        #[arg(long = "when", value_enum, default_value = "all")]
        when: TimeFilter,
    },

    /// Category labels in use and configured
    Categories,
}
