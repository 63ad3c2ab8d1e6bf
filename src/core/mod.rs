pub mod attendance;
pub mod calculator;
pub mod config;
pub mod geofence;
pub mod log;
pub mod tasks;
pub mod watch;
