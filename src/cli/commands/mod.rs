pub mod attend;
pub mod check;
pub mod config;
pub mod export;
pub mod init;
pub mod list;
pub mod log;
pub mod stats;
pub mod task;
