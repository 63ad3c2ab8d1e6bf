pub mod attendance;
pub mod coordinate;
pub mod event_type;
pub mod space;
pub mod summary;
pub mod task;
