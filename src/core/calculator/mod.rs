pub mod hours;
pub mod period;
pub mod summary;
