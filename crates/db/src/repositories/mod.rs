pub mod announcement;
pub mod blocked;
pub mod booking;
pub mod date_override;
pub mod schedule;
