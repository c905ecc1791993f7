pub mod admin;
pub mod announcements;
pub mod bookings;
pub mod health;
pub mod schedule;
