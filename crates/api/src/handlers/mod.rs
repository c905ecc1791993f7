pub mod admin;
pub mod announcements;
pub mod bookings;
pub mod calendar;
pub mod operating_hours;
pub mod settings;
pub mod slots;
pub mod templates;
