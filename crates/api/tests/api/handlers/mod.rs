mod admin_test;
mod announcements_test;
mod bookings_test;
mod middleware_test;
mod schedule_test;
mod slots_test;
