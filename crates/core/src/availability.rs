//! # Availability Resolution
//!
//! Computes the bookable windows of one calendar day. Everything the
//! resolver needs is loaded up front into a [`DaySnapshot`]; resolution itself
//! is a fixed sequence of pure stages over the candidate list:
//!
//! 1. blocked day: a blocked date short-circuits to an empty day
//! 2. template: operating hours for the weekday, else the legacy slot list
//! 3. overrides: available overrides replace the template, unavailable ones
//!    remove the slot they name
//! 4. blocked intervals: windows overlapping a partial-day block are dropped
//! 5. past: on the current day, windows that already started are dropped
//! 6. bookings: windows holding an existing booking are dropped
//!
//! Later stages only ever remove windows, so the precedence of a stage is its
//! position in the list. Missing inputs (no operating hours, no overrides, no
//! intervals) never restrict the day.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::models::{
    booking::Booking,
    calendar::{BlockedInterval, DateOverride},
    schedule::{GlobalSettings, OperatingHours, WeekdaySlot},
    window::{TimeWindow, minute_of_day},
};

/// Everything known about one date at the moment of the request.
#[derive(Debug, Clone, Default)]
pub struct DaySnapshot {
    pub date: NaiveDate,
    pub service: Option<String>,
    pub blocked: bool,
    pub operating_hours: Option<OperatingHours>,
    pub settings: GlobalSettings,
    pub weekday_slots: Vec<WeekdaySlot>,
    pub overrides: Vec<DateOverride>,
    pub blocked_intervals: Vec<BlockedInterval>,
    pub bookings: Vec<Booking>,
}

/// Sunday = 0 through Saturday = 6.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Runs the whole pipeline for `snapshot` as seen from the clinic wall clock `now`.
pub fn resolve(snapshot: &DaySnapshot, now: NaiveDateTime) -> Vec<TimeWindow> {
    if snapshot.blocked {
        return Vec::new();
    }

    let date = snapshot.date;
    let duration = snapshot.settings.booking_duration_minutes;
    let service = snapshot.service.as_deref();

    let candidates = template_windows(
        snapshot.operating_hours.as_ref(),
        &snapshot.weekday_slots,
        weekday_index(date),
        duration,
    );
    let candidates = apply_overrides(candidates, &snapshot.overrides, date, service);
    let candidates = remove_blocked_intervals(candidates, &snapshot.blocked_intervals, date, duration);
    let candidates = remove_past(candidates, date, now);
    let mut windows = remove_booked(candidates, &snapshot.bookings, date, duration);

    windows.sort();
    windows.dedup();
    windows
}

/// Stage 2. Operating hours win over the legacy list when they exist for the
/// weekday, are active and have at least one interval. Legacy slots are taken
/// verbatim, whatever the booking duration.
pub fn template_windows(
    hours: Option<&OperatingHours>,
    legacy: &[WeekdaySlot],
    weekday: u8,
    duration: u32,
) -> Vec<TimeWindow> {
    match hours.filter(|h| h.weekday == weekday && h.is_open()) {
        Some(hours) => {
            let mut windows: Vec<TimeWindow> = hours
                .time_intervals
                .iter()
                .flat_map(|interval| interval.windows(duration))
                .collect();
            windows.sort();
            windows
        }
        None => legacy
            .iter()
            .filter(|slot| slot.weekday == weekday)
            .map(|slot| slot.time)
            .collect(),
    }
}

/// Stage 3. One available override for the date turns the override set into
/// the authoritative list of the day. Unavailable overrides then remove any
/// window starting at the time they name.
pub fn apply_overrides(
    candidates: Vec<TimeWindow>,
    overrides: &[DateOverride],
    date: NaiveDate,
    service: Option<&str>,
) -> Vec<TimeWindow> {
    let relevant: Vec<&DateOverride> = overrides
        .iter()
        .filter(|o| o.date == date && o.applies_to(service))
        .collect();

    let available: Vec<TimeWindow> = relevant.iter().filter(|o| o.available).map(|o| o.time).collect();
    let suppressed: Vec<u32> = relevant
        .iter()
        .filter(|o| !o.available)
        .map(|o| o.time.start_minute())
        .collect();

    let base = if available.is_empty() { candidates } else { available };
    base.into_iter()
        .filter(|window| !suppressed.contains(&window.start_minute()))
        .collect()
}

/// Stage 4. Overlap is strict on both ends: a window ending exactly when a
/// block starts survives.
pub fn remove_blocked_intervals(
    candidates: Vec<TimeWindow>,
    intervals: &[BlockedInterval],
    date: NaiveDate,
    duration: u32,
) -> Vec<TimeWindow> {
    let blocks: Vec<(u32, u32)> = intervals
        .iter()
        .filter(|interval| interval.date == date)
        .map(BlockedInterval::minutes)
        .collect();

    candidates
        .into_iter()
        .filter(|window| !blocks.iter().any(|&(start, end)| window.overlaps(start, end, duration)))
        .collect()
}

/// Stage 5. Only applies when `date` is today; minute resolution, so a window
/// starting at the current minute is already gone.
pub fn remove_past(candidates: Vec<TimeWindow>, date: NaiveDate, now: NaiveDateTime) -> Vec<TimeWindow> {
    if now.date() != date {
        return candidates;
    }
    let cutoff = minute_of_day(now.time());
    candidates
        .into_iter()
        .filter(|window| window.start_minute() > cutoff)
        .collect()
}

/// Stage 6. A window is taken when any booking of the date starts inside
/// `[start, end)`. Bookings of every service count.
pub fn remove_booked(
    candidates: Vec<TimeWindow>,
    bookings: &[Booking],
    date: NaiveDate,
    duration: u32,
) -> Vec<TimeWindow> {
    let starts: Vec<u32> = bookings
        .iter()
        .filter(|booking| booking.date == date)
        .map(|booking| booking.time.start_minute())
        .collect();

    candidates
        .into_iter()
        .filter(|window| !starts.iter().any(|&start| window.contains_minute(start, duration)))
        .collect()
}
