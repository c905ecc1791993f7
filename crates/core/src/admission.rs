//! Booking admission rules that do not need the store.
//!
//! The HTTP layer runs [`validate_booking`] before it asks the store to
//! insert anything; exclusivity itself is decided by the store, which owns
//! the uniqueness constraint on `(date, time, service)`.

use chrono::NaiveDate;

use crate::errors::{BookingError, BookingResult};
use crate::models::booking::{Booking, BookingRequest, NewBooking, RescheduleRequest};
use crate::models::window::TimeWindow;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(raw: &str) -> BookingResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| BookingError::Validation(format!("date must be written as YYYY-MM-DD, got '{}'", raw)))
}

fn required(value: Option<String>, field: &'static str, missing: &mut Vec<&'static str>) -> String {
    let value = value.map(|v| v.trim().to_string()).unwrap_or_default();
    if value.is_empty() {
        missing.push(field);
    }
    value
}

/// Checks that every field of the booking form is present and well formed,
/// and normalises the time into its canonical `HH:MM-HH:MM` label.
pub fn validate_booking(request: BookingRequest) -> BookingResult<NewBooking> {
    let mut missing = Vec::new();
    let service = required(request.service, "service", &mut missing);
    let date = required(request.date, "date", &mut missing);
    let time = required(request.time, "time", &mut missing);
    let name = required(request.name, "name", &mut missing);
    let telephone = required(request.telephone, "telephone", &mut missing);
    let email = required(request.email, "email", &mut missing);

    if !missing.is_empty() {
        return Err(BookingError::Validation(format!(
            "All fields are required (missing: {})",
            missing.join(", ")
        )));
    }

    let date = parse_date(&date)?;
    let time = time.parse::<TimeWindow>()?;

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
        _ => {
            return Err(BookingError::Validation(format!(
                "'{}' is not a valid email address",
                email
            )));
        }
    }

    Ok(NewBooking {
        service,
        date,
        time,
        name,
        telephone,
        email,
    })
}

pub fn validate_reschedule(request: RescheduleRequest) -> BookingResult<(NaiveDate, TimeWindow)> {
    let mut missing = Vec::new();
    let date = required(request.date, "date", &mut missing);
    let time = required(request.time, "time", &mut missing);
    if !missing.is_empty() {
        return Err(BookingError::Validation(format!(
            "date and time are required (missing: {})",
            missing.join(", ")
        )));
    }
    Ok((parse_date(&date)?, time.parse::<TimeWindow>()?))
}

/// Booker first, then the operator address when one is configured and differs.
pub fn confirmation_recipients(booking: &Booking, operator: Option<&str>) -> Vec<String> {
    let mut recipients = vec![booking.email.clone()];
    if let Some(operator) = operator.map(str::trim).filter(|o| !o.is_empty()) {
        if !operator.eq_ignore_ascii_case(&booking.email) {
            recipients.push(operator.to_string());
        }
    }
    recipients
}
