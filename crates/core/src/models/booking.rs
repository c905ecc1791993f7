use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};
use crate::models::window::TimeWindow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub service: String,
    pub date: NaiveDate,
    pub time: TimeWindow,
    pub name: String,
    pub telephone: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A validated booking that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub service: String,
    pub date: NaiveDate,
    pub time: TimeWindow,
    pub name: String,
    pub telephone: String,
    pub email: String,
}

/// Raw booking form as posted by the public page.
///
/// Every field is optional on the wire so that a missing value is reported
/// as a validation failure rather than a body parsing error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingRequest {
    pub service: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub name: Option<String>,
    pub telephone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionResponse {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AdmissionResponse {
    pub fn accepted(booking_id: Uuid) -> Self {
        Self {
            accepted: true,
            booking_id: Some(booking_id),
            reason: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            accepted: false,
            booking_id: None,
            reason: Some(reason.into()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RescheduleRequest {
    pub date: Option<String>,
    pub time: Option<String>,
}

/// Result of moving a booking, as reported by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RescheduleOutcome {
    Rescheduled(Booking),
    NotFound,
    Conflict,
}

/// Inclusive date bounds for listing bookings. A missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookingRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl BookingRange {
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: Some(date),
            end: Some(date),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| start <= date) && self.end.is_none_or(|end| date <= end)
    }
}

/// `?date=` selects one day; `?startDate=&endDate=` a history range.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingListQuery {
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl BookingListQuery {
    pub fn range(&self) -> BookingResult<BookingRange> {
        if let Some(date) = self.date {
            if self.start_date.is_some() || self.end_date.is_some() {
                return Err(BookingError::Validation(
                    "date cannot be combined with startDate or endDate".to_string(),
                ));
            }
            return Ok(BookingRange::day(date));
        }

        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(BookingError::Validation(
                    "endDate must not be earlier than startDate".to_string(),
                ));
            }
        }

        Ok(BookingRange {
            start: self.start_date,
            end: self.end_date,
        })
    }
}

/// One row of the admin patient directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub name: String,
    pub telephone: String,
    pub email: String,
}

/// Collapses bookings into one patient per telephone number. Bookings are
/// read in the order given, so the earliest listed booking supplies the name
/// and email. Bookings without a telephone are skipped.
pub fn patient_directory(bookings: &[Booking]) -> Vec<Patient> {
    let mut seen = std::collections::HashSet::new();
    bookings
        .iter()
        .filter(|booking| {
            let telephone = booking.telephone.trim();
            !telephone.is_empty() && seen.insert(telephone.to_string())
        })
        .map(|booking| Patient {
            name: booking.name.clone(),
            telephone: booking.telephone.trim().to_string(),
            email: booking.email.clone(),
        })
        .collect()
}
