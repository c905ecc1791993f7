//! # Booking Handlers
//!
//! Admission is the only public write of the service. It answers with an
//! [`AdmissionResponse`] whatever the outcome, so the booking page can show
//! the `reason` of a refusal directly:
//!
//! 1. the form is validated (400)
//! 2. the store inserts the booking and closes the slot in one step; a taken
//!    (date, time, service) triple comes back as a conflict (409)
//! 3. a confirmation goes to the booker and the operator, best effort
//!
//! The remaining handlers are the admin side: listing bookings by day or
//! range, the patient directory, cancelling and moving bookings.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use clinicbook_core::{
    admission::{confirmation_recipients, validate_booking, validate_reschedule},
    errors::{BookingError, BookingResult},
    models::{
        SuccessResponse,
        booking::{
            AdmissionResponse, Booking, BookingListQuery, BookingRange, BookingRequest, Patient, RescheduleOutcome,
            RescheduleRequest, patient_directory,
        },
    },
};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{
        auth::AdminAccess,
        error_handling::{AppError, client_message, status_for},
    },
};

pub async fn admit_booking(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(AdmissionResponse::rejected(rejection.body_text())),
            )
                .into_response();
        }
    };

    match admit(&state, request).await {
        Ok(booking) => (StatusCode::CREATED, Json(AdmissionResponse::accepted(booking.id))).into_response(),
        Err(err) => (status_for(&err), Json(AdmissionResponse::rejected(client_message(&err)))).into_response(),
    }
}

async fn admit(state: &ApiState, request: BookingRequest) -> BookingResult<Booking> {
    let booking = validate_booking(request)?;
    let (date, time, service) = (booking.date, booking.time, booking.service.clone());

    let created = state.store.create_booking(booking).await?.ok_or_else(|| {
        BookingError::Conflict(format!("{} on {} is already booked for {}", time, date, service))
    })?;

    info!(
        booking_id = %created.id,
        "Booked {} {} for {}",
        created.date,
        created.time,
        created.service
    );

    let recipients = confirmation_recipients(&created, state.operator_email.as_deref());
    if let Err(err) = state.notifier.booking_confirmed(&created, &recipients).await {
        warn!(booking_id = %created.id, "Booking confirmation was not delivered: {}", err);
    }

    Ok(created)
}

pub async fn list_bookings(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = state.store.list_bookings(query.range()?).await?;
    Ok(Json(bookings))
}

/// Everyone who ever booked, one entry per telephone number.
pub async fn list_patients(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Patient>>, AppError> {
    let bookings = state.store.list_bookings(BookingRange::default()).await?;
    Ok(Json(patient_directory(&bookings)))
}

/// Deletes the booking and re-opens its slot.
pub async fn cancel_booking(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, AppError> {
    let cancelled = state
        .store
        .cancel_booking(id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Booking with ID {} not found", id)))?;

    info!(booking_id = %id, "Cancelled booking of {} {}", cancelled.date, cancelled.time);
    Ok(Json(SuccessResponse::ok()))
}

/// Moves a booking to another date and time. The target is not checked
/// against the published schedule, only against other bookings.
pub async fn reschedule_booking(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RescheduleRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let (date, time) = validate_reschedule(payload)?;

    match state.store.reschedule_booking(id, date, time).await? {
        RescheduleOutcome::Rescheduled(booking) => {
            info!(booking_id = %id, "Rescheduled booking to {} {}", booking.date, booking.time);
            Ok(Json(SuccessResponse::ok()))
        }
        RescheduleOutcome::NotFound => Err(BookingError::NotFound(format!("Booking with ID {} not found", id)).into()),
        RescheduleOutcome::Conflict => {
            Err(BookingError::Conflict(format!("{} on {} is already booked", time, date)).into())
        }
    }
}
