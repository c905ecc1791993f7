use axum::{
    Json,
    extract::{Path, State},
};
use clinicbook_core::{
    errors::BookingError,
    models::{
        SuccessResponse,
        schedule::{OperatingHours, UpsertOperatingHoursRequest, validate_weekday},
    },
};
use std::sync::Arc;
use tracing::info;

use crate::{
    ApiState,
    middleware::{auth::AdminAccess, error_handling::AppError},
};

pub async fn list_operating_hours(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<OperatingHours>>, AppError> {
    Ok(Json(state.store.list_operating_hours().await?))
}

/// Replaces the hours of one weekday.
pub async fn upsert_operating_hours(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<UpsertOperatingHoursRequest>,
) -> Result<Json<OperatingHours>, AppError> {
    let request = payload.validate()?;
    let hours = state.store.upsert_operating_hours(request).await?;

    info!(
        "Operating hours for weekday {} set to {} interval(s), active={}",
        hours.weekday,
        hours.time_intervals.len(),
        hours.is_active
    );
    Ok(Json(hours))
}

pub async fn delete_operating_hours(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
    Path(weekday): Path<u8>,
) -> Result<Json<SuccessResponse>, AppError> {
    let weekday = validate_weekday(weekday)?;
    if !state.store.delete_operating_hours(weekday).await? {
        return Err(BookingError::NotFound(format!("No operating hours stored for weekday {}", weekday)).into());
    }
    Ok(Json(SuccessResponse::ok()))
}
