//! # Calendar Exception Handlers
//!
//! Whole-day blocks, partial-day blocked intervals and per-date slot
//! overrides. All of them are admin only.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use clinicbook_core::{
    errors::BookingError,
    models::{
        SuccessResponse,
        calendar::{
            BlockDateRequest, BlockedDate, BlockedInterval, CreateBlockedIntervalRequest, DateOverride, DateQuery,
            ReplaceDateOverridesRequest,
        },
    },
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{auth::AdminAccess, error_handling::AppError},
};

fn required_date(date: Option<NaiveDate>) -> Result<NaiveDate, AppError> {
    date.ok_or_else(|| BookingError::Validation("date is required".to_string()).into())
}

// Blocked dates

/// With `?all=true` lists every blocked date, otherwise only the one in `?date=`.
pub async fn list_blocked_dates(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<BlockedDate>>, AppError> {
    let blocked = state.store.list_blocked_dates().await?;
    if query.all {
        return Ok(Json(blocked));
    }

    let date = required_date(query.date)?;
    Ok(Json(blocked.into_iter().filter(|b| b.date == date).collect()))
}

pub async fn block_date(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<BlockDateRequest>,
) -> Result<Json<BlockedDate>, AppError> {
    let date = required_date(payload.date)?;
    let blocked = state
        .store
        .block_date(date)
        .await?
        .ok_or_else(|| BookingError::Conflict(format!("{} is already blocked", date)))?;

    info!("Blocked {}", date);
    Ok(Json(blocked))
}

pub async fn unblock_date(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<SuccessResponse>, AppError> {
    let date = required_date(query.date)?;
    if !state.store.unblock_date(date).await? {
        return Err(BookingError::NotFound(format!("{} was not blocked", date)).into());
    }

    info!("Unblocked {}", date);
    Ok(Json(SuccessResponse::ok()))
}

// Blocked intervals

pub async fn list_blocked_intervals(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<BlockedInterval>>, AppError> {
    Ok(Json(state.store.list_blocked_intervals(query.date).await?))
}

pub async fn create_blocked_interval(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateBlockedIntervalRequest>,
) -> Result<Json<BlockedInterval>, AppError> {
    let interval = payload.validate()?;
    let (date, start, end) = (interval.date, interval.start_time, interval.end_time);

    let created = state.store.create_blocked_interval(interval).await?.ok_or_else(|| {
        BookingError::Conflict(format!(
            "{}-{} overlaps an existing blocked interval on {}",
            start.format("%H:%M"),
            end.format("%H:%M"),
            date
        ))
    })?;

    info!(interval_id = %created.id, "Blocked {} {}-{}", date, start.format("%H:%M"), end.format("%H:%M"));
    Ok(Json(created))
}

pub async fn delete_blocked_interval(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.store.delete_blocked_interval(id).await? {
        return Err(BookingError::NotFound(format!("Blocked interval with ID {} not found", id)).into());
    }
    Ok(Json(SuccessResponse::ok()))
}

// Date overrides

pub async fn list_date_overrides(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<DateOverride>>, AppError> {
    Ok(Json(state.store.list_date_overrides(query.date).await?))
}

/// Replaces every override of the posted date with the posted set.
pub async fn replace_date_overrides(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<ReplaceDateOverridesRequest>,
) -> Result<Json<Vec<DateOverride>>, AppError> {
    let (date, overrides) = payload.validate()?;
    let stored = state.store.replace_date_overrides(date, overrides).await?;

    info!("Stored {} override(s) for {}", stored.len(), date);
    Ok(Json(stored))
}
