use axum::{
    Json,
    extract::{Query, State},
};
use clinicbook_core::models::schedule::{ReplaceWeekdaySlotsRequest, WeekdaySlot, validate_weekday};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    ApiState,
    middleware::{auth::AdminAccess, error_handling::AppError},
};

#[derive(Debug, Deserialize)]
pub struct WeekdayQuery {
    pub weekday: Option<u8>,
}

/// Legacy per-weekday slot list, used for weekdays without operating hours.
pub async fn list_weekday_slots(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
    Query(query): Query<WeekdayQuery>,
) -> Result<Json<Vec<WeekdaySlot>>, AppError> {
    let weekday = query.weekday.map(validate_weekday).transpose()?;
    Ok(Json(state.store.list_weekday_slots(weekday).await?))
}

pub async fn replace_weekday_slots(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<ReplaceWeekdaySlotsRequest>,
) -> Result<Json<Vec<WeekdaySlot>>, AppError> {
    let (weekday, times) = payload.validate()?;
    Ok(Json(state.store.replace_weekday_slots(weekday, times).await?))
}
