use axum::{
    Json,
    extract::{Query, State},
};
use clinicbook_core::{admission::parse_date, availability::resolve, errors::BookingError};
use clinicbook_db::load_day;
use serde::Deserialize;
use std::sync::Arc;

use crate::{ApiState, middleware::error_handling::AppError};

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: Option<String>,
    pub service: Option<String>,
}

/// Bookable windows of one date, as `HH:MM-HH:MM` labels sorted by start.
pub async fn list_slots(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<Vec<String>>, AppError> {
    let raw_date = query
        .date
        .ok_or_else(|| BookingError::Validation("date is required".to_string()))?;
    let date = parse_date(&raw_date)?;
    let service = query.service.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

    let day = load_day(state.store.as_ref(), date, service).await?;
    let windows = resolve(&day, state.clinic_now());

    Ok(Json(windows.iter().map(ToString::to_string).collect()))
}
