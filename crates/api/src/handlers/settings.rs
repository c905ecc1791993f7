use axum::{Json, extract::State};
use clinicbook_core::models::schedule::{GlobalSettings, UpdateGlobalSettingsRequest};
use std::sync::Arc;
use tracing::info;

use crate::{
    ApiState,
    middleware::{auth::AdminAccess, error_handling::AppError},
};

pub async fn get_global_settings(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
) -> Result<Json<GlobalSettings>, AppError> {
    Ok(Json(state.store.global_settings().await?))
}

pub async fn update_global_settings(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<UpdateGlobalSettingsRequest>,
) -> Result<Json<GlobalSettings>, AppError> {
    let settings = payload.validate()?;
    let stored = state.store.update_global_settings(settings).await?;

    info!("Booking duration set to {} minutes", stored.booking_duration_minutes);
    Ok(Json(stored))
}
