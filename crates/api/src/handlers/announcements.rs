use axum::{Json, extract::State};
use clinicbook_core::models::announcement::{Announcement, PostAnnouncementRequest};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::{
    ApiState,
    middleware::{auth::AdminAccess, error_handling::AppError},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeactivatedResponse {
    pub success: bool,
    pub deactivated_count: u64,
}

/// The live announcement, or `null` when there is none.
pub async fn get_active_announcement(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Option<Announcement>>, AppError> {
    Ok(Json(state.store.active_announcement().await?))
}

pub async fn post_announcement(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<PostAnnouncementRequest>,
) -> Result<Json<Announcement>, AppError> {
    let announcement = payload.validate()?;
    let created = state.store.post_announcement(announcement).await?;

    info!(announcement_id = %created.id, "Published {} announcement", created.kind.as_str());
    Ok(Json(created))
}

pub async fn deactivate_announcements(
    _admin: AdminAccess,
    State(state): State<Arc<ApiState>>,
) -> Result<Json<DeactivatedResponse>, AppError> {
    let deactivated_count = state.store.deactivate_announcements().await?;
    Ok(Json(DeactivatedResponse {
        success: true,
        deactivated_count,
    }))
}
