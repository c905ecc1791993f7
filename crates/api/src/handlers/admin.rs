use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    ApiState,
    middleware::{auth::verify_admin_password, error_handling::AppError},
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub valid: bool,
}

/// Tells the admin page whether a password would pass the gate.
pub async fn login(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let valid = verify_admin_password(&state, &payload.password)?;
    Ok(Json(LoginResponse { valid }))
}
