//! # Error Handling Middleware
//!
//! Maps [`BookingError`] values to HTTP status codes and `{"error": ...}`
//! JSON bodies. Storage and internal failures are logged here and answered
//! with a generic message so that no backend detail reaches the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use clinicbook_core::errors::BookingError;
use serde_json::json;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use clinicbook_api::middleware::error_handling::AppError;
/// use clinicbook_core::errors::BookingError;
///
/// async fn handler(weekday: u8) -> Result<Json<u8>, AppError> {
///     if weekday > 6 {
///         return Err(AppError(BookingError::Validation("weekday out of range".into())));
///     }
///     Ok(Json(weekday))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub BookingError);

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        status_for(&self.0)
    }
}

pub fn status_for(err: &BookingError) -> StatusCode {
    match err {
        BookingError::NotFound(_) => StatusCode::NOT_FOUND,
        BookingError::Validation(_) => StatusCode::BAD_REQUEST,
        BookingError::Conflict(_) => StatusCode::CONFLICT,
        BookingError::Authentication(_) => StatusCode::UNAUTHORIZED,
        BookingError::Notification(_) => StatusCode::INTERNAL_SERVER_ERROR,
        BookingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        BookingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Logs server-side failures and returns the message that is safe to show.
pub fn client_message(err: &BookingError) -> String {
    if status_for(err).is_server_error() {
        error!("Request failed: {:?}", err);
    }
    err.public_message()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": client_message(&self.0) }));

        (status, body).into_response()
    }
}

/// Allows `?` on `BookingResult` inside handlers.
impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

/// Store failures surface as `eyre::Report` and are treated as database errors.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookingError::Database(err))
    }
}
