use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl BookingError {
    /// Message that is safe to show to a patient or an operator.
    ///
    /// Storage and internal failures collapse to a generic sentence so that
    /// query text and connection details never leave the process.
    pub fn public_message(&self) -> String {
        match self {
            BookingError::NotFound(msg)
            | BookingError::Validation(msg)
            | BookingError::Conflict(msg)
            | BookingError::Authentication(msg)
            | BookingError::Notification(msg) => msg.clone(),
            BookingError::Database(_) => "The booking service is temporarily unavailable".to_string(),
            BookingError::Internal(_) => "Unexpected server error".to_string(),
        }
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
