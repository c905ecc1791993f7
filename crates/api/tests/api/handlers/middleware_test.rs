use axum::{http::StatusCode, response::IntoResponse};
use clinicbook_api::middleware::{
    auth::{hash_password, verify_password},
    error_handling::AppError,
};
use clinicbook_core::errors::BookingError;
use rstest::rstest;

#[rstest]
#[case(BookingError::NotFound("Booking not found".into()), StatusCode::NOT_FOUND)]
#[case(BookingError::Validation("date is required".into()), StatusCode::BAD_REQUEST)]
#[case(BookingError::Conflict("already booked".into()), StatusCode::CONFLICT)]
#[case(BookingError::Authentication("Invalid admin password".into()), StatusCode::UNAUTHORIZED)]
#[case(BookingError::Notification("smtp down".into()), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(BookingError::Database(eyre::eyre!("pool timed out")), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(
    BookingError::Internal(Box::new(std::io::Error::new(std::io::ErrorKind::Other, "Internal error"))),
    StatusCode::INTERNAL_SERVER_ERROR
)]
fn test_error_status_mapping(#[case] error: BookingError, #[case] expected: StatusCode) {
    let response = AppError(error).into_response();

    assert_eq!(response.status(), expected);
}

#[test]
fn test_hash_password() {
    let password = "test_password";
    let hashed = hash_password(password).unwrap();

    assert_ne!(hashed, password);
    assert!(hashed.starts_with("$argon2"));
}

#[test]
fn test_verify_password() {
    let hashed = hash_password("test_password").unwrap();

    assert!(verify_password(&hashed, "test_password").unwrap());
    assert!(!verify_password(&hashed, "wrong_password").unwrap());
    assert!(verify_password("not a phc string", "test_password").is_err());
}
