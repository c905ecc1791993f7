//! # Authentication Module
//!
//! The admin surface is guarded by a single shared password. Its argon2 hash
//! is configured through `ADMIN_PASSWORD_HASH`; requests present the clear
//! password in the [`ADMIN_PASSWORD_HEADER`] header.
//!
//! Handlers opt into the gate by taking an [`AdminAccess`] argument.

use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{self, SaltString, rand_core::OsRng},
};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use clinicbook_core::errors::BookingError;
use eyre::{Result, eyre};
use tracing::warn;

use crate::{ApiState, middleware::error_handling::AppError};

pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// Hashes a password using the Argon2 algorithm
///
/// Produces a PHC string (algorithm, parameters, salt and hash) suitable for
/// `ADMIN_PASSWORD_HASH`.
///
/// # Example
///
/// ```rust
/// use clinicbook_api::middleware::auth::hash_password;
///
/// let hashed = hash_password("front-desk").unwrap();
/// assert!(hashed.starts_with("$argon2"));
/// ```
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Checks `password` against a stored PHC hash.
///
/// A wrong password is `Ok(false)`; a hash that cannot be parsed is an error.
pub fn verify_password(hash: &str, password: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| eyre!("Stored admin password hash is invalid: {}", e))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(eyre!("Error verifying password: {}", e)),
    }
}

/// Verifies a candidate password against the configured admin hash.
///
/// With no hash configured every password is accepted.
pub fn verify_admin_password(state: &ApiState, password: &str) -> Result<bool> {
    match state.admin_password_hash.as_deref() {
        Some(hash) => verify_password(hash, password),
        None => Ok(true),
    }
}

/// Proof that the request passed the admin gate.
#[derive(Debug, Clone, Copy)]
pub struct AdminAccess;

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for AdminAccess {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<ApiState>) -> Result<Self, Self::Rejection> {
        if state.admin_password_hash.is_none() {
            return Ok(AdminAccess);
        }

        let password = parts
            .headers
            .get(ADMIN_PASSWORD_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| BookingError::Authentication("Admin password required".to_string()))?;

        if verify_admin_password(state, password)? {
            Ok(AdminAccess)
        } else {
            warn!("Rejected admin request to {}", parts.uri.path());
            Err(AppError(BookingError::Authentication("Invalid admin password".to_string())))
        }
    }
}
