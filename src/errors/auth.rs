use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use crate::errors::StoreError;
use crate::types::dto::common::ErrorResponse;

/// Authentication and password-reset error types
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Invalid email or password
    #[oai(status = 401)]
    InvalidCredentials(Json<ErrorResponse>),

    /// Invalid or malformed JWT
    #[oai(status = 401)]
    InvalidToken(Json<ErrorResponse>),

    /// JWT has expired
    #[oai(status = 401)]
    ExpiredToken(Json<ErrorResponse>),

    /// Reset token is invalid, expired or already used. One generic variant
    /// on purpose: the response never distinguishes the three cases.
    #[oai(status = 400)]
    InvalidResetToken(Json<ErrorResponse>),

    /// New password fails the minimum strength policy
    #[oai(status = 400)]
    WeakPassword(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl AuthError {
    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials(Json(ErrorResponse {
            error: "invalid_credentials".to_string(),
            message: "Invalid email or password".to_string(),
            status_code: 401,
        }))
    }

    pub fn invalid_token() -> Self {
        AuthError::InvalidToken(Json(ErrorResponse {
            error: "invalid_token".to_string(),
            message: "Invalid or malformed JWT".to_string(),
            status_code: 401,
        }))
    }

    pub fn expired_token() -> Self {
        AuthError::ExpiredToken(Json(ErrorResponse {
            error: "expired_token".to_string(),
            message: "JWT has expired".to_string(),
            status_code: 401,
        }))
    }

    pub fn invalid_reset_token() -> Self {
        AuthError::InvalidResetToken(Json(ErrorResponse {
            error: "invalid_reset_token".to_string(),
            message: "Reset link is invalid or has expired".to_string(),
            status_code: 400,
        }))
    }

    pub fn weak_password(min_length: usize) -> Self {
        AuthError::WeakPassword(Json(ErrorResponse {
            error: "weak_password".to_string(),
            message: format!("Password must be at least {} characters", min_length),
            status_code: 400,
        }))
    }

    pub fn internal_error() -> Self {
        AuthError::InternalError(Json(ErrorResponse {
            error: "internal_error".to_string(),
            message: "An internal error occurred".to_string(),
            status_code: 500,
        }))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            AuthError::InvalidCredentials(json) => json.0.message.clone(),
            AuthError::InvalidToken(json) => json.0.message.clone(),
            AuthError::ExpiredToken(json) => json.0.message.clone(),
            AuthError::InvalidResetToken(json) => json.0.message.clone(),
            AuthError::WeakPassword(json) => json.0.message.clone(),
            AuthError::InternalError(json) => json.0.message.clone(),
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => AuthError::invalid_credentials(),
            other => {
                tracing::error!(error = %other, "store error in auth endpoint");
                AuthError::internal_error()
            }
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
