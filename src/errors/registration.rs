use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use crate::errors::StoreError;
use crate::types::dto::common::ErrorResponse;

/// Registration intake and promotion error types
#[derive(ApiResponse, Debug)]
pub enum RegistrationError {
    /// Missing or malformed request fields
    #[oai(status = 400)]
    Validation(Json<ErrorResponse>),

    /// Registration is not in a state that allows this transition
    #[oai(status = 400)]
    InvalidState(Json<ErrorResponse>),

    /// Missing or invalid access token
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Caller's role may not perform this action
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Referenced registration does not exist
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl RegistrationError {
    pub fn validation(message: impl Into<String>) -> Self {
        RegistrationError::Validation(Json(ErrorResponse {
            error: "validation_error".to_string(),
            message: message.into(),
            status_code: 400,
        }))
    }

    pub fn invalid_state() -> Self {
        RegistrationError::InvalidState(Json(ErrorResponse {
            error: "invalid_state".to_string(),
            message: "Registration has already been reviewed".to_string(),
            status_code: 400,
        }))
    }

    pub fn unauthorized() -> Self {
        RegistrationError::Unauthorized(Json(ErrorResponse {
            error: "unauthorized".to_string(),
            message: "A valid access token is required".to_string(),
            status_code: 401,
        }))
    }

    pub fn forbidden() -> Self {
        RegistrationError::Forbidden(Json(ErrorResponse {
            error: "forbidden".to_string(),
            message: "This action requires a staff role".to_string(),
            status_code: 403,
        }))
    }

    pub fn not_found() -> Self {
        RegistrationError::NotFound(Json(ErrorResponse {
            error: "not_found".to_string(),
            message: "Registration not found".to_string(),
            status_code: 404,
        }))
    }

    pub fn internal_error() -> Self {
        RegistrationError::InternalError(Json(ErrorResponse {
            error: "internal_error".to_string(),
            message: "An internal error occurred".to_string(),
            status_code: 500,
        }))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            RegistrationError::Validation(json) => json.0.message.clone(),
            RegistrationError::InvalidState(json) => json.0.message.clone(),
            RegistrationError::Unauthorized(json) => json.0.message.clone(),
            RegistrationError::Forbidden(json) => json.0.message.clone(),
            RegistrationError::NotFound(json) => json.0.message.clone(),
            RegistrationError::InternalError(json) => json.0.message.clone(),
        }
    }
}

impl From<StoreError> for RegistrationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => RegistrationError::not_found(),
            other => {
                tracing::error!(error = %other, "store error in registration endpoint");
                RegistrationError::internal_error()
            }
        }
    }
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
