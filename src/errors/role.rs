use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use crate::errors::StoreError;
use crate::types::dto::common::ErrorResponse;

/// Role registry error types
#[derive(ApiResponse, Debug)]
pub enum RoleError {
    /// Unknown menu identifier or malformed batch entry
    #[oai(status = 400)]
    Validation(Json<ErrorResponse>),

    /// Missing or invalid access token
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Caller's role may not perform this action
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Referenced role does not exist
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl RoleError {
    pub fn validation(message: impl Into<String>) -> Self {
        RoleError::Validation(Json(ErrorResponse {
            error: "validation_error".to_string(),
            message: message.into(),
            status_code: 400,
        }))
    }

    pub fn unauthorized() -> Self {
        RoleError::Unauthorized(Json(ErrorResponse {
            error: "unauthorized".to_string(),
            message: "A valid access token is required".to_string(),
            status_code: 401,
        }))
    }

    pub fn forbidden() -> Self {
        RoleError::Forbidden(Json(ErrorResponse {
            error: "forbidden".to_string(),
            message: "This action requires a staff role".to_string(),
            status_code: 403,
        }))
    }

    pub fn not_found(role: &str) -> Self {
        RoleError::NotFound(Json(ErrorResponse {
            error: "not_found".to_string(),
            message: format!("Role not found: {}", role),
            status_code: 404,
        }))
    }

    pub fn internal_error() -> Self {
        RoleError::InternalError(Json(ErrorResponse {
            error: "internal_error".to_string(),
            message: "An internal error occurred".to_string(),
            status_code: 500,
        }))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            RoleError::Validation(json) => json.0.message.clone(),
            RoleError::Unauthorized(json) => json.0.message.clone(),
            RoleError::Forbidden(json) => json.0.message.clone(),
            RoleError::NotFound(json) => json.0.message.clone(),
            RoleError::InternalError(json) => json.0.message.clone(),
        }
    }
}

impl From<StoreError> for RoleError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity } => RoleError::not_found(entity),
            other => {
                tracing::error!(error = %other, "store error in role endpoint");
                RoleError::internal_error()
            }
        }
    }
}

impl fmt::Display for RoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
