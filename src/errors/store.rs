use thiserror::Error;

/// Internal error type for store and service operations.
///
/// Not exposed via API - endpoints convert to the per-module ApiResponse
/// enums and log the detail server-side only.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {operation} failed: {source}")]
    Database {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("crypto error: {operation} failed: {message}")]
    Crypto { operation: String, message: String },
}

impl StoreError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> Self {
        StoreError::Database {
            operation: operation.to_string(),
            source,
        }
    }

    pub fn not_found(entity: &'static str) -> Self {
        StoreError::NotFound { entity }
    }

    pub fn crypto(operation: &str, message: impl Into<String>) -> Self {
        StoreError::Crypto {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}
