//! Error types for the blob cache server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache, the storage facade and the HTTP layer.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Startup configuration is unusable (e.g. zero cache capacity)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Blob not found in the store
    #[error("Blob not found: {0}")]
    NotFound(String),

    /// Invalid request data (bad key, bad query)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Uploaded blob exceeds the configured maximum size
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Backing store I/O failure
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            CacheError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the blob cache server.
pub type Result<T> = std::result::Result<T, CacheError>;
