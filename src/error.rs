//! Error types for the cache-aside API
//!
//! Provides unified error handling using thiserror.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

/// Message returned to callers for every 5xx response.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

// == Bridge Error Enum ==
/// Unified error type for the cache-aside API.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Missing or malformed input
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Record absent from the backing store
    #[error("Not found: {0}")]
    NotFound(String),

    /// Cache backend could not be reached or rejected a command
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    /// Backing store could not be reached or rejected a command
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BridgeError {
    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            BridgeError::Validation(_) => StatusCode::BAD_REQUEST,
            BridgeError::NotFound(_) => StatusCode::NOT_FOUND,
            BridgeError::CacheUnavailable(_)
            | BridgeError::StoreUnavailable(_)
            | BridgeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            BridgeError::Validation(msg) | BridgeError::NotFound(msg) => msg.clone(),
            _ => {
                // Backend detail stays in the logs.
                error!(error = %self, "request failed");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::Internal(format!("serialization failed: {}", err))
    }
}

// Every body rejection is a client error. A request with no JSON body reads
// as one with no fields.
impl From<JsonRejection> for BridgeError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                BridgeError::Validation("Name & email required".to_string())
            }
            other => BridgeError::Validation(format!("Invalid request body: {}", other.body_text())),
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache-aside API.
pub type Result<T> = std::result::Result<T, BridgeError>;
