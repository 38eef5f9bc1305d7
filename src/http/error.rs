//! HTTP error handling and response types.
//!
//! This is the single point where classified service failures become HTTP
//! responses. Handlers never pick status codes themselves; they return
//! `ServiceError` and the mapping below decides the code and body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::services::ServiceError;

/// Body reported for backing-store failures. The underlying detail is
/// logged server-side only.
pub const DEPENDENCY_ERROR_BODY: &str = "Database error occurred";

/// Body reported for unclassified failures. The underlying detail is
/// logged server-side only.
pub const INTERNAL_ERROR_BODY: &str = "Something went wrong on the server.";

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ServiceError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorBody::new(msg)),
            ServiceError::Validation(msg) => (StatusCode::BAD_REQUEST, ErrorBody::new(msg)),
            ServiceError::Dependency(detail) => {
                tracing::error!("backing store unavailable: {}", detail);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorBody::new(DEPENDENCY_ERROR_BODY),
                )
            }
            ServiceError::Internal(detail) => {
                tracing::error!("unhandled error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new(INTERNAL_ERROR_BODY),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
