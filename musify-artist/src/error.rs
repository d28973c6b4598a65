//! Error types for musify-artist
//!
//! Failures are reported to clients as a bare status code with an empty
//! body; the detail goes to the log.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::clients::UpstreamError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Mandatory upstream lookup failed (502)
    #[error("Upstream failure: {0}")]
    Upstream(UpstreamError),
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            other => ApiError::Upstream(other),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::NotFound(_) => tracing::warn!("Handling not found: {}", self),
            ApiError::Upstream(_) => tracing::error!("Request failed: {}", self),
        }
        status.into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
