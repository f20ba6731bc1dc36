//! Storyloom — API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use storyloom_core::error::StoryError;
use thiserror::Error;

/// Startup errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The story data file could not be loaded.
    #[error(transparent)]
    StoryData(#[from] StoryError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `StoryError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub StoryError);

impl From<StoryError> for ApiError {
    fn from(err: StoryError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.0 {
            StoryError::Timeout { .. } => (StatusCode::GATEWAY_TIMEOUT, "generation_timeout"),
            StoryError::Generation(_) => (StatusCode::BAD_GATEWAY, "generation_error"),
            StoryError::EmptyHistory => (StatusCode::BAD_REQUEST, "empty_history"),
            StoryError::UninitializedSession => (StatusCode::CONFLICT, "uninitialized_session"),
            StoryError::StoryData(_) => (StatusCode::INTERNAL_SERVER_ERROR, "story_data_error"),
            StoryError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
            }
        };

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
