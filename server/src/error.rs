use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// API Error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Synthesis failed: {0}")]
    Synthesis(#[from] tts_core::SpeechError),

    #[error("Synthesis timed out after {0} seconds")]
    Timeout(u64),

    #[error("File save failed: {0}")]
    Filesystem(tts_core::SpeechError),

    #[error("A synthesis is already running, try again shortly")]
    Busy,

    #[error("Nothing has been synthesized yet")]
    NothingSynthesized,
}

/// Error response structure
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Synthesis(e) => {
                tracing::error!("Synthesis error: {}", e);
                StatusCode::BAD_GATEWAY
            }
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Filesystem(e) => {
                tracing::error!("Filesystem error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Busy => StatusCode::CONFLICT,
            ApiError::NothingSynthesized => StatusCode::NOT_FOUND,
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}
