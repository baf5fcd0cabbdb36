//! Error types for fatigue-server
//!
//! Client errors carry their message to the caller. Internal errors return
//! a generic message; the detail stays in the server log.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::scorer::ScorerError;

const INTERNAL_MESSAGE: &str = "An internal server error occurred.";
const REPLY_MESSAGE: &str = "An error occurred while parsing the AI model's response.";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Scorer failure (500)
    #[error("Scoring failed: {0}")]
    Scoring(#[from] ScorerError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Scoring(ScorerError::Reply(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "MODEL_REPLY_ERROR",
                REPLY_MESSAGE.to_string(),
            ),
            ApiError::Scoring(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
            ),
        };

        let body = Json(json!({
            "error": message,
            "code": error_code,
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
