//! Error types and error handling for the HTTP layer
//!
//! This module defines the error type returned by request handlers and
//! extractors. All variants implement `IntoResponse` to provide consistent
//! error formatting. Core components never surface errors to handlers; they
//! degrade to defaults (see the orchestrator module).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Bearer token missing, malformed, expired or otherwise rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Request body or parameters failed validation
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Server is missing a required setting (e.g. the JWT secret)
    #[error("Server misconfigured: {0}")]
    Misconfigured(String),
}

impl AppError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Misconfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
