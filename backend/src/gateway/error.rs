//! Gateway error types
//!
//! Errors that can occur while calling the model provider.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during a model call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// No API key configured for the provider
    #[error("Model API key is not configured")]
    MissingApiKey,

    /// The HTTP request could not be sent or the body could not be read
    #[error("Failed to reach model provider: {0}")]
    Request(String),

    /// Provider answered HTTP 429
    #[error("Model provider rate limit exceeded: {0}")]
    RateLimited(String),

    /// Provider answered with another non-success status
    #[error("Model provider returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body (or a placeholder if unreadable)
        body: String,
    },

    /// Response body was not the expected JSON shape
    #[error("Failed to parse model response: {0}")]
    Decode(String),

    /// The model declined to answer
    #[error("Model refused the request: {0}")]
    Refused(String),

    /// Response contained no usable text
    #[error("Model response contained no content")]
    EmptyResponse,

    /// Call exceeded its deadline
    #[error("Model call timed out after {0:?}")]
    Timeout(Duration),
}

impl GatewayError {
    /// Stable machine-readable label for the failure class
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::MissingApiKey => "configuration",
            GatewayError::Request(_) => "transport",
            GatewayError::RateLimited(_) => "rate_limit",
            GatewayError::Status { .. } => "provider",
            GatewayError::Decode(_) => "malformed_response",
            GatewayError::Refused(_) => "refused",
            GatewayError::EmptyResponse => "empty_response",
            GatewayError::Timeout(_) => "timeout",
        }
    }

    /// Human-readable text shown in place of model output for a failed call
    pub fn inline_message(&self) -> String {
        format!("Model call failed ({}): {}", self.kind(), self)
    }
}
