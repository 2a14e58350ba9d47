//! Model gateway
//!
//! The single call primitive every other component is built on: send a
//! system prompt and a user prompt to a language model and get text back.
//! Failures are returned as a typed [`GatewayError`] so callers can tell a
//! real answer apart from a failed call.

pub mod error;
pub mod openai;
pub mod openai_types;

pub use error::GatewayError;
pub use openai::OpenAiGateway;

use async_trait::async_trait;

/// A request/response language-model provider
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Complete one exchange and return the model's text
    async fn complete(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, GatewayError>;
}
