//! Chat-completions wire types
//!
//! Structs that mirror the OpenAI-compatible chat-completions JSON format.

use serde::{Deserialize, Serialize};

/// Request body for `POST /chat/completions`
#[derive(Serialize, Debug)]
pub struct ChatCompletionRequest<'a> {
    /// Model name
    pub model: &'a str,
    /// Conversation, here always `[system, user]`
    pub messages: Vec<ChatMessage<'a>>,
}

/// A single request message
#[derive(Serialize, Debug)]
pub struct ChatMessage<'a> {
    /// "system" or "user"
    pub role: &'static str,
    /// Message text
    pub content: &'a str,
}

/// Top-level chat-completions response
#[derive(Deserialize, Debug)]
pub struct ChatCompletionResponse {
    /// Candidate answers; the first one is used
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// A single candidate answer
#[derive(Deserialize, Debug)]
pub struct Choice {
    /// The generated message
    pub message: ResponseMessage,
    /// Why generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Message content of a candidate
#[derive(Deserialize, Debug)]
pub struct ResponseMessage {
    /// Generated text (absent for refusals or tool calls)
    #[serde(default)]
    pub content: Option<String>,
    /// Refusal explanation, if the model declined
    #[serde(default)]
    pub refusal: Option<String>,
}

/// Error envelope returned with non-2xx statuses
#[derive(Deserialize, Debug)]
pub struct ErrorEnvelope {
    /// Error details
    pub error: ErrorBody,
}

/// Error details
#[derive(Deserialize, Debug)]
pub struct ErrorBody {
    /// Provider's error message
    pub message: String,
}
