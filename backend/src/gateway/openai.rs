//! OpenAI-compatible chat-completions client
//!
//! Direct HTTP client for any provider exposing `POST {base}/chat/completions`
//! (OpenAI, Azure-style proxies, local servers). One instance is built at
//! startup and shared; `reqwest::Client` pools connections internally.

use crate::config::ModelConfig;
use crate::gateway::openai_types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ErrorEnvelope,
};
use crate::gateway::{GatewayError, ModelGateway};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

/// Model gateway backed by an OpenAI-compatible HTTP API
#[derive(Clone)]
pub struct OpenAiGateway {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OpenAiGateway {
    /// Build the gateway and its pooled HTTP client
    ///
    /// # Errors
    /// Returns the `reqwest` error if the TLS backend cannot be initialized.
    pub fn new(config: &ModelConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    /// Model name used for every request
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn map_send_error(&self, e: reqwest::Error) -> GatewayError {
        if e.is_timeout() {
            GatewayError::Timeout(self.timeout)
        } else {
            GatewayError::Request(e.to_string())
        }
    }
}

#[async_trait]
impl ModelGateway for OpenAiGateway {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, GatewayError> {
        if self.api_key.is_empty() {
            return Err(GatewayError::MissingApiKey);
        }

        let request_body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
        };

        tracing::debug!(
            model = %self.model,
            system_len = system_prompt.len(),
            prompt_len = user_prompt.len(),
            "Calling chat completions API"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            // Prefer the provider's own message when the body is the usual envelope
            let detail = serde_json::from_str::<ErrorEnvelope>(&error_body)
                .map(|envelope| envelope.error.message)
                .unwrap_or(error_body);

            tracing::error!(
                status_code = status.as_u16(),
                error_body = %detail,
                "Chat completions API returned error status"
            );

            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(GatewayError::RateLimited(detail));
            }
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body: detail,
            });
        }

        let response_body = response
            .text()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let parsed: ChatCompletionResponse = serde_json::from_str(&response_body)
            .map_err(|e| {
                GatewayError::Decode(format!("{} - Response body: {}", e, response_body))
            })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(GatewayError::EmptyResponse)?;

        if let Some(refusal) = choice.message.refusal.filter(|r| !r.is_empty()) {
            return Err(GatewayError::Refused(refusal));
        }

        let text = choice
            .message
            .content
            .filter(|t| !t.is_empty())
            .ok_or(GatewayError::EmptyResponse)?;

        tracing::debug!(
            response_len = text.len(),
            finish_reason = ?choice.finish_reason,
            "Received chat completion"
        );

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serial_test::serial;

    fn gateway_for(base_url: &str, api_key: &str) -> OpenAiGateway {
        OpenAiGateway::new(&ModelConfig {
            api_key: api_key.to_string(),
            base_url: base_url.to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_new_normalizes_endpoint_and_keeps_model() {
        let gateway = gateway_for("https://api.example.com/v1/", "key");
        assert_eq!(gateway.model(), "gpt-4o-mini");
        assert_eq!(gateway.endpoint(), "https://api.example.com/v1/chat/completions");
    }

    #[tokio::test]
    async fn test_complete_empty_api_key() {
        let gateway = gateway_for("http://127.0.0.1:9", "");
        let result = gateway.complete("system", "user").await;
        assert_eq!(result, Err(GatewayError::MissingApiKey));
    }

    #[tokio::test]
    #[serial]
    async fn test_complete_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "gpt-4o-mini",
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "battery tech"}
                ]
            })))
            .with_status(200)
            .with_body(
                r#"{
                    "choices": [{
                        "message": {"role": "assistant", "content": "Solid-state cells."},
                        "finish_reason": "stop"
                    }]
                }"#,
            )
            .create_async()
            .await;

        let gateway = gateway_for(&server.url(), "test-key");
        let result = gateway.complete("be brief", "battery tech").await;

        mock.assert_async().await;
        assert_eq!(result.unwrap(), "Solid-state cells.");
    }

    #[tokio::test]
    #[serial]
    async fn test_complete_trailing_slash_base_url() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": [{"message": {"content": "ok"}}]}"#)
            .create_async()
            .await;

        let gateway = gateway_for(&format!("{}/", server.url()), "test-key");
        let result = gateway.complete("s", "u").await;

        mock.assert_async().await;
        assert_eq!(result.unwrap(), "ok");
    }

    #[tokio::test]
    #[serial]
    async fn test_complete_rate_limit() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body(r#"{"error": {"message": "Rate limit reached"}}"#)
            .create_async()
            .await;

        let gateway = gateway_for(&server.url(), "test-key");
        let result = gateway.complete("s", "u").await;

        mock.assert_async().await;
        assert_eq!(
            result,
            Err(GatewayError::RateLimited("Rate limit reached".to_string()))
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_complete_auth_failure_status() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body("not json at all")
            .create_async()
            .await;

        let gateway = gateway_for(&server.url(), "bad-key");
        let result = gateway.complete("s", "u").await;

        mock.assert_async().await;
        match result {
            Err(GatewayError::Status { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "not json at all");
            }
            other => panic!("Expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_complete_empty_choices() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let gateway = gateway_for(&server.url(), "test-key");
        let result = gateway.complete("s", "u").await;

        mock.assert_async().await;
        assert_eq!(result, Err(GatewayError::EmptyResponse));
    }

    #[tokio::test]
    #[serial]
    async fn test_complete_refusal() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(
                r#"{"choices": [{"message": {"content": null, "refusal": "I can't help with that."}}]}"#,
            )
            .create_async()
            .await;

        let gateway = gateway_for(&server.url(), "test-key");
        let result = gateway.complete("s", "u").await;

        mock.assert_async().await;
        assert_eq!(
            result,
            Err(GatewayError::Refused("I can't help with that.".to_string()))
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_complete_invalid_json() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body("This is not JSON")
            .create_async()
            .await;

        let gateway = gateway_for(&server.url(), "test-key");
        let result = gateway.complete("s", "u").await;

        mock.assert_async().await;
        match result {
            Err(err @ GatewayError::Decode(_)) => {
                assert_eq!(err.kind(), "malformed_response");
            }
            other => panic!("Expected decode error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_complete_unreachable_host() {
        // Port 9 (discard) is closed on test machines; connection is refused
        let gateway = gateway_for("http://127.0.0.1:9", "test-key");
        let result = gateway.complete("s", "u").await;
        assert!(matches!(
            result,
            Err(GatewayError::Request(_)) | Err(GatewayError::Timeout(_))
        ));
    }
}
