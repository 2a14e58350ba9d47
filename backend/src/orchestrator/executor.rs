//! Agent executor
//!
//! Runs one role-played model call for one subtask and records how long it
//! took. A failed or timed-out call yields a `failed` result carrying the
//! error description instead of model output.

use crate::gateway::{GatewayError, ModelGateway};
use crate::orchestrator::types::{AgentResult, AgentStatus};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Prefix of the `task` label recorded on each result
pub const TASK_LABEL_PREFIX: &str = "Analyze";

/// Persona for roles not found in [`PERSONAS`]
pub const DEFAULT_PERSONA: &str = "You are a helpful assistant. Answer briefly.";

/// Known roles (lowercase) and their system prompts
pub const PERSONAS: [(&str, &str); 3] = [
    (
        "market researcher",
        "You are a senior market researcher. Briefly list three key market data points about the subject. Keep an objective tone.",
    ),
    (
        "technical analyst",
        "You are a hardcore technical expert. Analyze the single hardest technical challenge behind the subject. Use precise terminology.",
    ),
    (
        "competitor analyst",
        "You are a sharp-tongued industry critic. Name the biggest competitor of the subject and briefly explain why.",
    ),
];

/// System prompt for `role`, matched case-insensitively after trimming
pub fn persona_for(role: &str) -> &'static str {
    let normalized = role.trim().to_lowercase();
    PERSONAS
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, prompt)| *prompt)
        .unwrap_or(DEFAULT_PERSONA)
}

/// Executes single agent calls
#[derive(Clone)]
pub struct AgentExecutor {
    gateway: Arc<dyn ModelGateway>,
    timeout: Option<Duration>,
}

impl AgentExecutor {
    /// Create an executor; `timeout` bounds each call when set
    pub fn new(gateway: Arc<dyn ModelGateway>, timeout: Option<Duration>) -> Self {
        Self { gateway, timeout }
    }

    /// Run `subtask` as `role`
    ///
    /// The model receives the bare subtask; the result's `task` is labelled
    /// `"Analyze <subtask>"`.
    pub async fn execute(&self, role: &str, subtask: &str) -> AgentResult {
        let start = Instant::now();
        tracing::debug!(role = %role, subtask_len = subtask.len(), "Agent started");

        let call = self.gateway.complete(persona_for(role), subtask);
        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or(Err(GatewayError::Timeout(limit))),
            None => call.await,
        };
        let duration = start.elapsed();

        let (status, content) = match outcome {
            Ok(text) => (AgentStatus::Completed, text),
            Err(e) => {
                tracing::warn!(
                    role = %role,
                    kind = e.kind(),
                    error = %e,
                    "Agent call failed"
                );
                (AgentStatus::Failed, e.inline_message())
            }
        };

        tracing::debug!(
            role = %role,
            status = ?status,
            duration_ms = duration.as_millis(),
            "Agent finished"
        );

        AgentResult {
            agent_name: role.to_string(),
            task: format!("{} {}", TASK_LABEL_PREFIX, subtask),
            status,
            content,
            duration: duration.as_secs_f64(),
        }
    }
}
