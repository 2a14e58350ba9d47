//! Task planner
//!
//! Asks the model to break a topic into three `"role:subtask"` items and
//! parses the answer as a JSON array of strings. Anything else (prose, a
//! truncated array, objects, numbers) is a [`PlanParseError`], and the
//! planner falls back to a single generic task covering the whole topic.

use crate::gateway::ModelGateway;
use crate::orchestrator::types::DEFAULT_ROLE;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// System prompt for the planning call
pub const PLANNER_SYSTEM_PROMPT: &str =
    "You are a strict JSON formatter. Reply with a JSON array of strings and nothing else.";

/// Number of subtasks requested from the model
pub const PLANNED_TASK_COUNT: usize = 3;

/// Why a planner response was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanParseError {
    /// Response is not JSON at all
    #[error("planner response is not valid JSON: {0}")]
    NotJson(String),

    /// Response is JSON but not an array
    #[error("planner response is not a JSON array")]
    NotArray,

    /// An element of the array is not a string
    #[error("planner response element {index} is not a string")]
    NonStringElement {
        /// Position of the offending element
        index: usize,
    },
}

/// Build the planning instruction for `topic`
pub fn build_plan_prompt(topic: &str) -> String {
    format!(
        r#"You are the task planner of a research team.
The user submitted the topic: "{topic}"
Break it into exactly {count} concrete subtasks and give each one a fitting role name.

Format: reply with a JSON array of {count} strings, each "role:subtask", and nothing else.
Example: ["market researcher:estimate the market size", "technical analyst:assess the core technology", "competitor analyst:name the main competitors"]"#,
        topic = topic,
        count = PLANNED_TASK_COUNT,
    )
}

/// Parse a planner response as a JSON array of strings
///
/// Surrounding whitespace is ignored; nothing else is tolerated.
pub fn parse_plan(text: &str) -> Result<Vec<String>, PlanParseError> {
    let value: Value =
        serde_json::from_str(text.trim()).map_err(|e| PlanParseError::NotJson(e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(PlanParseError::NotArray);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::String(s) => Ok(s),
            _ => Err(PlanParseError::NonStringElement { index }),
        })
        .collect()
}

/// Plan used whenever the model's answer cannot be used
pub fn fallback_plan(topic: &str) -> Vec<String> {
    vec![format!("{}:{}", DEFAULT_ROLE, topic)]
}

/// Decomposes a topic into planner items with one model call
#[derive(Clone)]
pub struct TaskPlanner {
    gateway: Arc<dyn ModelGateway>,
}

impl TaskPlanner {
    /// Create a planner using `gateway`
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        Self { gateway }
    }

    /// Plan `topic`; never fails, falls back to [`fallback_plan`]
    pub async fn plan(&self, topic: &str) -> Vec<String> {
        tracing::debug!(topic_len = topic.len(), "Planning workflow");

        let response = match self
            .gateway
            .complete(PLANNER_SYSTEM_PROMPT, &build_plan_prompt(topic))
            .await
        {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    kind = e.kind(),
                    "Planner call failed, using fallback plan"
                );
                return fallback_plan(topic);
            }
        };

        match parse_plan(&response) {
            Ok(items) => {
                tracing::debug!(num_items = items.len(), "Planner produced plan");
                items
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    response_len = response.len(),
                    "Failed to parse planner response, using fallback plan"
                );
                fallback_plan(topic)
            }
        }
    }
}
