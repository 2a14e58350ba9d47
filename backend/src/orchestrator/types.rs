//! Workflow data types
//!
//! Records produced by the executor and orchestrator, plus the transient
//! `(role, subtask)` pair derived from a planner item.

use serde::{Deserialize, Serialize};

/// Role used when a planner item carries no `role:` prefix
pub const DEFAULT_ROLE: &str = "assistant";

/// Outcome of a single agent call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    /// The model answered
    Completed,
    /// The model call failed; `content` holds the failure description
    Failed,
}

/// Result of one agent working on one subtask
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    /// Role the agent played
    pub agent_name: String,
    /// Subtask it was given
    pub task: String,
    /// Whether the call succeeded
    pub status: AgentStatus,
    /// Model output, or the failure description
    pub content: String,
    /// Latency of this agent's call alone, in seconds
    pub duration: f64,
}

/// Final report for one workflow run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowReport {
    /// Short opaque id (first 8 chars of a v4 UUID)
    pub workflow_id: String,
    /// Topic as submitted
    pub topic: String,
    /// One entry per planned task, in submission order
    pub results: Vec<AgentResult>,
    /// Wall-clock seconds for planning plus fan-out
    pub total_time: f64,
}

/// A planner item split into role and subtask
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTask {
    /// Role label (text before the first `:`)
    pub role: String,
    /// Subtask description (text after the first `:`)
    pub subtask: String,
}

impl PlannedTask {
    /// Split on the first `:`; items without one get [`DEFAULT_ROLE`]
    pub fn from_item(item: &str) -> Self {
        match item.split_once(':') {
            Some((role, subtask)) => Self {
                role: role.to_string(),
                subtask: subtask.to_string(),
            },
            None => Self {
                role: DEFAULT_ROLE.to_string(),
                subtask: item.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_first_colon_only() {
        let task = PlannedTask::from_item("tech:assess: battery tech");
        assert_eq!(task.role, "tech");
        assert_eq!(task.subtask, "assess: battery tech");
    }

    #[test]
    fn test_no_colon_uses_default_role() {
        let task = PlannedTask::from_item("survey demand in Europe");
        assert_eq!(task.role, DEFAULT_ROLE);
        assert_eq!(task.subtask, "survey demand in Europe");
    }

    #[test]
    fn test_split_keeps_whitespace_verbatim() {
        let task = PlannedTask::from_item(" market : survey ");
        assert_eq!(task.role, " market ");
        assert_eq!(task.subtask, " survey ");
    }

    #[test]
    fn test_empty_halves() {
        assert_eq!(
            PlannedTask::from_item(":only task"),
            PlannedTask {
                role: String::new(),
                subtask: "only task".to_string()
            }
        );
        assert_eq!(
            PlannedTask::from_item("role:"),
            PlannedTask {
                role: "role".to_string(),
                subtask: String::new()
            }
        );
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&AgentStatus::Completed).unwrap(),
            "\"completed\""
        );
        assert_eq!(
            serde_json::to_string(&AgentStatus::Failed).unwrap(),
            "\"failed\""
        );
    }

    #[test]
    fn test_report_serialization_shape() {
        let report = WorkflowReport {
            workflow_id: "1a2b3c4d".to_string(),
            topic: "ElectricCars".to_string(),
            results: vec![AgentResult {
                agent_name: "market".to_string(),
                task: "Analyze survey demand".to_string(),
                status: AgentStatus::Completed,
                content: "Demand is growing.".to_string(),
                duration: 1.25,
            }],
            total_time: 2.5,
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["workflow_id"], "1a2b3c4d");
        assert_eq!(value["results"][0]["agent_name"], "market");
        assert_eq!(value["results"][0]["status"], "completed");
        assert_eq!(value["total_time"], 2.5);

        let back: WorkflowReport = serde_json::from_value(value).unwrap();
        assert_eq!(back, report);
    }
}
