//! Orchestrator module
//!
//! Planning, per-agent execution and the workflow composition root. Data
//! flows one way: topic → planner → `(role, subtask)` pairs → executors
//! (concurrently) → report → optional persistence.

pub mod executor;
pub mod fan_out;
pub mod planner;
pub mod types;
pub mod workflow;

#[cfg(test)]
pub(crate) mod test_support;

pub use executor::AgentExecutor;
pub use planner::TaskPlanner;
pub use types::{AgentResult, AgentStatus, PlannedTask, WorkflowReport};
pub use workflow::WorkflowOrchestrator;
