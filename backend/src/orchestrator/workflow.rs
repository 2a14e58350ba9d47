//! Workflow orchestrator
//!
//! Composition root for a run: plan the topic, split the plan into
//! `(role, subtask)` pairs, execute every agent concurrently, assemble the
//! report and persist it for the user when a store is configured.
//! Persistence is best-effort; the report is returned either way.

use crate::config::WorkflowSettings;
use crate::gateway::ModelGateway;
use crate::orchestrator::executor::AgentExecutor;
use crate::orchestrator::fan_out::join_ordered;
use crate::orchestrator::planner::TaskPlanner;
use crate::orchestrator::types::{PlannedTask, WorkflowReport};
use crate::store::{NewWorkflowRecord, WorkflowRecord, WorkflowStore};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Default number of records returned by [`WorkflowOrchestrator::list_recent`]
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Length of the short workflow id
const WORKFLOW_ID_LEN: usize = 8;

/// Generate a short opaque workflow id
pub fn new_workflow_id() -> String {
    Uuid::new_v4().simple().to_string()[..WORKFLOW_ID_LEN].to_string()
}

/// Runs workflows and serves the per-user history
pub struct WorkflowOrchestrator {
    planner: TaskPlanner,
    executor: AgentExecutor,
    store: Option<Arc<dyn WorkflowStore>>,
    settings: WorkflowSettings,
}

impl WorkflowOrchestrator {
    /// Wire the orchestrator to its collaborators
    ///
    /// `store` is optional; without one, runs are not persisted, history is
    /// empty and deletes report `false`.
    pub fn new(
        gateway: Arc<dyn ModelGateway>,
        store: Option<Arc<dyn WorkflowStore>>,
        settings: WorkflowSettings,
    ) -> Self {
        Self {
            planner: TaskPlanner::new(gateway.clone()),
            executor: AgentExecutor::new(gateway, settings.agent_timeout),
            store,
            settings,
        }
    }

    /// Whether a persistence store is configured
    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// Settings in effect
    pub fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    /// Run a full workflow for `topic` on behalf of `user_id`
    pub async fn run(&self, topic: &str, user_id: &str) -> WorkflowReport {
        let start = Instant::now();
        let workflow_id = new_workflow_id();

        tracing::info!(
            workflow_id = %workflow_id,
            user_id = %user_id,
            topic_len = topic.len(),
            "Workflow started"
        );

        let mut items = self.planner.plan(topic).await;
        if items.len() > self.settings.max_planned_tasks {
            tracing::warn!(
                workflow_id = %workflow_id,
                planned = items.len(),
                kept = self.settings.max_planned_tasks,
                "Planner returned too many tasks, truncating"
            );
            items.truncate(self.settings.max_planned_tasks);
        }

        let tasks: Vec<PlannedTask> = items
            .iter()
            .map(|item| PlannedTask::from_item(item))
            .collect();

        let executor = &self.executor;
        let results = join_ordered(tasks, self.settings.max_concurrent_agents, |task| async move {
            executor.execute(&task.role, &task.subtask).await
        })
        .await;

        let total_time = start.elapsed().as_secs_f64();
        let report = WorkflowReport {
            workflow_id,
            topic: topic.to_string(),
            results,
            total_time,
        };

        tracing::info!(
            workflow_id = %report.workflow_id,
            agents = report.results.len(),
            total_ms = (total_time * 1000.0) as u64,
            "Workflow finished"
        );

        self.persist(&report, user_id).await;
        report
    }

    async fn persist(&self, report: &WorkflowReport, user_id: &str) {
        let Some(store) = &self.store else {
            tracing::debug!(
                workflow_id = %report.workflow_id,
                "No store configured, skipping persistence"
            );
            return;
        };

        let result = match serde_json::to_value(report) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    workflow_id = %report.workflow_id,
                    error = %e,
                    "Failed to serialize report"
                );
                return;
            }
        };

        let record = NewWorkflowRecord {
            user_id: user_id.to_string(),
            topic: report.topic.clone(),
            result,
        };

        match store.insert(record).await {
            Ok(saved) => tracing::debug!(
                workflow_id = %report.workflow_id,
                record_id = %saved.id,
                "Workflow persisted"
            ),
            Err(e) => tracing::warn!(
                workflow_id = %report.workflow_id,
                user_id = %user_id,
                error = %e,
                "Failed to persist workflow"
            ),
        }
    }

    /// Newest `limit` persisted reports of `user_id`; empty on any failure
    pub async fn list_recent(&self, user_id: &str, limit: usize) -> Vec<WorkflowRecord> {
        let Some(store) = &self.store else {
            tracing::debug!("No store configured, returning empty history");
            return Vec::new();
        };

        match store.list_recent(user_id, limit).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Failed to query workflow history");
                Vec::new()
            }
        }
    }

    /// Delete record `id` if it belongs to `user_id`
    ///
    /// Returns `true` only when a row was actually removed.
    pub async fn delete(&self, id: &str, user_id: &str) -> bool {
        let Some(store) = &self.store else {
            tracing::warn!(id = %id, "No store configured, cannot delete workflow");
            return false;
        };

        match store.delete(id, user_id).await {
            Ok(0) => {
                tracing::info!(id = %id, user_id = %user_id, "No workflow matched delete");
                false
            }
            Ok(_) => {
                tracing::info!(id = %id, user_id = %user_id, "Workflow deleted");
                true
            }
            Err(e) => {
                tracing::warn!(
                    id = %id,
                    user_id = %user_id,
                    error = %e,
                    "Failed to delete workflow"
                );
                false
            }
        }
    }
}
