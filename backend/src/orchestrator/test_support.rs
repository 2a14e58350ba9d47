//! Test doubles for the gateway and the store

use crate::gateway::{GatewayError, ModelGateway};
use crate::orchestrator::planner::PLANNER_SYSTEM_PROMPT;
use crate::store::{NewWorkflowRecord, StoreError, WorkflowRecord, WorkflowStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct CallLog {
    calls: Mutex<Vec<(String, String)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// Gateway answering from a script
///
/// Planner calls get `plan_response`. Agent calls are looked up by user
/// prompt (the subtask); unscripted subtasks answer `"answer to <subtask>"`
/// immediately.
#[derive(Clone)]
pub(crate) struct ScriptedGateway {
    plan_response: Result<String, GatewayError>,
    agents: HashMap<String, (Duration, Result<String, GatewayError>)>,
    log: Arc<CallLog>,
}

impl Default for ScriptedGateway {
    fn default() -> Self {
        Self::new(Ok("[]".to_string()))
    }
}

impl ScriptedGateway {
    pub(crate) fn new(plan_response: Result<String, GatewayError>) -> Self {
        Self {
            plan_response,
            agents: HashMap::new(),
            log: Arc::new(CallLog::default()),
        }
    }

    pub(crate) fn with_agent(
        mut self,
        subtask: &str,
        delay: Duration,
        response: Result<String, GatewayError>,
    ) -> Self {
        self.agents.insert(subtask.to_string(), (delay, response));
        self
    }

    /// Every `(system, user)` pair received, in call order
    pub(crate) fn calls(&self) -> Vec<(String, String)> {
        self.log.calls.lock().unwrap().clone()
    }

    /// Highest number of agent calls observed running at once
    pub(crate) fn max_in_flight(&self) -> usize {
        self.log.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, GatewayError> {
        self.log
            .calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));

        if system_prompt == PLANNER_SYSTEM_PROMPT {
            return self.plan_response.clone();
        }

        let now = self.log.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.log.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let (delay, response) = self
            .agents
            .get(user_prompt)
            .cloned()
            .unwrap_or_else(|| (Duration::ZERO, Ok(format!("answer to {}", user_prompt))));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.log.in_flight.fetch_sub(1, Ordering::SeqCst);
        response
    }
}

/// Store whose every operation fails
pub(crate) struct FailingStore;

#[async_trait]
impl WorkflowStore for FailingStore {
    async fn insert(&self, _record: NewWorkflowRecord) -> Result<WorkflowRecord, StoreError> {
        Err(StoreError::Init("store offline".to_string()))
    }

    async fn list_recent(
        &self,
        _user_id: &str,
        _limit: usize,
    ) -> Result<Vec<WorkflowRecord>, StoreError> {
        Err(StoreError::Init("store offline".to_string()))
    }

    async fn delete(&self, _id: &str, _user_id: &str) -> Result<u64, StoreError> {
        Err(StoreError::Init("store offline".to_string()))
    }
}
