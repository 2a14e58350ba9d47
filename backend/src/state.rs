//! Shared application state
//!
//! Everything handlers need, built once at startup and cloned per request.

use crate::config::AuthConfig;
use crate::orchestrator::WorkflowOrchestrator;
use std::sync::Arc;

/// State handed to every axum handler
#[derive(Clone)]
pub struct AppState {
    /// Workflow runner and history accessors
    pub orchestrator: Arc<WorkflowOrchestrator>,
    /// Token verification settings
    pub auth: Arc<AuthConfig>,
    /// Maximum accepted topic length in characters
    pub max_topic_length: usize,
}

impl AppState {
    /// Bundle the collaborators
    pub fn new(
        orchestrator: Arc<WorkflowOrchestrator>,
        auth: AuthConfig,
        max_topic_length: usize,
    ) -> Self {
        Self {
            orchestrator,
            auth: Arc::new(auth),
            max_topic_length,
        }
    }
}
