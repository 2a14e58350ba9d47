//! Workflow API handlers
//!
//! Contains HTTP request handlers for running workflows and managing the
//! caller's workflow history. Every handler requires a bearer token.

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::orchestrator::workflow::DEFAULT_HISTORY_LIMIT;
use crate::orchestrator::WorkflowReport;
use crate::state::AppState;
use crate::store::WorkflowRecord;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

/// Upper bound for the `limit` query parameter
pub const MAX_HISTORY_LIMIT: usize = 100;

/// Workflow request
#[derive(Debug, Deserialize)]
pub struct WorkflowRequest {
    /// Topic to research, e.g. "Tesla"
    pub topic: String,
}

/// History query parameters
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    /// Number of records to return (default 10, clamped to 1..=100)
    pub limit: Option<usize>,
}

/// Delete response
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DeleteResponse {
    /// "success" or "error"
    pub status: String,
    /// Human-readable outcome
    pub message: String,
}

/// Check a topic against the configured length limit
pub fn validate_topic(topic: &str, max_len: usize) -> Result<(), AppError> {
    if topic.trim().is_empty() {
        return Err(AppError::InvalidRequest("topic must not be empty".to_string()));
    }
    let len = topic.chars().count();
    if len > max_len {
        return Err(AppError::InvalidRequest(format!(
            "topic too long ({} > {} characters)",
            len, max_len
        )));
    }
    Ok(())
}

/// POST /api/workflow - Plan and run a workflow for the caller
pub async fn create_workflow(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(request): Json<WorkflowRequest>,
) -> Result<Json<WorkflowReport>, AppError> {
    validate_topic(&request.topic, state.max_topic_length)?;

    let report = state.orchestrator.run(&request.topic, &user_id).await;
    Ok(Json(report))
}

/// GET /api/history - The caller's most recent workflows, newest first
pub async fn get_history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<HistoryQuery>,
) -> Json<Vec<WorkflowRecord>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);

    Json(state.orchestrator.list_recent(&user_id, limit).await)
}

/// DELETE /api/workflow/:id - Delete one of the caller's workflows
pub async fn delete_workflow(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Json<DeleteResponse> {
    let response = if state.orchestrator.delete(&id, &user_id).await {
        DeleteResponse {
            status: "success".to_string(),
            message: format!("Workflow {} deleted", id),
        }
    } else {
        DeleteResponse {
            status: "error".to_string(),
            message: "Delete failed".to_string(),
        }
    };
    Json(response)
}
