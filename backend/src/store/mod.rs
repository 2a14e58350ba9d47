//! Workflow persistence
//!
//! A keyed-record store for finished workflow reports. The orchestrator only
//! sees the [`WorkflowStore`] trait; [`SqliteWorkflowStore`] is the bundled
//! implementation.

pub mod sqlite;

pub use sqlite::SqliteWorkflowStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by a store backend
#[derive(Error, Debug)]
pub enum StoreError {
    /// Could not open or migrate the database
    #[error("Failed to initialize store: {0}")]
    Init(String),

    /// A query failed
    #[error("Store query failed: {0}")]
    Query(#[from] sqlx::Error),

    /// A stored report could not be (de)serialized
    #[error("Invalid stored report: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Fields supplied by the caller when saving a report
#[derive(Debug, Clone)]
pub struct NewWorkflowRecord {
    /// Owning user
    pub user_id: String,
    /// Topic the workflow ran on
    pub topic: String,
    /// Serialized report
    pub result: serde_json::Value,
}

/// A persisted report as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRecord {
    /// Store-generated row id
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Topic the workflow ran on
    pub topic: String,
    /// Serialized report
    pub result: serde_json::Value,
    /// Store-generated creation time, unix milliseconds
    pub created_at: i64,
}

/// Keyed-record store for workflow reports
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// Insert a record, generating its id and creation time
    async fn insert(&self, record: NewWorkflowRecord) -> Result<WorkflowRecord, StoreError>;

    /// Newest `limit` records owned by `user_id`
    async fn list_recent(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<WorkflowRecord>, StoreError>;

    /// Delete the record matching both `id` and `user_id`; returns rows removed
    async fn delete(&self, id: &str, user_id: &str) -> Result<u64, StoreError>;
}
