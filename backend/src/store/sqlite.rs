//! SQLite workflow store
//!
//! Handles all database interactions for persisted workflow reports.

use crate::store::{NewWorkflowRecord, StoreError, WorkflowRecord, WorkflowStore};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Raw row shape; `result` is stored as JSON text
#[derive(Debug, FromRow)]
struct WorkflowRow {
    id: String,
    user_id: String,
    topic: String,
    result: String,
    created_at: i64,
}

impl TryFrom<WorkflowRow> for WorkflowRecord {
    type Error = StoreError;

    fn try_from(row: WorkflowRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            topic: row.topic,
            result: serde_json::from_str(&row.result)?,
            created_at: row.created_at,
        })
    }
}

/// Connection pool for workflow persistence
pub struct SqliteWorkflowStore {
    pool: SqlitePool,
}

impl SqliteWorkflowStore {
    /// Open (creating if missing) the database and run migrations
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file, or a `sqlite:` URL
    pub async fn new(db_path: &str) -> Result<Self, StoreError> {
        if !db_path.starts_with("sqlite:") {
            if let Some(parent) = PathBuf::from(db_path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        StoreError::Init(format!("Failed to create db directory: {}", e))
                    })?;
                }
            }
        }

        let connection_string = if db_path.starts_with("sqlite:") {
            db_path.to_string()
        } else {
            format!("sqlite:{}", db_path)
        };

        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(|e| StoreError::Init(format!("Invalid database path: {}", e)))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Init(format!("Failed to connect to database: {}", e)))?;

        info!("Connected to SQLite database at: {}", db_path);

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        debug!("Running database migrations...");

        let migration_sql = include_str!("../../migrations/001_create_workflows.sql");

        for statement in split_statements(migration_sql) {
            sqlx::query(&statement)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    StoreError::Init(format!(
                        "Migration failed: {} - Statement: {}",
                        e,
                        statement.chars().take(100).collect::<String>()
                    ))
                })?;
        }

        debug!("Database migrations completed");
        Ok(())
    }
}

/// Strip `--` comments and split a migration script into statements
fn split_statements(sql: &str) -> Vec<String> {
    let mut cleaned = String::new();
    for line in sql.lines() {
        let code = match line.find("--") {
            Some(pos) => &line[..pos],
            None => line,
        };
        let code = code.trim();
        if code.is_empty() {
            continue;
        }
        cleaned.push_str(code);
        cleaned.push(' ');
    }

    cleaned
        .split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[async_trait]
impl WorkflowStore for SqliteWorkflowStore {
    async fn insert(&self, record: NewWorkflowRecord) -> Result<WorkflowRecord, StoreError> {
        let id = Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().timestamp_millis();
        let result_json = serde_json::to_string(&record.result)?;

        sqlx::query(
            "INSERT INTO nexus_workflows (id, user_id, topic, result, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&record.user_id)
        .bind(&record.topic)
        .bind(&result_json)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        debug!(id = %id, user_id = %record.user_id, "Inserted workflow record");

        Ok(WorkflowRecord {
            id,
            user_id: record.user_id,
            topic: record.topic,
            result: record.result,
            created_at,
        })
    }

    async fn list_recent(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<WorkflowRecord>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, WorkflowRow>(
            "SELECT id, user_id, topic, result, created_at FROM nexus_workflows \
             WHERE user_id = ? ORDER BY created_at DESC, rowid DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        // A corrupt row is skipped rather than hiding the whole history
        let records = rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id.clone();
                match WorkflowRecord::try_from(row) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!(id = %id, error = %e, "Skipping undecodable workflow record");
                        None
                    }
                }
            })
            .collect();

        Ok(records)
    }

    async fn delete(&self, id: &str, user_id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM nexus_workflows WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        debug!(
            id = %id,
            user_id = %user_id,
            rows_affected = result.rows_affected(),
            "Deleted workflow record"
        );
        Ok(result.rows_affected())
    }
}
