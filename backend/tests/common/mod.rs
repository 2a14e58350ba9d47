//! Shared helpers for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use nexus_backend::gateway::{GatewayError, ModelGateway};
use nexus_backend::orchestrator::planner::PLANNER_SYSTEM_PROMPT;
use nexus_backend::store::{SqliteWorkflowStore, WorkflowStore};
use std::sync::Arc;
use tempfile::TempDir;

pub const JWT_SECRET: &str = "integration-secret";

/// Gateway with a fixed planner answer; agents echo their subtask
pub struct StubGateway {
    pub plan: Result<String, GatewayError>,
}

impl StubGateway {
    pub fn planning(plan: &str) -> Arc<dyn ModelGateway> {
        Arc::new(Self {
            plan: Ok(plan.to_string()),
        })
    }
}

#[async_trait]
impl ModelGateway for StubGateway {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, GatewayError> {
        if system_prompt == PLANNER_SYSTEM_PROMPT {
            self.plan.clone()
        } else {
            Ok(format!("report on {}", user_prompt))
        }
    }
}

/// Fresh SQLite store in a temp dir (keep the dir alive for the test)
pub async fn sqlite_store() -> (Arc<dyn WorkflowStore>, TempDir) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nexus.db");
    let store = SqliteWorkflowStore::new(path.to_str().unwrap())
        .await
        .unwrap();
    (Arc::new(store), dir)
}

/// HS256 token for `sub`, valid for an hour
pub fn token_for(sub: &str) -> String {
    let claims = serde_json::json!({
        "sub": sub,
        "exp": chrono::Utc::now().timestamp() + 3600,
        "aud": "authenticated",
    });
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}
