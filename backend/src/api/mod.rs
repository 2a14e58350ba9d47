//! API module
//!
//! Contains HTTP request handlers and the router that wires them up.

pub mod workflows;

use crate::state::AppState;
use axum::{
    http::HeaderValue,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "healthy" when the process answers
    pub status: String,
    /// Crate version
    pub version: String,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build the API router (middleware layers are added in `main`)
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/workflow", post(workflows::create_workflow))
        .route("/api/workflow/:id", delete(workflows::delete_workflow))
        .route("/api/history", get(workflows::get_history))
        .with_state(state)
}

/// CORS for the browser frontend
///
/// Credentials are allowed, so methods and headers mirror the preflight
/// request instead of using a wildcard.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
