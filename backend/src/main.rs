//! Nexus Backend
//!
//! REST API that turns a topic into a multi-agent research report.
//! Wires the model gateway, the optional SQLite store and the orchestrator
//! together once, then serves requests until Ctrl+C / SIGTERM.

use axum::{extract::Request, middleware::Next, response::Response};
use nexus_backend::api;
use nexus_backend::config::Config;
use nexus_backend::gateway::{ModelGateway, OpenAiGateway};
use nexus_backend::orchestrator::WorkflowOrchestrator;
use nexus_backend::state::AppState;
use nexus_backend::store::{SqliteWorkflowStore, WorkflowStore};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, warn, Instrument};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Request ID middleware - adds unique ID to each request for tracing
async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    let response = next.run(request).instrument(span).await;

    let duration = start.elapsed();
    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}

/// Open the store if configured; on failure keep running without one
async fn open_store(config: &Config) -> Option<Arc<dyn WorkflowStore>> {
    let Some(path) = config.persistence.database_path.as_deref() else {
        info!("DATABASE_PATH not set, running without persistence");
        return None;
    };

    match SqliteWorkflowStore::new(path).await {
        Ok(store) => Some(Arc::new(store)),
        Err(e) => {
            warn!(error = %e, "Failed to open workflow store, running without persistence");
            None
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    info!("Configuration loaded: {:?}", config);

    if config.model.api_key.is_empty() {
        warn!("OPENAI_API_KEY is not set; every model call will fail");
    }
    if config.auth.jwt_secret.is_none() {
        warn!("JWT_SECRET is not set; authenticated endpoints will answer 500");
    }

    let openai = OpenAiGateway::new(&config.model)
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;
    info!(
        model = %openai.model(),
        base_url = %config.model.base_url,
        "Model gateway ready"
    );
    let gateway: Arc<dyn ModelGateway> = Arc::new(openai);
    let store = open_store(&config).await;
    let orchestrator = Arc::new(WorkflowOrchestrator::new(
        gateway,
        store,
        config.workflow.clone(),
    ));
    info!(
        persistence = orchestrator.has_store(),
        settings = ?orchestrator.settings(),
        "Orchestrator ready"
    );

    let state = AppState::new(
        orchestrator,
        config.auth.clone(),
        config.server.max_topic_length,
    );

    let app = api::router(state)
        // Middleware (order matters - request_id should be first)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(api::cors_layer(&config.server.cors_allowed_origins));

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid server address: {}", e))?;

    info!("🚀 Server running on http://{}", addr);
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Handle graceful shutdown signals (Ctrl+C, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}
