//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults. `main` loads a `.env` file (if present) before
//! calling [`Config::from_env`].

use std::env;
use std::time::Duration;

/// Origins allowed by CORS when `CORS_ALLOWED_ORIGINS` is not set
pub const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Language-model provider configuration
    pub model: ModelConfig,
    /// Persistence configuration
    pub persistence: PersistenceConfig,
    /// Authentication configuration
    pub auth: AuthConfig,
    /// Workflow execution configuration
    pub workflow: WorkflowSettings,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
    /// Origins allowed to call the API from a browser
    pub cors_allowed_origins: Vec<String>,
    /// Maximum topic length in characters
    pub max_topic_length: usize,
}

/// Language-model provider configuration
#[derive(Clone)]
pub struct ModelConfig {
    /// Provider API key (may be empty; calls then fail with a typed error)
    pub api_key: String,
    /// Base URL of an OpenAI-compatible API, without trailing slash
    pub base_url: String,
    /// Model name sent with every request
    pub model: String,
    /// HTTP client timeout in seconds
    pub timeout_secs: u64,
}

// Hand-written so the API key never reaches the logs.
impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key_set", &!self.api_key.is_empty())
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Persistence configuration
#[derive(Debug, Clone, Default)]
pub struct PersistenceConfig {
    /// SQLite database file. `None` runs the server without persistence.
    pub database_path: Option<String>,
}

/// Authentication configuration
#[derive(Clone, Default)]
pub struct AuthConfig {
    /// Shared HS256 secret for bearer tokens
    pub jwt_secret: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret_set", &self.jwt_secret.is_some())
            .finish()
    }
}

/// Knobs for a single workflow run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSettings {
    /// Planned tasks beyond this count are dropped before fan-out
    pub max_planned_tasks: usize,
    /// Maximum agent calls in flight per workflow (`None` = unbounded)
    pub max_concurrent_agents: Option<usize>,
    /// Deadline for a single agent call (`None` = no deadline)
    pub agent_timeout: Option<Duration>,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            max_planned_tasks: 10,
            max_concurrent_agents: None,
            agent_timeout: Some(Duration::from_secs(120)),
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let model_defaults = ModelConfig::default();
        let workflow_defaults = WorkflowSettings::default();

        Self {
            server: ServerConfig {
                port: parse_var("PORT").unwrap_or(8000),
                host: non_empty_var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
                cors_allowed_origins: non_empty_var("CORS_ALLOWED_ORIGINS")
                    .map(|raw| parse_origins(&raw))
                    .unwrap_or_else(|| {
                        DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect()
                    }),
                max_topic_length: parse_var("MAX_TOPIC_LENGTH")
                    .filter(|n| *n > 0)
                    .unwrap_or(10_000),
            },
            model: ModelConfig {
                api_key: non_empty_var("OPENAI_API_KEY").unwrap_or_default(),
                base_url: non_empty_var("OPENAI_BASE_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or(model_defaults.base_url),
                model: non_empty_var("OPENAI_MODEL").unwrap_or(model_defaults.model),
                timeout_secs: parse_var("MODEL_TIMEOUT_SECS")
                    .filter(|n| *n > 0)
                    .unwrap_or(model_defaults.timeout_secs),
            },
            persistence: PersistenceConfig {
                database_path: non_empty_var("DATABASE_PATH"),
            },
            auth: AuthConfig {
                jwt_secret: non_empty_var("JWT_SECRET")
                    .or_else(|| non_empty_var("SUPABASE_JWT_SECRET")),
            },
            workflow: WorkflowSettings {
                max_planned_tasks: parse_var("MAX_PLANNED_TASKS")
                    .filter(|n| *n > 0)
                    .unwrap_or(workflow_defaults.max_planned_tasks),
                max_concurrent_agents: parse_var("MAX_CONCURRENT_AGENTS").filter(|n| *n > 0),
                agent_timeout: match parse_var::<u64>("AGENT_TIMEOUT_SECS") {
                    Some(0) => None,
                    Some(secs) => Some(Duration::from_secs(secs)),
                    None => workflow_defaults.agent_timeout,
                },
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    non_empty_var(key).and_then(|v| v.parse().ok())
}

/// Split a comma-separated origin list, dropping blanks
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().trim_end_matches('/').to_string())
        .filter(|o| !o.is_empty())
        .collect()
}
