//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Session token configuration.
    pub session: SessionConfig,
    /// Source-hosting API configuration.
    #[serde(default)]
    pub github: GithubConfig,
    /// Completion API configuration.
    #[serde(default)]
    pub completion: CompletionConfig,
    /// Login insights configuration.
    #[serde(default)]
    pub insights: InsightsConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Session token configuration.
///
/// The OAuth identity provider issues signed session tokens; the server only
/// verifies them with the shared secret and never runs the auth protocol
/// itself.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// HMAC secret shared with the identity provider.
    pub secret: String,
}

/// Source-hosting API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubConfig {
    /// API base URL.
    #[serde(default = "default_github_api_base")]
    pub api_base: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: default_github_api_base(),
        }
    }
}

/// Completion API configuration.
///
/// A missing `api_key` is not an error: question generation silently runs in
/// fallback-only mode.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionConfig {
    /// API key. Absent means fallback-only question generation.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model identifier.
    #[serde(default = "default_completion_model")]
    pub model: String,
    /// API base URL (OpenAI-compatible `/chat/completions`).
    #[serde(default = "default_completion_api_base")]
    pub api_base: String,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_completion_model(),
            api_base: default_completion_api_base(),
        }
    }
}

/// Login insights configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct InsightsConfig {
    /// IANA timezone used for the "today" day boundary.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

fn default_github_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_completion_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_completion_api_base() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `FORGEFEED_ENV`)
    /// 3. Environment variables with `FORGEFEED` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("FORGEFEED_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("FORGEFEED")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("FORGEFEED")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
