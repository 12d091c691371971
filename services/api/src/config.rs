//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// PostgreSQL connection string. The in-memory store is used when unset.
    pub database_url: Option<String>,
    pub log_level: Level,
    pub openai_api_key: Option<String>,
    pub recipe_model: String,
    pub vision_model: String,
    pub admin_username: String,
    /// Argon2 PHC string of the back-office password.
    pub admin_password_hash: String,
    /// Upper bound on a single call to the AI service.
    pub import_timeout: Duration,
    pub cors_origin: HeaderValue,
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Reads and parses a variable, falling back to `default` when it is unset.
fn parsed_or<T>(name: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = var_or(name, default);
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string()))
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server and Database Settings ---
        let bind_address = parsed_or::<SocketAddr>("BIND_ADDRESS", "0.0.0.0:3000")?;
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let log_level_str = var_or("RUST_LOG", "INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load AI Settings ---
        let openai_api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let recipe_model = var_or("RECIPE_MODEL", "gpt-4o-mini");
        let vision_model = var_or("VISION_MODEL", "gpt-4o");
        let import_timeout = Duration::from_secs(parsed_or::<u64>("IMPORT_TIMEOUT_SECS", "90")?);

        // --- Load Back-office Settings ---
        let admin_username = var_or("ADMIN_USERNAME", "admin");
        let admin_password_hash = std::env::var("ADMIN_PASSWORD_HASH")
            .map_err(|_| ConfigError::MissingVar("ADMIN_PASSWORD_HASH".to_string()))?;
        let cors_origin = parsed_or::<HeaderValue>("CORS_ORIGIN", "http://localhost:3000")?;

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            openai_api_key,
            recipe_model,
            vision_model,
            admin_username,
            admin_password_hash,
            import_timeout,
            cors_origin,
        })
    }
}
