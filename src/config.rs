//! Configuration management for casewright.
//!
//! Configuration can be set via environment variables:
//! - `API_KEY` - Required. Key for the chat-completions endpoint.
//! - `BASE_URL` - Optional. OpenAI-compatible endpoint root. Defaults to `https://api.openai.com/v1`.
//! - `MODEL_NAME` - Optional. Model identifier. Defaults to `gpt-4o-mini`.
//! - `RETRY_TIMES` - Optional. Validation-retry budget. Defaults to `3`.
//! - `RETRY_DELAY_MS` - Optional. Delay between validation retries. Defaults to `1000`.
//! - `OUTPUT_DIR` - Optional. Directory for generated spec files. Defaults to `e2e`.
//!
//! The config is constructed once at process start and passed into each
//! component constructor; core logic never reads the environment itself.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the model service
    pub api_key: String,

    /// OpenAI-compatible endpoint root
    pub base_url: String,

    /// Model identifier
    pub model_name: String,

    /// Validation-retry budget (retries, not total calls)
    pub retry_times: u32,

    /// Fixed delay between validation retries
    pub retry_delay: Duration,

    /// Directory generated spec files are written to
    pub output_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `API_KEY` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("API_KEY".to_string()))?;

        let base_url = std::env::var("BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());

        let model_name = std::env::var("MODEL_NAME").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let retry_times = std::env::var("RETRY_TIMES")
            .unwrap_or_else(|_| "3".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("RETRY_TIMES".to_string(), format!("{}", e)))?;

        let retry_delay_ms: u64 = std::env::var("RETRY_DELAY_MS")
            .unwrap_or_else(|_| "1000".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("RETRY_DELAY_MS".to_string(), format!("{}", e))
            })?;

        let output_dir = std::env::var("OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("e2e"));

        Ok(Self {
            api_key,
            base_url,
            model_name,
            retry_times,
            retry_delay: Duration::from_millis(retry_delay_ms),
            output_dir,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(api_key: String, model_name: String) -> Self {
        Self {
            api_key,
            base_url: "https://api.openai.com/v1".to_string(),
            model_name,
            retry_times: 3,
            retry_delay: Duration::from_millis(1000),
            output_dir: PathBuf::from("e2e"),
        }
    }
}
