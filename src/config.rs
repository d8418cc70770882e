//! Explicit configuration for the completion service.
//!
//! The credential is read from the environment exactly once, at construction,
//! and travels inside the config object from then on; nothing reads global
//! state at call time. Retry and timeout constants default to the production
//! values but stay overridable so test suites can shrink them.

use std::env;
use std::time::Duration;

use thiserror::Error;

/// Environment variable holding the completion-service credential.
pub const API_KEY_ENV: &str = "OPENAI_KEY";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingApiKey(&'static str),
}

/// Connection and retry settings for [`crate::completion::CompletionClient`].
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// Per-attempt timeout; an attempt exceeding it counts as failed.
    pub timeout_secs: u64,
    /// Total tries per query (initial attempt + retries), strictly sequential.
    pub max_attempts: u32,
    /// Fixed pause between failed attempts; no backoff, no jitter.
    pub retry_delay: Duration,
}

impl CompletionConfig {
    /// Production defaults with an explicit credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Production defaults with the credential taken from [`API_KEY_ENV`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var(API_KEY_ENV).map_err(|_| ConfigError::MissingApiKey(API_KEY_ENV))?;
        Ok(Self::new(api_key))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Default `RUST_LOG`-style filter when the environment sets none.
pub fn default_log_filter() -> String {
    "clinsight=info".to_string()
}
