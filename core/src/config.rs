//! Client configuration: base path and the two timeout budgets.

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Budget for login, listing, batch trigger and check calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Budget for record generation, which waits on a multi-step backend workflow.
pub const DEFAULT_GENERATE_TIMEOUT: Duration = Duration::from_secs(300);

pub const ENV_BASE_URL: &str = "RIDING_API_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "RIDING_API_TIMEOUT_SECS";
pub const ENV_GENERATE_TIMEOUT_SECS: &str = "RIDING_API_GENERATE_TIMEOUT_SECS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a whole number of seconds, got {value:?}")]
    InvalidSeconds { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub generate_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            generate_timeout: DEFAULT_GENERATE_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Read the configuration from the environment, loading `.env` first
    /// when one exists. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Missing .env is fine.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            config.base_url = base_url;
        }
        if let Some(timeout) = seconds(&lookup, ENV_TIMEOUT_SECS)? {
            config.timeout = timeout;
        }
        if let Some(timeout) = seconds(&lookup, ENV_GENERATE_TIMEOUT_SECS)? {
            config.generate_timeout = timeout;
        }
        Ok(config)
    }
}

fn seconds<F>(lookup: &F, var: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|_| ConfigError::InvalidSeconds { var, value }),
    }
}
