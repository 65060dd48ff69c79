//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file; API keys come only from
//! environment variables (`OPENROUTER_API_KEY`, `OPENAI_API_KEY`,
//! `OPENAI_ORG_ID`), never from the file. CLI flags override loaded
//! values after the fact.

use std::path::Path;

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{ConfigError, Result};

/// Supported provider hosts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Host {
    #[default]
    OpenRouter,
    OpenAi,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub run: RunSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Provider selection and request parameters shared by all tasks.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub host: Host,
    /// Base URL override, mainly for tests against a local stub server.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// `HTTP-Referer` header sent to OpenRouter.
    #[serde(default)]
    pub referer: Option<String>,
    /// `X-Title` header sent to OpenRouter.
    #[serde(default)]
    pub title: Option<String>,
}

fn default_temperature() -> f64 {
    0.0
}

fn default_max_tokens() -> u32 {
    2048
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            host: Host::default(),
            base_url: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            referer: None,
            title: None,
        }
    }
}

/// Bounded-retry policy for the resolve engine.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Attempt budget per task; transport and validation failures both
    /// consume attempts.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Base backoff between attempts; attempt n waits n times this.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
    /// Apply +/-50% random jitter to each backoff delay.
    #[serde(default = "default_true")]
    pub jitter: bool,
}

fn default_max_attempts() -> u32 {
    4
}

fn default_backoff_ms() -> u64 {
    500
}

const fn default_true() -> bool {
    true
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
            jitter: default_true(),
        }
    }
}

/// Run-level execution settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RunSettings {
    /// Bounded worker capacity for concurrent dispatch.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_workers() -> usize {
    1
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            workers: default_workers(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load and validate a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_attempts",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        if self.run.workers == 0 {
            return Err(ConfigError::InvalidValue {
                field: "workers",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        if !(0.0..=2.0).contains(&self.provider.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "temperature",
                reason: format!("{} is outside 0.0..=2.0", self.provider.temperature),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize the global tracing subscriber from `[logging]`.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}
