//! Provider clients for LLM chat-completion APIs.
//!
//! The orchestration core depends only on the [`Provider`] trait; concrete
//! adapters wrap each provider's REST surface and authentication.

pub mod openai;
pub mod openrouter;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Host, ProviderConfig};
use crate::error::{Result, TransportError};

/// One chat-completion request against a named model.
///
/// Implementations must be `Send + Sync`; the dispatcher shares one client
/// across all workers. Transport failures (network, auth, rate limits,
/// non-2xx) are reported as [`TransportError`] and are retryable by the
/// caller; a returned string may still fail schema validation downstream.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &'static str;

    /// Send a rendered prompt pair and return the raw completion text.
    async fn submit(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        model: &str,
    ) -> std::result::Result<String, TransportError>;
}

/// Build the configured provider client, pulling API keys from the
/// environment.
pub fn from_config(config: &ProviderConfig) -> Result<Arc<dyn Provider>> {
    let provider: Arc<dyn Provider> = match config.host {
        Host::OpenRouter => Arc::new(openrouter::OpenRouterClient::from_env(config)?),
        Host::OpenAi => Arc::new(openai::OpenAiClient::from_env(config)?),
    };
    Ok(provider)
}
