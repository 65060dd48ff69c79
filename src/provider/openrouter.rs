//! OpenRouter chat-completions client.
//!
//! OpenRouter exposes an OpenAI-compatible API that routes namespaced
//! model identifiers (`openai/gpt-4o`, `anthropic/claude-3-haiku`, ...)
//! to their upstream providers.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;
use crate::error::{Result, TransportError};
use crate::provider::Provider;

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// OpenRouter API client implementing the [`Provider`] trait.
#[derive(Debug)]
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    base_url: String,
    referer: Option<String>,
    title: Option<String>,
    temperature: f64,
    max_tokens: u32,
}

impl OpenRouterClient {
    #[must_use]
    pub fn new(api_key: impl Into<String>, config: &ProviderConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            referer: config.referer.clone(),
            title: config.title.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Create a client from the `OPENROUTER_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env(config: &ProviderConfig) -> Result<Self> {
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .map_err(|_| TransportError::MissingApiKey {
                var: "OPENROUTER_API_KEY",
            })?;
        Ok(Self::new(api_key, config))
    }
}

#[derive(Serialize)]
struct Request {
    model: String,
    max_tokens: u32,
    temperature: f64,
    top_p: u32,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct Response {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[async_trait]
impl Provider for OpenRouterClient {
    fn name(&self) -> &'static str {
        "openrouter"
    }

    async fn submit(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        model: &str,
    ) -> std::result::Result<String, TransportError> {
        let request = Request {
            model: model.to_string(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: 0,
            messages: vec![
                Message {
                    role: "system",
                    content: system_prompt.to_string(),
                },
                Message {
                    role: "user",
                    content: user_prompt.to_string(),
                },
            ],
        };

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request);
        if let Some(referer) = &self.referer {
            builder = builder.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.title {
            builder = builder.header("X-Title", title);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: Response = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(TransportError::EmptyCompletion)
    }
}
