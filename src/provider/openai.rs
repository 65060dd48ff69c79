//! OpenAI chat-completions client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;
use crate::error::{Result, TransportError};
use crate::provider::Provider;

/// OpenAI Chat Completions API endpoint.
const API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI API client implementing the [`Provider`] trait.
#[derive(Debug)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    organization: Option<String>,
    temperature: f64,
    max_tokens: u32,
}

impl OpenAiClient {
    /// Create a client with explicit credentials.
    #[must_use]
    pub fn new(
        api_key: impl Into<String>,
        organization: Option<String>,
        temperature: f64,
        max_tokens: u32,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            organization,
            temperature,
            max_tokens,
        }
    }

    /// Create a client from `OPENAI_API_KEY` (and optionally
    /// `OPENAI_ORG_ID`).
    ///
    /// # Errors
    ///
    /// Returns an error if `OPENAI_API_KEY` is not set.
    pub fn from_env(config: &ProviderConfig) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| TransportError::MissingApiKey {
                var: "OPENAI_API_KEY",
            })?;
        let organization = std::env::var("OPENAI_ORG_ID").ok();
        Ok(Self::new(
            api_key,
            organization,
            config.temperature,
            config.max_tokens,
        ))
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

/// Model identifiers arrive namespaced (`openai/gpt-4o`); the OpenAI API
/// itself wants the bare name.
fn strip_namespace(model: &str) -> &str {
    model.strip_prefix("openai/").unwrap_or(model)
}

#[async_trait]
impl Provider for OpenAiClient {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn submit(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        model: &str,
    ) -> std::result::Result<String, TransportError> {
        let request = Request {
            model: strip_namespace(model).to_string(),
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
            .post(API_URL)
            .bearer_auth(&self.api_key)
            .json(&request);
        if let Some(org) = &self.organization {
            builder = builder.header("OpenAI-Organization", org);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serialization() {
        let request = Request {
            model: "gpt-4o".to_string(),
            max_tokens: 1024,
            temperature: 0.0,
            top_p: 0,
            messages: vec![
                Message {
                    role: "system",
                    content: "You classify microbes.".to_string(),
                },
                Message {
                    role: "user",
                    content: "Classify Escherichia coli.".to_string(),
                },
            ],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["max_tokens"], 1024);
        assert_eq!(json["top_p"], 0);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
    }

    #[test]
    fn response_deserialization() {
        let json = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "model": "gpt-4o",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "{\"motility\": \"TRUE\"}"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 8, "total_tokens": 18}
        }"#;

        let response: Response = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices[0].message.content, r#"{"motility": "TRUE"}"#);
    }

    #[test]
    fn namespace_prefix_is_stripped() {
        assert_eq!(strip_namespace("openai/chatgpt-4o-latest"), "chatgpt-4o-latest");
        assert_eq!(strip_namespace("gpt-4o-mini"), "gpt-4o-mini");
    }

    #[test]
    fn api_url_is_valid() {
        assert!(API_URL.starts_with("https://"));
        assert!(API_URL.contains("/v1/chat/completions"));
    }
}
