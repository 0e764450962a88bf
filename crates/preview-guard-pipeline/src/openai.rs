//! OpenAI-compatible chat completions transformer.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::TransformerError;
use crate::transformer::{CodeTransformer, CompletionStatus, TransformOutput};

/// Connection settings for the transformation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformerConfig {
    /// Base URL without the `/v1/...` suffix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Transport timeout for a single call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}
fn default_max_tokens() -> u32 {
    8000
}
fn default_temperature() -> f32 {
    0.2
}
fn default_timeout_secs() -> u64 {
    120
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl TransformerConfig {
    /// Full chat completions endpoint.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.base_url.trim().trim_end_matches('/')
        )
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Transformer backed by an OpenAI-compatible `/v1/chat/completions` API.
#[derive(Debug, Clone)]
pub struct OpenAiTransformer {
    client: reqwest::Client,
    config: TransformerConfig,
    api_key: String,
}

impl OpenAiTransformer {
    /// Build a transformer, reading the API key from the configured variable.
    pub fn from_env(config: TransformerConfig) -> Result<Self, TransformerError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| TransformerError::MissingApiKey(config.api_key_env.clone()))?;

        Self::new(config, api_key)
    }

    /// Build a transformer with an explicit API key.
    pub fn new(config: TransformerConfig, api_key: String) -> Result<Self, TransformerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    pub fn config(&self) -> &TransformerConfig {
        &self.config
    }
}

/// Pull the text and completion status out of a chat completions body.
fn parse_response(bytes: &[u8]) -> Result<TransformOutput, TransformerError> {
    let response: ChatResponse =
        serde_json::from_slice(bytes).map_err(|e| TransformerError::Decode(e.to_string()))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| TransformerError::Decode("response has no choices".to_string()))?;

    let text = choice
        .message
        .and_then(|m| m.content)
        .unwrap_or_default();

    Ok(TransformOutput {
        text,
        completion: CompletionStatus::from_reason(choice.finish_reason.as_deref()),
    })
}

#[async_trait]
impl CodeTransformer for OpenAiTransformer {
    async fn transform(
        &self,
        instruction: &str,
        user_message: &str,
    ) -> Result<TransformOutput, TransformerError> {
        let body = json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": instruction},
                {"role": "user", "content": user_message},
            ],
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        });

        let url = self.config.endpoint();
        tracing::debug!("POST {} (model {})", url, self.config.model);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            return Err(TransformerError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).chars().take(500).collect(),
            });
        }

        parse_response(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_endpoint_from_base_url() {
        let config = TransformerConfig {
            base_url: "http://localhost:4000/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.endpoint(), "http://localhost:4000/v1/chat/completions");
    }

    #[test]
    fn parses_completion() {
        let body = br#"{"choices":[{"message":{"role":"assistant","content":"function Preview() {}"},"finish_reason":"stop"}]}"#;
        let output = parse_response(body).unwrap();
        assert_eq!(output.text, "function Preview() {}");
        assert_eq!(output.completion, CompletionStatus::Stop);
    }

    #[test]
    fn parses_truncated_completion() {
        let body = br#"{"choices":[{"message":{"content":"function Prev"},"finish_reason":"length"}]}"#;
        let output = parse_response(body).unwrap();
        assert!(output.completion.is_truncated());
    }

    #[test]
    fn missing_content_is_empty_text() {
        let body = br#"{"choices":[{"message":{"content":null},"finish_reason":"stop"}]}"#;
        assert_eq!(parse_response(body).unwrap().text, "");
    }

    #[test]
    fn rejects_bodies_without_choices() {
        assert!(matches!(
            parse_response(br#"{"choices":[]}"#),
            Err(TransformerError::Decode(_))
        ));
        assert!(matches!(
            parse_response(b"not json"),
            Err(TransformerError::Decode(_))
        ));
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config: TransformerConfig = serde_json::from_str(r#"{"model":"gpt-4.1"}"#).unwrap();
        assert_eq!(config.model, "gpt-4.1");
        assert_eq!(config.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.timeout_secs, 120);
    }
}
