use crate::config::{Config, LlmSettings};
use crate::error::{DocumenterError, Result};
use crate::llm::TextGenerator;
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// API version sent with every request
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Client for the Anthropic Messages API
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    settings: LlmSettings,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicClient {
    /// Creates a client from the configuration; requires the Anthropic API key
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config.anthropic_api_key()?.to_string();
        Self::with_settings(api_key, config.llm.clone())
    }

    /// Creates a client with explicit credentials and settings
    pub fn with_settings(api_key: String, settings: LlmSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| DocumenterError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            settings,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.settings.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl TextGenerator for AnthropicClient {
    async fn generate(&self, prompt: &str, system: &str) -> Result<String> {
        debug!(
            "Sending {} prompt characters to {}",
            prompt.chars().count(),
            self.settings.model
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&json!({
                "model": self.settings.model,
                "max_tokens": self.settings.max_tokens,
                "temperature": self.settings.temperature,
                "system": system,
                "messages": [{
                    "role": "user",
                    "content": prompt
                }]
            }))
            .send()
            .await
            .map_err(|e| DocumenterError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(DocumenterError::RateLimitExceeded(
                "Anthropic API rate limit exceeded".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DocumenterError::LLM(format!(
                "Anthropic API returned {}: {}",
                status,
                body.trim()
            )));
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| DocumenterError::LLM(format!("Invalid response format: {}", e)))?;

        let text: String = body
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();

        if text.is_empty() {
            return Err(DocumenterError::LLM("Response contained no text".to_string()));
        }
        Ok(text)
    }

    fn name(&self) -> &str {
        &self.settings.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(base_url: &str) -> AnthropicClient {
        let settings = LlmSettings {
            base_url: base_url.to_string(),
            ..LlmSettings::default()
        };
        AnthropicClient::with_settings("sk-test".to_string(), settings).unwrap()
    }

    #[tokio::test]
    async fn test_request_shape_and_text_concatenation() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "sk-test")
            .match_header("anthropic-version", ANTHROPIC_VERSION)
            .match_body(Matcher::PartialJson(json!({
                "model": "claude-3-sonnet-20240229",
                "max_tokens": 4000,
                "system": "sys",
                "messages": [{"role": "user", "content": "hello"}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r###"{"content":[{"type":"text","text":"## FAQs\n"},{"type":"text","text":"Q: why?"}]}"###,
            )
            .create_async()
            .await;

        let text = client(&server.url()).generate("hello", "sys").await.unwrap();

        assert_eq!(text, "## FAQs\nQ: why?");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_llm_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/messages")
            .with_status(500)
            .with_body("internal")
            .create_async()
            .await;

        let err = client(&server.url()).generate("hello", "sys").await.unwrap_err();
        assert!(matches!(err, DocumenterError::LLM(_)));
        assert!(err.to_string().contains("internal"));
    }

    #[tokio::test]
    async fn test_rate_limit_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/messages")
            .with_status(429)
            .create_async()
            .await;

        let err = client(&server.url()).generate("hello", "sys").await.unwrap_err();
        assert!(matches!(err, DocumenterError::RateLimitExceeded(_)));
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let config = Config::default();
        let err = AnthropicClient::new(&config).err().unwrap();
        assert!(err.is_configuration());
    }
}
