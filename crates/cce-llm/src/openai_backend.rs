//! Live HTTP backend (OpenAI-compatible chat completions)
//!
//! Sends the system/user prompt pair with a JSON-object response format
//! and parses the reply through the loose-field boundary adapter. A
//! malformed (non-JSON-object) reply degrades to a fallback record with
//! the raw text as caption; it never fails the pipeline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::http_client::HttpClient;
use crate::normalize::parse_backend_json;
use crate::types::{BackendMode, GenerationBackend, GenerationError, GenerationRequest, RawFields};

/// Environment variable holding the backend credential; its presence is
/// the live/stub switch for the whole run.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Optional base-URL override, useful for proxies and tests.
pub const BASE_URL_ENV: &str = "CCE_OPENAI_BASE_URL";

/// Optional model override.
pub const MODEL_ENV: &str = "CCE_OPENAI_MODEL";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TEMPERATURE: f32 = 0.4;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Live generation backend.
pub struct OpenAiBackend {
    client: HttpClient,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    timeout: Duration,
}

impl OpenAiBackend {
    /// Create a new live backend.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Misconfiguration` if the HTTP client
    /// cannot be constructed.
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        model: Option<String>,
    ) -> Result<Self, GenerationError> {
        Ok(Self {
            client: HttpClient::new()?,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Create a live backend from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Misconfiguration` if the credential is
    /// absent or the HTTP client cannot be constructed.
    pub fn from_env() -> Result<Self, GenerationError> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            GenerationError::Misconfiguration(format!(
                "API key not found in environment variable '{API_KEY_ENV}'"
            ))
        })?;
        Self::new(
            api_key,
            std::env::var(BASE_URL_ENV).ok(),
            std::env::var(MODEL_ENV).ok(),
        )
    }
}

#[async_trait]
impl GenerationBackend for OpenAiBackend {
    fn mode(&self) -> BackendMode {
        BackendMode::Live
    }

    async fn generate(&self, req: &GenerationRequest) -> Result<RawFields, GenerationError> {
        debug!(
            model = %self.model,
            temperature = self.temperature,
            timeout_secs = self.timeout.as_secs(),
            "invoking live backend"
        );

        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: req.system.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: req.user.clone(),
                },
            ],
            temperature: self.temperature,
            response_format: ResponseFormat {
                kind: "json_object".to_string(),
            },
        };

        let request = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body);

        let response = self
            .client
            .execute_with_retry(request, self.timeout, "openai")
            .await?;

        let response_body: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Transport(format!("failed to parse response: {e}")))?;

        let raw = response_body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_else(|| "{}".to_string());

        Ok(parse_backend_json(&raw))
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_defaults_when_unset() {
        let backend =
            OpenAiBackend::new("test-key".to_string(), None, None).expect("backend builds");
        assert_eq!(backend.base_url, DEFAULT_BASE_URL);
        assert_eq!(backend.model, DEFAULT_MODEL);
        assert_eq!(backend.mode(), BackendMode::Live);
    }

    #[test]
    fn new_honors_overrides() {
        let backend = OpenAiBackend::new(
            "test-key".to_string(),
            Some("http://localhost:8080/v1/chat".to_string()),
            Some("test-model".to_string()),
        )
        .expect("backend builds");
        assert_eq!(backend.base_url, "http://localhost:8080/v1/chat");
        assert_eq!(backend.model, "test-model");
    }
}
