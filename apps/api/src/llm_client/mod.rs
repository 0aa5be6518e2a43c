/// LLM client: the single point of entry for all language-model calls.
///
/// No other module may call the completion API directly; enrichment code
/// goes through the `TextCompleter` trait, which `LlmClient` implements.
///
/// Model: gpt-4o-mini (hardcoded so every summary is produced the same way)
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;
pub mod retry;

use retry::RetryPolicy;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// The model used for all completions.
pub const MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {attempts} attempts")]
    RateLimited { attempts: u32 },

    #[error("No API key configured for the language model")]
    MissingApiKey,

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    fn is_rate_limit(&self) -> bool {
        matches!(self, LlmError::Api { status: 429, .. })
    }
}

/// A text-in, text-out completion backend.
///
/// Carried in `AppState` as `Arc<dyn TextCompleter>` so handlers never
/// depend on the HTTP client directly.
#[async_trait]
pub trait TextCompleter: Send + Sync {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        timeout: Duration,
    ) -> Result<String, LlmError>;

    /// Text to show when `complete` fails.
    fn fallback(&self) -> &str;

    /// Whether credentials are present. Informational only.
    fn is_configured(&self) -> bool;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Text of the first choice, if it has any non-blank content.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Chat-completions client with a rate-limit retry policy.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    retry: RetryPolicy,
}

impl LlmClient {
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        retry: RetryPolicy,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().build()?,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry,
        })
    }

    /// One HTTP round trip. 429 comes back as `LlmError::Api` so the retry
    /// policy can recognise it.
    async fn send_once(
        &self,
        api_key: &str,
        request: &ChatRequest<'_>,
        timeout: Duration,
    ) -> Result<String, LlmError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .timeout(timeout)
            .json(request)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status.as_u16() == 429 {
                warn!("LLM API returned {}: {}", status, body);
            }
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response.json().await?;

        if let Some(usage) = &chat.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        chat.text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

#[async_trait]
impl TextCompleter for LlmClient {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        timeout: Duration,
    ) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let request = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        self.retry
            .run(
                || self.send_once(api_key, &request, timeout),
                LlmError::is_rate_limit,
            )
            .await
            .map_err(|e| {
                if e.is_rate_limit() {
                    LlmError::RateLimited {
                        attempts: self.retry.max_attempts.max(1),
                    }
                } else {
                    e
                }
            })
    }

    fn fallback(&self) -> &str {
        &self.retry.fallback
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_from_first_choice() {
        let raw = r#"{
            "choices": [{"message": {"role": "assistant", "content": "Bel Jansen Bouw vandaag."}}],
            "usage": {"prompt_tokens": 120, "completion_tokens": 8, "total_tokens": 128}
        }"#;
        let response: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.text(), Some("Bel Jansen Bouw vandaag."));
    }

    #[test]
    fn test_blank_content_is_none() {
        let raw = r#"{"choices": [{"message": {"content": "   "}}]}"#;
        let response: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.text(), None);

        let raw = r#"{"choices": []}"#;
        let response: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.text(), None);
    }

    #[test]
    fn test_only_429_counts_as_rate_limit() {
        let limited = LlmError::Api {
            status: 429,
            message: "slow down".into(),
        };
        let server = LlmError::Api {
            status: 500,
            message: "oops".into(),
        };
        assert!(limited.is_rate_limit());
        assert!(!server.is_rate_limit());
        assert!(!LlmError::EmptyContent.is_rate_limit());
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_network() {
        let client = LlmClient::new(None, DEFAULT_BASE_URL, RetryPolicy::default()).unwrap();
        assert!(!client.is_configured());
        let result = client
            .complete("system", "prompt", Duration::from_secs(1))
            .await;
        assert!(matches!(result, Err(LlmError::MissingApiKey)));
        assert_eq!(client.fallback(), retry::DEFAULT_FALLBACK);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client =
            LlmClient::new(Some("k".into()), "http://localhost:9999/v1/", RetryPolicy::default())
                .unwrap();
        assert_eq!(client.base_url, "http://localhost:9999/v1");
    }
}
