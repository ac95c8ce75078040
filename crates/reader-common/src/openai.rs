use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::CommonError;

/// Connection settings for an OpenAI-compatible chat-completion API.
#[derive(Clone)]
pub struct ChatClientConfig {
    pub base_url: String,
    pub api_key: String,
    /// Per-request timeout. `None` leaves reqwest's default (no timeout).
    pub timeout: Option<Duration>,
    pub max_error_body_bytes: usize,
}

impl ChatClientConfig {
    /// Load `{prefix}_API_KEY`, `{prefix}_BASE_URL`, `{prefix}_TIMEOUT_SECS` and
    /// `{prefix}_MAX_ERROR_BODY_BYTES` from the process environment.
    pub fn from_env(prefix: &str, default_base_url: &str) -> Result<Self, CommonError> {
        Self::from_lookup(prefix, default_base_url, |key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(prefix: &str, default_base_url: &str, lookup: F) -> Result<Self, CommonError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(&format!("{prefix}_{name}"))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = var("API_KEY").ok_or_else(|| {
            CommonError::Config(format!("{prefix}_API_KEY environment variable is required"))
        })?;

        let base_url = var("BASE_URL").unwrap_or_else(|| default_base_url.to_string());

        let timeout = var("TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|&n| n > 0)
            .map(Duration::from_secs);

        let max_error_body_bytes = var("MAX_ERROR_BODY_BYTES")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(8 * 1024);

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout,
            max_error_body_bytes,
        })
    }
}

impl fmt::Debug for ChatClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("max_error_body_bytes", &self.max_error_body_bytes)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChatClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid response JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("upstream returned error: status={status} message={message}")]
    Upstream { status: StatusCode, message: String },

    #[error("upstream returned non-JSON error: status={status} body={body}")]
    UpstreamBody { status: StatusCode, body: String },
}

impl ChatClientError {
    /// HTTP status reported by the upstream, if the request got that far.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ChatClientError::Upstream { status, .. } | ChatClientError::UpstreamBody { status, .. } => {
                Some(*status)
            }
            ChatClientError::Request(e) => e.status(),
            ChatClientError::InvalidJson(_) => None,
        }
    }
}

/// Anything that can answer a chat-completion request.
///
/// The HTTP client implements this; tests substitute scripted backends.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat_completions(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ChatClientError>;
}

#[derive(Clone)]
pub struct ChatClient {
    config: ChatClientConfig,
    http: reqwest::Client,
}

impl ChatClient {
    pub fn new(config: ChatClientConfig) -> Result<Self, ChatClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("ai-reader/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { config, http })
    }

    async fn parse_json_response<T: for<'de> Deserialize<'de>>(
        resp: reqwest::Response,
        max_error_body_bytes: usize,
    ) -> Result<T, ChatClientError> {
        if resp.status().is_success() {
            let bytes = resp.bytes().await?;
            return Ok(serde_json::from_slice::<T>(&bytes)?);
        }
        Err(Self::to_upstream_error(resp, max_error_body_bytes).await)
    }

    async fn to_upstream_error(resp: reqwest::Response, max_error_body_bytes: usize) -> ChatClientError {
        let status = resp.status();
        let body = read_limited_text(resp, max_error_body_bytes).await;
        if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(&body) {
            let message = parsed
                .error
                .message
                .unwrap_or_else(|| "unknown upstream error".to_string());
            return ChatClientError::Upstream { status, message };
        }
        ChatClientError::UpstreamBody { status, body }
    }
}

#[async_trait]
impl ChatBackend for ChatClient {
    async fn chat_completions(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ChatClientError> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let mut builder = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request);
        if let Some(timeout) = self.config.timeout {
            builder = builder.timeout(timeout);
        }
        let resp = builder.send().await?;
        Self::parse_json_response(resp, self.config.max_error_body_bytes).await
    }
}

async fn read_limited_text(resp: reqwest::Response, max_bytes: usize) -> String {
    match resp.bytes().await {
        Ok(b) => {
            let end = b.len().min(max_bytes);
            String::from_utf8_lossy(&b[..end]).to_string()
        }
        Err(e) => {
            warn!(error = %e, "failed to read upstream error body");
            "<failed to read error body>".to_string()
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorObject,
}

#[derive(Debug, Deserialize)]
struct ErrorObject {
    message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChatCompletionChoice>,
    pub usage: Option<ChatCompletionUsage>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if it carries any non-blank content.
    pub fn first_text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionChoice {
    pub index: Option<u32>,
    pub message: ChatCompletionMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionMessage {
    pub role: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionUsage {
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
    pub total_tokens: Option<u64>,
}
