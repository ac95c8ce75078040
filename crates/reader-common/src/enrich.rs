//! Optional enrichment strategy: two follow-up calls that expand a found book
//! into core-content and background material.
//!
//! The search path never calls this; it exists for callers that want the extra
//! material and have a second provider configured.
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::book::{BookContent, BookSummary};
use crate::error::{CommonError, EnrichError};
use crate::openai::{ChatBackend, ChatClient, ChatClientConfig, ChatCompletionRequest, Message};

pub const DEFAULT_ENRICHMENT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

#[async_trait]
pub trait BookEnricher: Send + Sync {
    async fn enrich(&self, book: &BookSummary) -> Result<BookContent, EnrichError>;
}

pub struct ChatEnricher {
    backend: Arc<dyn ChatBackend>,
    model: String,
}

impl ChatEnricher {
    pub fn new(backend: Arc<dyn ChatBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
        }
    }

    /// Build an enricher against the `OPENAI_*` provider settings; `OPENAI_MODEL`
    /// overrides the default model.
    pub fn from_env() -> Result<Self, CommonError> {
        let config = ChatClientConfig::from_env("OPENAI", DEFAULT_OPENAI_BASE_URL)?;
        let client = ChatClient::new(config)
            .map_err(|e| CommonError::Config(format!("failed to build OpenAI client: {e}")))?;
        let model = std::env::var("OPENAI_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENRICHMENT_MODEL.to_string());
        Ok(Self::new(Arc::new(client), model))
    }

    async fn ask(&self, section: &'static str, system: &str, user: String) -> Result<String, EnrichError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![Message::system(system), Message::user(user)],
            temperature: None,
            max_tokens: None,
        };
        let response = self.backend.chat_completions(request).await.inspect_err(|e| {
            error!(error = %e, section, "enrichment call failed");
        })?;
        response
            .first_text()
            .map(|s| s.trim().to_string())
            .ok_or(EnrichError::EmptyReply(section))
    }
}

#[async_trait]
impl BookEnricher for ChatEnricher {
    async fn enrich(&self, book: &BookSummary) -> Result<BookContent, EnrichError> {
        let core_content = self
            .ask(
                "core_content",
                "你是一个专业的图书内容分析师",
                format!("请提取《{}》的核心内容要点", book.title),
            )
            .await?;

        let background_info = self
            .ask(
                "background",
                "你是一个专业的图书背景研究专家",
                format!("请提供《{}》的创作背景和相关资料", book.title),
            )
            .await?;

        info!(title = %book.title, model = %self.model, "book enrichment complete");
        Ok(BookContent {
            core_content,
            background_info,
        })
    }
}
