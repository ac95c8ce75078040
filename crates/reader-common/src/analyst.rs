use std::sync::Arc;

use tracing::{debug, error, info};

use crate::book::BookSummary;
use crate::error::SearchError;
use crate::normalize;
use crate::openai::ChatBackend;
use crate::prompt;

/// Looks a book up by title through one chat-completion call.
#[derive(Clone)]
pub struct BookAnalyst {
    backend: Arc<dyn ChatBackend>,
    model: String,
}

impl BookAnalyst {
    pub fn new(backend: Arc<dyn ChatBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Validate `title`, ask the model once, and normalize its reply.
    ///
    /// Blank titles are rejected before any upstream call. No retry is attempted.
    pub async fn analyze(&self, title: &str) -> Result<BookSummary, SearchError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(SearchError::InvalidQuery);
        }

        let request = prompt::analysis_request(&self.model, title);
        let response = self.backend.chat_completions(request).await.map_err(|e| {
            error!(error = %e, status = ?e.status(), model = %self.model, "chat completion failed");
            SearchError::from(e)
        })?;

        let Some(content) = response.first_text() else {
            error!(
                response_id = ?response.id,
                choices = response.choices.len(),
                "chat completion returned no content"
            );
            return Err(SearchError::EmptyReply);
        };
        debug!(reply = %content, "model reply received");

        let book = normalize::parse_reply(content)?;
        info!(
            query = %title,
            title = %book.title,
            id = %book.id,
            tokens = ?response.usage.as_ref().and_then(|u| u.total_tokens),
            "book analysis complete"
        );
        Ok(book)
    }
}
