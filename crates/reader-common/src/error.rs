//! Error types shared by the reader crates.
//!
//! `SearchError` carries the short, client-safe detail string in its `Display`;
//! full diagnostics (upstream bodies, raw model text) are logged where the error
//! is raised and never embedded here.
use crate::openai::ChatClientError;

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("config error: {0}")]
    Config(String),
}

/// Failures of a single book search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("请提供有效的书名")]
    InvalidQuery,

    #[error("API调用失败: {status}")]
    UpstreamStatus { status: u16 },

    #[error("API请求失败")]
    Transport(#[source] ChatClientError),

    #[error("AI 返回内容为空")]
    EmptyReply,

    #[error("AI 返回格式错误")]
    Malformed(#[source] Option<serde_json::Error>),

    #[error("返回数据缺少必要字段: {0}")]
    MissingField(&'static str),
}

impl SearchError {
    /// Client-input failures are the caller's fault; everything else is ours or upstream's.
    pub fn is_client_error(&self) -> bool {
        matches!(self, SearchError::InvalidQuery)
    }
}

impl From<ChatClientError> for SearchError {
    fn from(err: ChatClientError) -> Self {
        match &err {
            ChatClientError::Upstream { status, .. } | ChatClientError::UpstreamBody { status, .. } => {
                SearchError::UpstreamStatus {
                    status: status.as_u16(),
                }
            }
            _ => SearchError::Transport(err),
        }
    }
}

/// Failures of the optional enrichment flow.
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    #[error("enrichment request failed: {0}")]
    Client(#[from] ChatClientError),

    #[error("enrichment reply for {0} was empty")]
    EmptyReply(&'static str),
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn upstream_statuses_collapse_to_status_error() {
        let err: SearchError = ChatClientError::Upstream {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: "overloaded".to_string(),
        }
        .into();
        assert!(matches!(err, SearchError::UpstreamStatus { status: 503 }));
        assert_eq!(err.to_string(), "API调用失败: 503");
        assert!(!err.is_client_error());
    }

    #[test]
    fn decode_failures_are_transport_errors() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: SearchError = ChatClientError::InvalidJson(json_err).into();
        assert!(matches!(err, SearchError::Transport(_)));
    }

    #[test]
    fn malformed_and_upstream_details_differ() {
        let malformed = SearchError::Malformed(None).to_string();
        let upstream = SearchError::UpstreamStatus { status: 500 }.to_string();
        assert_ne!(malformed, upstream);
        assert_eq!(malformed, "AI 返回格式错误");
    }
}
