use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reader_common::error::{CommonError, SearchError};
use serde_json::json;

pub const SEARCH_FAILED_MESSAGE: &str = "搜索失败，请稍后重试";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "方法不允许";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("config error: {0}")]
    Config(String),
}

/// Errors returned from HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("method not allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Search(#[from] SearchError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                json!({ "message": METHOD_NOT_ALLOWED_MESSAGE }),
            ),
            ApiError::Search(e) if e.is_client_error() => {
                (StatusCode::BAD_REQUEST, json!({ "message": e.to_string() }))
            }
            ApiError::Search(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "message": SEARCH_FAILED_MESSAGE, "error": e.to_string() }),
            ),
        };

        // Server faults are already logged in full where they were raised.
        if status.is_server_error() {
            tracing::debug!(status = status.as_u16(), error = %self, "search failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "request rejected");
        }

        (status, Json(body)).into_response()
    }
}
