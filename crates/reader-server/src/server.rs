use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::Method,
    response::Html,
    routing::get,
    Json, Router,
};
use reader_common::analyst::BookAnalyst;
use reader_common::book::BookSummary;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::ApiError;

const INDEX_HTML: &str = include_str!("../static/index.html");
const BOOK_HTML: &str = include_str!("../static/book.html");

#[derive(Clone)]
pub struct AppState {
    analyst: Arc<BookAnalyst>,
}

pub fn router(analyst: BookAnalyst) -> Router {
    let state = AppState {
        analyst: Arc::new(analyst),
    };

    Router::new()
        .route("/", get(index_page))
        .route("/books/{id}", get(book_page))
        .route("/healthz", get(health_check))
        .route(
            "/api/books/search",
            get(search_books).fallback(method_not_allowed),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: Option<String>,
}

/// `GET /api/books/search?query=<title>`: one analysis, returned as a one-element array.
async fn search_books(
    method: Method,
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<BookSummary>>, ApiError> {
    // `get` also routes HEAD here; only GET may reach the upstream.
    if method != Method::GET {
        return Err(ApiError::MethodNotAllowed);
    }

    let query = match params {
        Ok(Query(params)) => params.query.unwrap_or_default(),
        Err(rejection) => {
            warn!(error = %rejection, "unreadable search query string");
            String::new()
        }
    };

    info!(query = %query, model = state.analyst.model(), "book search");
    let book = state.analyst.analyze(&query).await?;
    Ok(Json(vec![book]))
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Detail view placeholder. No store backs it, so it renders static markup only.
async fn book_page() -> Html<&'static str> {
    Html(BOOK_HTML)
}

async fn health_check() -> &'static str {
    "ok"
}
