//! API Handlers
//!
//! HTTP request handlers mapping request paths onto index queries.

use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

use crate::config::IndexConfig;
use crate::error::Result;
use crate::index::Index;

/// Content type of every response body.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Fixed body sent for any path that cannot be served.
pub const BODY_NOT_FOUND: &[u8] = br#"{"code":404}"#;

/// Application state shared across all handlers.
///
/// Contains the index behind an Arc; the index synchronizes its own cache.
#[derive(Clone)]
pub struct AppState {
    pub index: Arc<Index>,
}

impl AppState {
    /// Creates a new AppState around an existing index.
    pub fn new(index: Index) -> Self {
        Self {
            index: Arc::new(index),
        }
    }

    /// Creates a new AppState from engine configuration.
    pub fn from_config(config: IndexConfig) -> Result<Self> {
        Ok(Self::new(Index::new(config)?))
    }
}

/// Handler for GET /
pub async fn root_handler(State(state): State<AppState>) -> Response {
    query(state, String::new()).await
}

/// Handler for GET /*path
///
/// The wildcard arrives percent-decoded and without its leading `/`. A path
/// that does not decode to UTF-8 cannot name anything served, so it gets
/// the same 404 as any other unserved path.
pub async fn query_handler(
    State(state): State<AppState>,
    path: std::result::Result<Path<String>, PathRejection>,
) -> Response {
    match path {
        Ok(Path(path)) => query(state, path).await,
        Err(rejection) => {
            debug!("Undecodable request path: {}", rejection);
            not_found()
        }
    }
}

/// Runs the query off the async workers, since it may block on the filesystem.
async fn query(state: AppState, path: String) -> Response {
    let index = Arc::clone(&state.index);
    let result = tokio::task::spawn_blocking(move || index.query_bytes(&path)).await;

    match result {
        Ok(Some(body)) => json_response(StatusCode::OK, body),
        Ok(None) => not_found(),
        Err(e) => {
            error!("Query task failed: {}", e);
            not_found()
        }
    }
}

fn json_response(status: StatusCode, body: Vec<u8>) -> Response {
    (status, [(header::CONTENT_TYPE, CONTENT_TYPE_JSON)], body).into_response()
}

fn not_found() -> Response {
    json_response(StatusCode::NOT_FOUND, BODY_NOT_FOUND.to_vec())
}
