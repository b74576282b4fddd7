//! API Routes
//!
//! Configures the Axum router for the directory index.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{query_handler, root_handler, AppState};

/// Creates the main router.
///
/// # Endpoints
/// - `GET /` - Listing of the index root
/// - `GET /*path` - Listing or metadata for any path under the root
///
/// # Middleware
/// - CORS: Allows any origin, the index is meant to be read by browsers
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/*path", get(query_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
