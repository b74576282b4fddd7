//! API Module
//!
//! HTTP handlers and routing for the directory index.
//!
//! # Endpoints
//! - `GET /` - Root listing
//! - `GET /*path` - Listing or metadata for a path under the root
//!
//! Found paths answer `200` with the JSON response; anything else answers
//! `404` with the fixed body `{"code":404}`.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
