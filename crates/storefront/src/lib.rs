//! Botica storefront library.
//!
//! Server-rendered pharmacy storefront over three remote HTTP services:
//! auth, product catalog, and the purchase ledger. Exposed as a library
//! so the router can be driven directly from tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod search;
pub mod services;
pub mod state;

use axum::{Router, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not call the backends.
async fn health() -> &'static str {
    "ok"
}

/// Build the complete application router.
///
/// Routes, static file service, session layer, and request tracing.
/// `main` binds this to a listener; tests drive it directly.
#[must_use]
pub fn build_app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes(state.clone()))
        .nest_service("/static", ServeDir::new("crates/storefront/static"))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
