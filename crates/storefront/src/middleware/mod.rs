//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. `TraceLayer` (request tracing)
//! 2. Session layer (tower-sessions with in-memory store)
//! 3. Session gate (`validate_session`) on protected routes only

pub mod auth;
pub mod session;

pub use auth::{RequireSession, current_user, evict_session, set_session_user, validate_session};
pub use session::create_session_layer;
