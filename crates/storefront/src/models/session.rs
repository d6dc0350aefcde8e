//! Session-related types.
//!
//! The session is the durable client-local storage of the storefront:
//! bearer token, user id, and the serialized cart live here, under the
//! same keys the views use to talk about them.

use serde::{Deserialize, Serialize};

/// Session-stored user identity.
///
/// Constructed once at the protected-route boundary and threaded through
/// handlers and service calls, instead of being re-read ad hoc.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    /// Bearer token minted by the auth service.
    pub token: String,
    /// Identifier the user logged in with.
    pub user_id: String,
}

/// Session keys for per-browser state.
pub mod session_keys {
    /// Key for the bearer token.
    pub const TOKEN: &str = "token";

    /// Key for the logged-in user id.
    pub const USER_ID: &str = "user_id";

    /// Key for the serialized cart.
    pub const CART: &str = "cart";
}
