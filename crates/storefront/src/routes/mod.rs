//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Landing page (login/register)
//! GET  /health                 - Health check
//!
//! # Auth
//! POST /auth/login             - Login action
//! POST /auth/register          - Register action
//! POST /auth/logout            - Logout action
//!
//! # Pages (session gate re-validates token on each load)
//! GET  /mainPage               - Product listing
//! GET  /productos              - Product administration
//! GET  /cart                   - Cart page
//! GET  /purchases              - Purchase history
//!
//! # Product admin actions
//! POST /productos/save         - Create or update a product
//! POST /productos/delete       - Delete a product
//! POST /productos/upload-url   - Request an image upload URL (JSON)
//!
//! # Cart (HTMX fragments)
//! POST /cart/add               - Add to cart (returns cart_count fragment)
//! POST /cart/update            - Update quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove item (returns cart_items fragment)
//! POST /cart/clear             - Empty the cart (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//! POST /cart/checkout          - Register the purchase and empty the cart
//!
//! # Search (HTMX fragments)
//! GET  /search                 - Ranked search results (echoes X-Search-Seq)
//! GET  /search/autocomplete    - Autocomplete suggestions
//! ```

pub mod auth;
pub mod cart;
pub mod home;
pub mod main_page;
pub mod products;
pub mod purchases;
pub mod search;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::middleware::validate_session;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the protected page router.
///
/// Full page loads go through the session gate: the bearer token is
/// re-validated with the auth service on every mount, and a rejected
/// token evicts the whole session (token, user id, cart).
pub fn page_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/mainPage", get(main_page::show))
        .route("/productos", get(products::index))
        .route("/cart", get(cart::show))
        .route("/purchases", get(purchases::show))
        .route_layer(axum_middleware::from_fn_with_state(state, validate_session))
}

/// Create the fragment/action router.
///
/// These run between page mounts; they require a session via the
/// `RequireSession` extractor but skip the remote token re-validation,
/// so keystroke-frequency calls never fan out to the auth service.
pub fn fragment_routes() -> Router<AppState> {
    Router::new()
        .route("/productos/save", post(products::save))
        .route("/productos/delete", post(products::delete))
        .route("/productos/upload-url", post(products::upload_url))
        .route("/cart/add", post(cart::add))
        .route("/cart/update", post(cart::update))
        .route("/cart/remove", post(cart::remove))
        .route("/cart/clear", post(cart::clear))
        .route("/cart/count", get(cart::count))
        .route("/cart/checkout", post(cart::checkout))
        .route("/search", get(search::results))
        .route("/search/autocomplete", get(search::autocomplete))
}

/// Create all routes for the storefront.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/auth", auth_routes())
        .merge(page_routes(state))
        .merge(fragment_routes())
}
