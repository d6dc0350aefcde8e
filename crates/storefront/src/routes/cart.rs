//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page
//! reloads. The cart itself lives in the session and is only turned into
//! a purchase at checkout; a checkout the ledger rejects leaves the cart
//! exactly as it was.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use botica_core::{Cart, PurchaseItem};

use crate::filters::format_money;
use crate::middleware::RequireSession;
use crate::models::session_keys;
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub dosage_form: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u32,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: "$0.00".to_string(),
            item_count: 0,
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .map(|item| CartItemView {
                    id: item.product.key().to_string(),
                    name: item.product.name.clone(),
                    dosage_form: item.product.dosage_form.clone(),
                    quantity: item.quantity,
                    price: format_money(&item.product.price.to_string()),
                    line_price: format_money(&item.line_total().to_string()),
                })
                .collect(),
            total: format_money(&cart.total().to_string()),
            item_count: cart.item_count(),
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the cart from the session. A missing or corrupt entry yields an
/// empty cart; the corrupt entry is discarded on the next save.
async fn load_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(session_keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Persist the cart to the session.
async fn save_cart(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<u32>,
}

/// Update cart form data. The quantity arrives signed so a negative
/// value from a stepper clamps to removal rather than failing to parse.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub error: Option<String>,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Query parameters for the cart page.
#[derive(Debug, Deserialize)]
pub struct CartPageQuery {
    pub error: Option<String>,
}

/// Display the cart page.
#[instrument(skip(session))]
pub async fn show(
    session: Session,
    axum::extract::Query(query): axum::extract::Query<CartPageQuery>,
) -> impl IntoResponse {
    let cart = load_cart(&session).await;

    CartShowTemplate {
        cart: CartView::from(&cart),
        error: query.error,
    }
}

/// Add item to cart (HTMX).
///
/// Looks the product up in the catalog so the cart stores current price
/// and name. Returns the cart count badge with an HTMX trigger.
#[instrument(skip(state, user, session))]
pub async fn add(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let quantity = form.quantity.unwrap_or(1);

    let product = match state.catalog().get_product(&user.token, &form.product_id).await {
        Ok(Some(product)) => product,
        Ok(None) => {
            tracing::warn!(product_id = %form.product_id, "Product not found for cart add");
            return cart_error_fragment();
        }
        Err(e) => {
            tracing::error!("Failed to fetch product for cart add: {e}");
            return cart_error_fragment();
        }
    };

    let mut cart = load_cart(&session).await;
    cart.add(product, quantity);

    if let Err(e) = save_cart(&session, &cart).await {
        tracing::error!("Failed to save cart to session: {e}");
        return cart_error_fragment();
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count: cart.item_count(),
        },
    )
        .into_response()
}

/// Update cart item quantity (HTMX). Zero or negative removes the line.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Response {
    let quantity = u32::try_from(form.quantity).unwrap_or(0);

    let mut cart = load_cart(&session).await;
    cart.set_quantity(&form.product_id, quantity);

    if let Err(e) = save_cart(&session, &cart).await {
        tracing::error!("Failed to save cart to session: {e}");
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response()
}

/// Remove item from cart (HTMX).
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Response {
    let mut cart = load_cart(&session).await;
    cart.remove(&form.product_id);

    if let Err(e) = save_cart(&session, &cart).await {
        tracing::error!("Failed to save cart to session: {e}");
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response()
}

/// Empty the cart (HTMX).
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Response {
    let mut cart = load_cart(&session).await;
    cart.clear();

    if let Err(e) = save_cart(&session, &cart).await {
        tracing::error!("Failed to save cart to session: {e}");
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response()
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let cart = load_cart(&session).await;

    CartCountTemplate {
        count: cart.item_count(),
    }
}

/// Register the purchase and empty the cart.
///
/// The cart is only cleared after the ledger confirms the purchase; on
/// any failure it stays untouched and the cart page shows a banner.
#[instrument(skip(state, user, session))]
pub async fn checkout(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
    session: Session,
) -> Response {
    let mut cart = load_cart(&session).await;
    if cart.is_empty() {
        return Redirect::to("/cart").into_response();
    }

    let products: Vec<PurchaseItem> = cart
        .items()
        .iter()
        .map(|item| PurchaseItem {
            product_id: item.product.key().to_string(),
            name: item.product.name.clone(),
            quantity: item.quantity,
            price: item.product.price,
        })
        .collect();

    match state
        .purchases()
        .register_purchase(&user.token, &user.user_id, &products, cart.total())
        .await
    {
        Ok(purchase) => {
            tracing::info!(purchase_id = %purchase.id, "Purchase registered");
            cart.clear();
            if let Err(e) = save_cart(&session, &cart).await {
                tracing::error!("Failed to clear cart after checkout: {e}");
            }
            Redirect::to("/mainPage?success=compra").into_response()
        }
        Err(e) => {
            tracing::error!("Checkout failed: {e}");
            Redirect::to("/cart?error=compra").into_response()
        }
    }
}

/// Generic inline error for cart fragments.
fn cart_error_fragment() -> Response {
    (
        axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        axum::response::Html("<span class=\"cart-error\">Error al actualizar el carrito</span>"),
    )
        .into_response()
}
