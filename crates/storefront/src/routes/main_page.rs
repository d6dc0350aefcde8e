//! Catalog page route handler.
//!
//! The catalog page lists every product for the tenant and hosts the
//! live search box. A catalog fetch failure renders the page with an
//! error banner instead of failing the request; the session survives.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use botica_core::Product;
use tracing::instrument;

use crate::filters::format_money;
use crate::middleware::RequireSession;
use crate::routes::home::MessageQuery;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub key: String,
    pub name: String,
    pub active_ingredient: String,
    pub dosage_form: String,
    pub price: String,
    pub prescription_required: bool,
    pub expiration_date: Option<String>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            key: product.key().to_string(),
            name: product.name.clone(),
            active_ingredient: product.active_ingredient.clone(),
            dosage_form: product.dosage_form.clone(),
            price: format_money(&product.price.to_string()),
            prescription_required: product.prescription_required,
            expiration_date: product.expiration_date.clone(),
        }
    }
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "main_page.html")]
pub struct MainPageTemplate {
    pub user_id: String,
    pub products: Vec<ProductView>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display the catalog page.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let (products, error) = match state.catalog().list_products(&user.token).await {
        Ok(products) => {
            let views = products.iter().map(ProductView::from).collect();
            (views, query.error)
        }
        Err(e) => {
            tracing::error!("Failed to fetch product list: {e}");
            (Vec::new(), Some("catalogo".to_string()))
        }
    };

    MainPageTemplate {
        user_id: user.user_id,
        products,
        error,
        success: query.success,
    }
}
