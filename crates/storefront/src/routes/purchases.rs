//! Purchase history route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use botica_core::Purchase;

use crate::filters::{self, format_money};
use crate::middleware::RequireSession;
use crate::state::AppState;

/// Purchase line display data for templates.
#[derive(Clone)]
pub struct PurchaseItemView {
    pub name: String,
    pub quantity: u32,
    pub price: String,
}

/// Purchase display data for templates.
#[derive(Clone)]
pub struct PurchaseView {
    pub id: String,
    pub date: String,
    pub status: String,
    pub total: String,
    pub unit_count: u32,
    pub items: Vec<PurchaseItemView>,
}

impl From<&Purchase> for PurchaseView {
    fn from(purchase: &Purchase) -> Self {
        Self {
            id: purchase.id.clone(),
            date: purchase.date.clone(),
            status: purchase.status.label().to_string(),
            total: format_money(&purchase.total.to_string()),
            unit_count: purchase.unit_count(),
            items: purchase
                .products
                .iter()
                .map(|item| PurchaseItemView {
                    name: item.name.clone(),
                    quantity: item.quantity,
                    price: format_money(&item.price.to_string()),
                })
                .collect(),
        }
    }
}

/// Purchase history page template.
#[derive(Template, WebTemplate)]
#[template(path = "purchases.html")]
pub struct PurchasesTemplate {
    pub purchases: Vec<PurchaseView>,
    pub error: Option<String>,
}

/// Display the purchase history page, newest first.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
) -> impl IntoResponse {
    let (purchases, error) = match state.purchases().list_purchases(&user.token).await {
        Ok(mut purchases) => {
            // Backend order is not guaranteed
            purchases.sort_by(|a, b| b.date.cmp(&a.date));
            (purchases.iter().map(PurchaseView::from).collect(), None)
        }
        Err(e) => {
            tracing::error!("Failed to fetch purchase history: {e}");
            (Vec::new(), Some("historial".to_string()))
        }
    };

    PurchasesTemplate { purchases, error }
}
