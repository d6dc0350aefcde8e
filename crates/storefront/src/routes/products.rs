//! Product administration route handlers.
//!
//! Create/update, delete, and the image upload URL. The page reuses the
//! catalog listing; the form posts back to the same page with banner
//! query parameters.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireSession;
use crate::routes::home::MessageQuery;
use crate::routes::main_page::ProductView;
use crate::services::ProductDraft;
use crate::state::AppState;

/// Product form data. An empty SKU means create; a present one updates
/// that record.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub sku: Option<String>,
    pub name: String,
    pub active_ingredient: String,
    pub dosage_form: String,
    pub price: f64,
    pub expiration_date: String,
    /// Checkbox; absent when unchecked.
    pub prescription_required: Option<String>,
}

/// Delete form data.
#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    pub sku: String,
}

/// Upload URL JSON response.
#[derive(Debug, Serialize)]
pub struct UploadUrlResponse {
    pub upload_url: String,
}

/// Product admin page template.
#[derive(Template, WebTemplate)]
#[template(path = "products.html")]
pub struct ProductsTemplate {
    pub products: Vec<ProductView>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display the product admin page.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let (products, error) = match state.catalog().list_products(&user.token).await {
        Ok(products) => (
            products.iter().map(ProductView::from).collect(),
            query.error,
        ),
        Err(e) => {
            tracing::error!("Failed to fetch product list: {e}");
            (Vec::new(), Some("catalogo".to_string()))
        }
    };

    ProductsTemplate {
        products,
        error,
        success: query.success,
    }
}

/// Create or update a product.
#[instrument(skip(state, user, form), fields(sku = ?form.sku, name = %form.name))]
pub async fn save(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
    Form(form): Form<ProductForm>,
) -> Response {
    let name = form.name.trim();
    if name.is_empty() {
        return Redirect::to("/productos?error=nombre_vacio").into_response();
    }
    if form.price < 0.0 {
        return Redirect::to("/productos?error=precio_invalido").into_response();
    }

    let draft = ProductDraft {
        sku: form.sku.filter(|s| !s.trim().is_empty()),
        name: name.to_string(),
        active_ingredient: form.active_ingredient.trim().to_string(),
        dosage_form: form.dosage_form.trim().to_string(),
        price: form.price,
        expiration_date: form.expiration_date.trim().to_string(),
        prescription_required: form.prescription_required.is_some(),
    };

    match state.catalog().save_product(&user.token, &draft).await {
        Ok(_) => Redirect::to("/productos?success=guardado").into_response(),
        Err(e) => {
            tracing::error!("Failed to save product: {e}");
            Redirect::to("/productos?error=guardar").into_response()
        }
    }
}

/// Delete a product.
#[instrument(skip(state, user), fields(sku = %form.sku))]
pub async fn delete(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
    Form(form): Form<DeleteForm>,
) -> Response {
    match state.catalog().delete_product(&user.token, &form.sku).await {
        Ok(()) => Redirect::to("/productos?success=eliminado").into_response(),
        Err(e) => {
            tracing::error!("Failed to delete product: {e}");
            Redirect::to("/productos?error=eliminar").into_response()
        }
    }
}

/// Request a pre-signed image upload URL (JSON, consumed by page script).
#[instrument(skip(state, user))]
pub async fn upload_url(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
) -> Result<Json<UploadUrlResponse>> {
    let upload_url = state.catalog().upload_url(&user.token).await?;
    Ok(Json(UploadUrlResponse { upload_url }))
}
