//! Search route handlers.
//!
//! Both endpoints rank over the full product list in-process; the
//! catalog cache keeps keystroke-frequency calls off the backend.
//!
//! Responses echo the client's `seq` value in the `X-Search-Seq` header
//! so the page script can discard answers that arrive out of order.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    http::header::HeaderName,
    response::{AppendHeaders, IntoResponse},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireSession;
use crate::routes::main_page::ProductView;
use crate::search;
use crate::state::AppState;

/// Header echoing the request's `seq` parameter.
pub const SEARCH_SEQ_HEADER: &str = "x-search-seq";

/// Query parameters for both search endpoints.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    /// Client-side monotonic request number, echoed back verbatim.
    #[serde(default)]
    pub seq: u64,
}

/// Search results fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/search_results.html")]
pub struct SearchResultsTemplate {
    pub query: String,
    pub products: Vec<ProductView>,
}

/// Autocomplete suggestions fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/autocomplete.html")]
pub struct AutocompleteTemplate {
    pub products: Vec<ProductView>,
}

/// Ranked search results fragment.
#[instrument(skip(state, user), fields(q = %query.q, seq = query.seq))]
pub async fn results(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse> {
    let products = if query.q.trim().is_empty() {
        Vec::new()
    } else {
        let catalog = state.catalog().list_products(&user.token).await?;
        search::intelligent_search(&query.q, &catalog)
    };

    Ok((
        AppendHeaders([(
            HeaderName::from_static(SEARCH_SEQ_HEADER),
            query.seq.to_string(),
        )]),
        SearchResultsTemplate {
            query: query.q,
            products: products.iter().map(ProductView::from).collect(),
        },
    ))
}

/// Autocomplete suggestions fragment.
#[instrument(skip(state, user), fields(q = %query.q, seq = query.seq))]
pub async fn autocomplete(
    State(state): State<AppState>,
    RequireSession(user): RequireSession,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse> {
    let products = if query.q.trim().is_empty() {
        Vec::new()
    } else {
        let catalog = state.catalog().list_products(&user.token).await?;
        search::autocomplete(&query.q, &catalog)
    };

    Ok((
        AppendHeaders([(
            HeaderName::from_static(SEARCH_SEQ_HEADER),
            query.seq.to_string(),
        )]),
        AutocompleteTemplate {
            products: products.iter().map(ProductView::from).collect(),
        },
    ))
}
