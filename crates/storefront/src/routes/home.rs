//! Landing page route handler.
//!
//! The landing page carries both the login and the registration form.
//! A visitor with a still-valid session is sent straight to the catalog.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::middleware::current_user;
use crate::state::AppState;

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display the landing page.
///
/// If the session already holds a token the auth service still accepts,
/// skip the forms and go to the catalog.
#[instrument(skip(state, session))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<MessageQuery>,
) -> Response {
    if let Some(user) = current_user(&session).await
        && state.auth().validate_token(&user.token).await.is_ok()
    {
        return Redirect::to("/mainPage").into_response();
    }

    HomeTemplate {
        error: query.error,
        success: query.success,
    }
    .into_response()
}
