//! Authentication route handlers.
//!
//! Handles login, registration, and logout against the remote auth
//! service. Errors surface as redirect query parameters the landing
//! page renders as banners; the auth service's own wording never
//! reaches the browser.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::middleware::{evict_session, set_session_user};
use crate::models::SessionUser;
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub user_id: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub user_id: String,
    pub password: String,
    pub password_confirm: String,
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let user_id = form.user_id.trim();
    if user_id.is_empty() || form.password.is_empty() {
        return Redirect::to("/?error=credenciales").into_response();
    }

    match state.auth().login(user_id, &form.password).await {
        Ok(response) => {
            let user = SessionUser {
                token: response.token,
                // Some deployments echo the id back, some do not
                user_id: response.user_id.unwrap_or_else(|| user_id.to_string()),
            };

            if let Err(e) = set_session_user(&session, &user).await {
                tracing::error!("Failed to set session: {e}");
                return Redirect::to("/?error=sesion").into_response();
            }

            Redirect::to("/mainPage").into_response()
        }
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            Redirect::to("/?error=credenciales").into_response()
        }
    }
}

/// Handle registration form submission.
///
/// Registration never logs the user in; on success the landing page
/// shows a banner inviting them to log in.
#[instrument(skip(state, form))]
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    let user_id = form.user_id.trim();
    if user_id.is_empty() || form.password.is_empty() {
        return Redirect::to("/?error=datos_incompletos").into_response();
    }

    if form.password != form.password_confirm {
        return Redirect::to("/?error=password_distinta").into_response();
    }

    match state.auth().register(user_id, &form.password).await {
        Ok(()) => Redirect::to("/?success=registrado").into_response(),
        Err(e) => {
            tracing::warn!("Registration failed: {e}");
            Redirect::to("/?error=registro").into_response()
        }
    }
}

/// Handle logout.
///
/// Clears token, user id, and cart, then destroys the session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    if let Err(e) = evict_session(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }

    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }

    Redirect::to("/").into_response()
}
