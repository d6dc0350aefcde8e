//! Authentication middleware and extractors.
//!
//! Protected pages go through `validate_session`, which re-checks the
//! bearer token against the auth service on every page load and evicts
//! the session when the token no longer validates. Handlers behind the
//! gate use the `RequireSession` extractor to get the logged-in user.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{SessionUser, session_keys};
use crate::state::AppState;

/// Extractor that requires a logged-in user.
///
/// Only meaningful behind the `validate_session` gate, which has already
/// verified the token with the auth service for this request.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireSession(user): RequireSession,
/// ) -> impl IntoResponse {
///     format!("Hola, {}!", user.user_id)
/// }
/// ```
pub struct RequireSession(pub SessionUser);

/// Error returned when a session is required but absent.
pub enum SessionRejection {
    /// Redirect to the landing page (for HTML page requests).
    RedirectToLanding,
    /// Unauthorized response (for fragment/JSON requests).
    Unauthorized,
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLanding => Redirect::to("/").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireSession
where
    S: Send + Sync,
{
    type Rejection = SessionRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // validate_session stores the verified user as a request extension
        if let Some(user) = parts.extensions.get::<SessionUser>() {
            return Ok(Self(user.clone()));
        }

        // Fall back to the raw session for routes outside the gate
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(SessionRejection::Unauthorized)?;

        let user = current_user(session).await.ok_or_else(|| {
            // Pages redirect to the landing forms; fragments and actions
            // answer 401 so HTMX never swaps a login page into a fragment
            match parts.uri.path() {
                "/mainPage" | "/productos" | "/cart" | "/purchases" => {
                    SessionRejection::RedirectToLanding
                }
                _ => SessionRejection::Unauthorized,
            }
        })?;

        Ok(Self(user))
    }
}

/// Read the logged-in user from the session, if any.
///
/// Returns `None` unless both token and user id are present.
pub async fn current_user(session: &Session) -> Option<SessionUser> {
    let token: String = session.get(session_keys::TOKEN).await.ok().flatten()?;
    let user_id: String = session.get(session_keys::USER_ID).await.ok().flatten()?;
    Some(SessionUser { token, user_id })
}

/// Store the logged-in user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_session_user(
    session: &Session,
    user: &SessionUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::TOKEN, &user.token).await?;
    session.insert(session_keys::USER_ID, &user.user_id).await?;
    Ok(())
}

/// Clear token, user id, and cart from the session (logout/eviction).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn evict_session(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<serde_json::Value>(session_keys::TOKEN)
        .await?;
    session
        .remove::<serde_json::Value>(session_keys::USER_ID)
        .await?;
    session
        .remove::<serde_json::Value>(session_keys::CART)
        .await?;
    Ok(())
}

/// Session gate for protected pages.
///
/// Re-validates the stored token against the auth service on every
/// request. A missing session redirects to the landing page; a token the
/// auth service no longer accepts evicts the whole session (token, user
/// id, cart) before redirecting.
pub async fn validate_session(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(user) = current_user(&session).await else {
        return Redirect::to("/").into_response();
    };

    if state.auth().validate_token(&user.token).await.is_err() {
        tracing::info!(user_id = %user.user_id, "Session token rejected, evicting session");
        if let Err(error) = evict_session(&session).await {
            tracing::error!(error = %error, "Failed to evict session");
        }
        return Redirect::to("/").into_response();
    }

    request.extensions_mut().insert(user);
    next.run(request).await
}
