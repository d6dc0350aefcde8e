//! Unified error handling.
//!
//! Provides a unified `AppError` type for route handlers. Service-client
//! errors propagate here unchanged; the response hides internal detail
//! behind a generic user-facing message while the full error is logged.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::ServiceError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// A backend service call failed.
    #[error("service error: {0}")]
    Service(#[from] ServiceError),

    /// Session read/write failed.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// No valid session for a protected operation.
    #[error("unauthorized")]
    Unauthorized,

    /// Bad request from client.
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Service(ServiceError::Rejected { status, .. }) if *status == 404 => {
                StatusCode::NOT_FOUND
            }
            Self::Service(_) => StatusCode::BAD_GATEWAY,
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request error");
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Service(_) => "Error al comunicarse con el servicio".to_string(),
            Self::Session(_) => "Error interno del servidor".to_string(),
            Self::NotFound(_) => "No encontrado".to_string(),
            Self::Unauthorized => "No autorizado".to_string(),
            Self::BadRequest(msg) => msg.clone(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
