//! Clients for the three remote backend services.
//!
//! # Architecture
//!
//! - Auth, catalog, and purchase ledger are independent REST services,
//!   each with a fixed base URL from [`crate::config::ServiceEndpoints`].
//! - Single attempt per user action: no retry, no backoff. Failures
//!   propagate unchanged to the calling route handler.
//! - Some backend responses arrive as direct JSON, others as a JSON string
//!   nested in a `{statusCode, body}` envelope. [`decode_body`] normalizes
//!   both forms in one place; the clients never unwrap ad hoc.

pub mod auth;
pub mod catalog;
pub mod purchases;

pub use auth::AuthClient;
pub use catalog::{CatalogClient, ProductDraft};
pub use purchases::PurchasesClient;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors that can occur when calling a backend service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Transport failure: no response reached the server.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("service rejected request: {status} - {message}")]
    Rejected { status: u16, message: String },

    /// The response body did not match the expected JSON shape, directly
    /// or through the envelope.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ServiceError {
    /// Whether this is a rejection with the given HTTP status.
    #[must_use]
    pub const fn is_status(&self, status: u16) -> bool {
        matches!(self, Self::Rejected { status: s, .. } if *s == status)
    }
}

/// Response envelope some backends wrap their payload in: the real body is
/// a JSON-encoded string in the `body` field.
#[derive(Debug, Deserialize)]
struct Envelope {
    body: String,
}

/// Decode a response body that may be direct JSON or an envelope carrying
/// a nested JSON string.
///
/// # Errors
///
/// Returns `ServiceError::Malformed` if neither form parses into `T`.
pub(crate) fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T, ServiceError> {
    let direct_err = match serde_json::from_str::<T>(text) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    // Fall back to the envelope form before giving up.
    if let Ok(envelope) = serde_json::from_str::<Envelope>(text) {
        return serde_json::from_str(&envelope.body)
            .map_err(|e| ServiceError::Malformed(format!("envelope body: {e}")));
    }

    Err(ServiceError::Malformed(direct_err.to_string()))
}

/// Read a response: reject non-2xx statuses, then decode the body through
/// the envelope adapter.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ServiceError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(ServiceError::Rejected {
            status: status.as_u16(),
            message: text.chars().take(200).collect(),
        });
    }

    decode_body(&text)
}

/// Check a response for success without decoding a body.
pub(crate) async fn read_ok(response: reqwest::Response) -> Result<(), ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let text = response.text().await.unwrap_or_default();
    Err(ServiceError::Rejected {
        status: status.as_u16(),
        message: text.chars().take(200).collect(),
    })
}

/// Strip a trailing slash so endpoint paths can be appended uniformly.
pub(crate) fn base_str(url: &url::Url) -> String {
    url.as_str().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Token {
        token: String,
        user_id: String,
    }

    #[test]
    fn decodes_direct_json() {
        let text = r#"{"token": "abc", "user_id": "ana"}"#;
        let parsed: Token = decode_body(text).expect("direct form");
        assert_eq!(parsed.token, "abc");
        assert_eq!(parsed.user_id, "ana");
    }

    #[test]
    fn decodes_enveloped_json_string() {
        let text = r#"{"statusCode": 200, "body": "{\"token\": \"abc\", \"user_id\": \"ana\"}"}"#;
        let parsed: Token = decode_body(text).expect("envelope form");
        assert_eq!(parsed.token, "abc");
        assert_eq!(parsed.user_id, "ana");
    }

    #[test]
    fn rejects_garbage() {
        let result: Result<Token, _> = decode_body("not json at all");
        assert!(matches!(result, Err(ServiceError::Malformed(_))));
    }

    #[test]
    fn rejects_envelope_with_garbage_body() {
        let text = r#"{"statusCode": 200, "body": "not json"}"#;
        let result: Result<Token, _> = decode_body(text);
        assert!(matches!(result, Err(ServiceError::Malformed(_))));
    }

    #[test]
    fn is_status_matches_rejections_only() {
        let err = ServiceError::Rejected {
            status: 404,
            message: String::new(),
        };
        assert!(err.is_status(404));
        assert!(!err.is_status(403));
        assert!(!ServiceError::Malformed("x".to_string()).is_status(404));
    }

    #[test]
    fn base_str_trims_trailing_slash() {
        let url = url::Url::parse("https://auth.example.com/dev/").expect("url");
        assert_eq!(base_str(&url), "https://auth.example.com/dev");
    }
}
