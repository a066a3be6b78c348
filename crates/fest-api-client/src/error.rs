//! Error mapping from HTTP to domain errors

use fest_core::DomainError;
use reqwest::{Response, StatusCode};

use crate::dto::ErrorBody;

/// Convert a transport-level reqwest error to DomainError
pub fn map_transport_error(e: reqwest::Error) -> DomainError {
    let message = if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        "could not reach server".to_string()
    } else {
        e.to_string()
    };
    DomainError::request_failed(e.status().map(|s| s.as_u16()), message)
}

/// Turn a non-success response into a DomainError
///
/// 404 maps to `NotFound`; everything else is a `RequestFailed` carrying the
/// body's `error` field when the server sent one.
pub async fn error_from_response(response: Response, what: &str) -> DomainError {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return DomainError::not_found(what);
    }

    let body: ErrorBody = response.json().await.unwrap_or_default();
    let message = body.error.unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string()
    });
    DomainError::request_failed(Some(status.as_u16()), message)
}

/// Error for a 2xx response whose body could not be decoded
pub fn malformed_body(status: StatusCode, e: &impl std::fmt::Display) -> DomainError {
    DomainError::request_failed(Some(status.as_u16()), format!("malformed response body: {e}"))
}
