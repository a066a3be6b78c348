//! Domain errors - error types for the synchronizer and its ports

use thiserror::Error;

use crate::value_objects::{IdeaId, MutationKind};

/// Result type for domain and port operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Authentication Errors
    // =========================================================================
    #[error("Sign in required")]
    Unauthenticated,

    // =========================================================================
    // Guard Errors
    // =========================================================================
    #[error("A {kind} request for idea {idea_id} is already in flight")]
    Pending { idea_id: IdeaId, kind: MutationKind },

    #[error("Synchronizer has been disposed")]
    Disposed,

    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Not found: {0}")]
    NotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    // =========================================================================
    // Transport Errors
    // =========================================================================
    #[error("Request failed{}: {message}", status.map(|s| format!(" ({s})")).unwrap_or_default())]
    RequestFailed { status: Option<u16>, message: String },

    #[error("Real-time connection unavailable: {0}")]
    ConnectionUnavailable(String),
}

impl DomainError {
    /// Create a not found error
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Create a request failure with an optional HTTP status
    pub fn request_failed(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::RequestFailed {
            status,
            message: message.into(),
        }
    }

    /// Get an error code string for notices and logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Pending { .. } => "PENDING",
            Self::Disposed => "DISPOSED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::RequestFailed { .. } => "REQUEST_FAILED",
            Self::ConnectionUnavailable(_) => "CONNECTION_UNAVAILABLE",
        }
    }

    /// HTTP status attached to a request failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::ContentTooLong { .. })
    }

    /// Check if this error came from talking to the server
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::RequestFailed { .. } | Self::ConnectionUnavailable(_)
        )
    }

    /// Check if the action was rejected before any network call
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated | Self::Pending { .. } | Self::Disposed
        ) || self.is_validation()
    }
}
