//! Error types for transport operations.
//!
//! # Design
//!
//! - Constant error messages; request context travels in structured fields.
//! - Source errors are preserved so callers can inspect the original failure.
//! - Non-2xx responses keep the original status and body untouched.

use reqwest::StatusCode;
use reqwest::header::InvalidHeaderValue;
use thiserror::Error;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors produced while talking to the dashboard backend.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The client configuration was rejected at construction time.
    #[error("invalid transport configuration")]
    InvalidConfig {
        /// Configuration field that failed validation.
        field: &'static str,
        /// Static reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
    /// The underlying HTTP client could not be built.
    #[error("failed to build http client")]
    ClientBuild {
        /// Underlying reqwest error.
        source: reqwest::Error,
    },
    /// The session-init-data could not be encoded as a header value.
    #[error("invalid authorization credential")]
    InvalidCredential {
        /// Underlying header encoding error.
        source: InvalidHeaderValue,
    },
    /// No response was received from the backend.
    #[error("request failed")]
    Request {
        /// Operation that issued the request.
        operation: &'static str,
        /// Endpoint path that was requested.
        path: String,
        /// Underlying reqwest error.
        source: reqwest::Error,
    },
    /// The backend answered with a non-success status.
    #[error("backend returned an error status")]
    Status {
        /// Operation that issued the request.
        operation: &'static str,
        /// Endpoint path that was requested.
        path: String,
        /// Status code reported by the backend.
        status: StatusCode,
        /// Raw response body, possibly empty.
        body: String,
    },
    /// The response body could not be read.
    #[error("failed to read response body")]
    Body {
        /// Operation that issued the request.
        operation: &'static str,
        /// Endpoint path that was requested.
        path: String,
        /// Underlying reqwest error.
        source: reqwest::Error,
    },
    /// The response body was not valid JSON.
    #[error("failed to decode response body")]
    Decode {
        /// Operation that issued the request.
        operation: &'static str,
        /// Endpoint path that was requested.
        path: String,
        /// Underlying serde error.
        source: serde_json::Error,
    },
}

/// Coarse classification of a [`TransportError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request could not be constructed.
    Config,
    /// No response was received.
    Network,
    /// The backend reported a failure status.
    Status,
    /// The response body was absent, unreadable, or malformed.
    Body,
}

impl TransportError {
    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidConfig { .. } | Self::ClientBuild { .. } | Self::InvalidCredential { .. } => {
                ErrorKind::Config
            }
            Self::Request { .. } => ErrorKind::Network,
            Self::Status { .. } => ErrorKind::Status,
            Self::Body { .. } | Self::Decode { .. } => ErrorKind::Body,
        }
    }

    /// HTTP status reported by the backend, when a response was received.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request { source, .. } | Self::Body { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Operation name attached to the failure, if the failure happened in flight.
    #[must_use]
    pub const fn operation(&self) -> Option<&'static str> {
        match self {
            Self::Request { operation, .. }
            | Self::Status { operation, .. }
            | Self::Body { operation, .. }
            | Self::Decode { operation, .. } => Some(*operation),
            _ => None,
        }
    }

    pub(crate) const fn invalid_config(
        field: &'static str,
        reason: &'static str,
        value: Option<String>,
    ) -> Self {
        Self::InvalidConfig {
            field,
            reason,
            value,
        }
    }
}
