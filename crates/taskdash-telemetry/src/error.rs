//! Failures raised while installing the tracing subscriber.

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::TryInitError;

/// Result alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Errors returned by [`crate::init_logging`].
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured level is not a valid filter directive.
    #[error("invalid log filter directive '{directive}'")]
    InvalidFilter {
        /// Directive as supplied by the caller.
        directive: String,
        /// Parser failure.
        source: ParseError,
    },
    /// A global subscriber was already installed.
    #[error("failed to install tracing subscriber")]
    SubscriberInstall {
        /// Installation failure.
        source: TryInitError,
    },
}
