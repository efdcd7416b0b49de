//! Transport construction, error types, and argument parsers for the CLI.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use chrono::{DateTime, NaiveDate};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{StatusCode, Url};
use taskdash_transport::{
    ClientConfig, CredentialProvider, DashboardTransport, EnvInitData, StaticCredentials,
    TransportError,
};

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<TransportError> for CliError {
    fn from(error: TransportError) -> Self {
        classify_transport_error(error)
    }
}

/// Where the session-init-data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SessionSource {
    /// Passed explicitly on the command line.
    Inline(String),
    /// Re-read from the named environment variable on every request.
    Environment(String),
}

impl SessionSource {
    fn provider(&self) -> Arc<dyn CredentialProvider> {
        match self {
            Self::Inline(init_data) => Arc::new(StaticCredentials::new(init_data.clone())),
            Self::Environment(var) => Arc::new(EnvInitData::new(var.clone())),
        }
    }
}

/// Settings needed to build the transport, collected from flags and environment.
#[derive(Debug, Clone)]
pub(crate) struct ConnectionSettings {
    pub(crate) api_url: Url,
    pub(crate) timeout_secs: u64,
    pub(crate) session: SessionSource,
}

/// Application context passed to command handlers.
#[derive(Clone, Debug)]
pub(crate) struct AppContext {
    pub(crate) transport: DashboardTransport,
}

impl AppContext {
    /// Build the shared transport, tagging every request with `trace_id`.
    pub(crate) fn connect(settings: &ConnectionSettings, trace_id: &str) -> CliResult<Self> {
        let mut default_headers = HeaderMap::new();
        let request_id = HeaderValue::from_str(trace_id).map_err(|_| {
            CliError::failure(anyhow!("trace identifier contains invalid characters"))
        })?;
        default_headers.insert(HEADER_REQUEST_ID, request_id);

        let timeout = (settings.timeout_secs > 0).then(|| Duration::from_secs(settings.timeout_secs));
        let config = ClientConfig::new(settings.api_url.clone())
            .with_forward_credentials(true)
            .with_timeout(timeout)
            .with_default_headers(default_headers);

        let transport = DashboardTransport::connect(config, Some(settings.session.provider()))
            .map_err(|err| match err {
                TransportError::InvalidConfig { reason, value, .. } => CliError::validation(
                    format!("invalid API URL '{}': {reason}", value.unwrap_or_default()),
                ),
                other => CliError::failure(anyhow!(other).context("failed to build HTTP client")),
            })?;

        Ok(Self { transport })
    }
}

/// Parse the API URL provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

/// Parse a period boundary: unix seconds, RFC 3339, or a `YYYY-MM-DD` date (midnight UTC).
pub(crate) fn parse_timestamp(input: &str) -> Result<i64, String> {
    let trimmed = input.trim();
    if let Ok(seconds) = trimmed.parse::<i64>() {
        return Ok(seconds);
    }
    if let Ok(moment) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(moment.timestamp());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc().timestamp());
        }
    }
    Err(format!(
        "invalid timestamp '{input}': expected unix seconds, RFC 3339, or YYYY-MM-DD"
    ))
}

/// Classify a transport failure into a CLI error.
pub(crate) fn classify_transport_error(error: TransportError) -> CliError {
    if let TransportError::Status {
        status, body, path, ..
    } = &error
    {
        let message = body.trim();
        if matches!(
            *status,
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY
        ) {
            return if message.is_empty() {
                CliError::validation(format!("request to {path} was rejected ({status})"))
            } else {
                CliError::validation(message)
            };
        }
        let detail = if message.is_empty() {
            format!("request to {path} failed with status {status}")
        } else {
            format!("{message} (status {status})")
        };
        return CliError::failure(anyhow!(detail));
    }

    let context = error
        .operation()
        .map_or_else(|| "request failed".to_string(), |operation| format!("{operation} failed"));
    CliError::failure(anyhow!(error).context(context))
}
