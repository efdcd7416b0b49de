//! Tracing subscriber installation.
//!
//! Everything is written to stderr; stdout is reserved for command output. `RUST_LOG`
//! overrides the configured level when it holds a valid directive.

use std::io::{self, IsTerminal};
use std::str::FromStr;

use once_cell::sync::OnceCell;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::error::{Result, TelemetryError};

/// Level directive used when neither `RUST_LOG` nor a flag says otherwise.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

static BUILD_SHA: OnceCell<String> = OnceCell::new();

/// Options for [`init_logging`].
#[derive(Debug, Clone)]
pub struct LoggingConfig<'a> {
    /// Filter directive such as `warn` or `taskdash_transport=debug`.
    pub level: &'a str,
    /// Line format written to stderr.
    pub format: LogFormat,
    /// Commit the binary was built from.
    pub build_sha: &'a str,
}

impl Default for LoggingConfig<'_> {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL,
            format: LogFormat::Pretty,
            build_sha: option_env!("TASKDASH_BUILD_SHA").unwrap_or("dev"),
        }
    }
}

/// Line format of emitted events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event, including the enclosing span fields.
    Json,
    /// Human-readable lines, coloured when stderr is a terminal.
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            other => Err(format!("unknown log format '{other}' (expected json or pretty)")),
        }
    }
}

/// Install the global subscriber described by `config`.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] when the level is not a valid directive and
/// [`TelemetryError::SubscriberInstall`] when a global subscriber already exists.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = env_filter(config.level)?;
    let layer = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(io::stderr)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
            .with_target(false)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|source| TelemetryError::SubscriberInstall { source })?;

    let sha = BUILD_SHA.get_or_init(|| config.build_sha.to_string());
    tracing::debug!(build_sha = %sha, format = ?config.format, "logging initialised");
    Ok(())
}

/// Build identifier recorded by [`init_logging`], or `dev` before initialisation.
#[must_use]
pub fn build_sha() -> &'static str {
    BUILD_SHA.get().map_or("dev", String::as_str)
}

fn env_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env().or_else(|_| directive_filter(level))
}

fn directive_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level).map_err(|source| TelemetryError::InvalidFilter {
        directive: level.to_string(),
        source,
    })
}
