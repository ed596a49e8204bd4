//! Tracing/logging initialization.
//!
//! Filtering comes from `RUST_LOG` (default `info`). The output format comes from
//! `SALESDESK_LOG_FORMAT`: `json` (default) or `pretty`.

use core::str::FromStr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub const LOG_FORMAT_VAR: &str = "SALESDESK_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line, for log shippers.
    #[default]
    Json,
    /// Multi-line human readable output for local development.
    Pretty,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown log format '{0}' (expected json or pretty)")]
pub struct ParseLogFormatError(String);

impl FromStr for LogFormat {
    type Err = ParseLogFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(ParseLogFormatError(s.to_string())),
        }
    }
}

impl LogFormat {
    /// Read the format from `lookup`, falling back to JSON when unset or unknown.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> (Self, Option<ParseLogFormatError>) {
        match lookup(LOG_FORMAT_VAR).map(|raw| raw.parse::<LogFormat>()) {
            None => (LogFormat::default(), None),
            Some(Ok(format)) => (format, None),
            Some(Err(e)) => (LogFormat::default(), Some(e)),
        }
    }
}

/// Initialize tracing/logging for the process using the environment.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let (format, invalid) = LogFormat::from_lookup(|key| std::env::var(key).ok());
    init_with(format);

    // Reported once the subscriber exists so the warning is not lost.
    if let Some(e) = invalid {
        tracing::warn!(error = %e, "falling back to json logs");
    }
}

/// Install a global subscriber with the given output format.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_with(format: LogFormat) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime);

    match format {
        LogFormat::Json => builder.json().with_target(false).try_init().is_ok(),
        LogFormat::Pretty => builder.pretty().try_init().is_ok(),
    }
}
