//! Structured logging for the CLI.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the binary. Log output goes to stderr so that resolved paths printed on
//! stdout stay machine-readable.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::error::LocatorError;

/// Environment variable holding an `EnvFilter` directive (e.g. `compass_data=debug`).
pub const LOG_ENV: &str = "COMPASS_LOG";

/// Log line encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(LocatorError::UnsupportedFormat(format!(
                "log format '{}' (supported: text, json)",
                other
            ))),
        }
    }
}

/// Builds the event filter.
///
/// Priority: `COMPASS_LOG`, then the `default_level` directive.
pub fn build_env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Installs the global subscriber. Calling it twice is a no-op.
pub fn init_logging(default_level: &str, format: LogFormat) {
    let base = Registry::default().with(build_env_filter(default_level));

    // try_init fails only when a subscriber is already set.
    let _ = match format {
        LogFormat::Text => base
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Json => base
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };
}
