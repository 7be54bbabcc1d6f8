//! Log subscriber setup for the resolver binary.

use thiserror::Error;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LogOutput, LoggingConfig};

/// Errors that can occur while installing the log subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// A global subscriber is already installed.
    #[error("failed to install log subscriber: {0}")]
    InitError(String),
}

/// Build the level filter. `RUST_LOG` takes precedence over the config.
#[must_use]
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.to_string()))
}

/// Install the global `tracing` subscriber described by `config`.
///
/// # Errors
///
/// Returns an error if a global subscriber was already installed.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let writer = match config.output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(writer);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    result.map_err(|e| LoggingError::InitError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;

    #[test]
    fn test_env_filter_from_config() {
        let config = LoggingConfig {
            level: LogLevel::Debug,
            ..LoggingConfig::default()
        };
        if std::env::var("RUST_LOG").is_err() {
            assert!(env_filter(&config).to_string().contains("debug"));
        }
    }

    #[test]
    fn test_second_init_fails() {
        let config = LoggingConfig::default();
        let _ = init(&config);
        assert!(matches!(init(&config), Err(LoggingError::InitError(_))));
    }
}
