//! Configuration type definitions.

use serde::{Deserialize, Serialize};

use crate::tls_context::{Secret, SecretSnapshot, SslConfig, UpstreamSslConfig};

/// Root configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Secrets available to `secret_ref` sources.
    pub secrets: Vec<Secret>,

    /// Upstreams the proxy connects to over TLS.
    pub upstreams: Vec<UpstreamEntry>,

    /// Listeners that terminate TLS.
    pub listeners: Vec<ListenerEntry>,
}

impl ResolverConfig {
    /// Build the secret snapshot described by this document.
    #[must_use]
    pub fn secret_snapshot(&self) -> SecretSnapshot {
        self.secrets.iter().cloned().collect()
    }
}

/// An upstream and its SSL configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamEntry {
    /// Upstream name.
    pub name: String,

    /// SSL configuration.
    #[serde(default)]
    pub ssl: UpstreamSslConfig,
}

impl UpstreamEntry {
    /// Create a new upstream entry.
    pub fn new(name: &str, ssl: UpstreamSslConfig) -> Self {
        Self {
            name: name.to_string(),
            ssl,
        }
    }
}

/// A listener and its SSL configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenerEntry {
    /// Listener name.
    pub name: String,

    /// SSL configuration.
    #[serde(default)]
    pub ssl: SslConfig,
}

impl ListenerEntry {
    /// Create a new listener entry.
    pub fn new(name: &str, ssl: SslConfig) -> Self {
        Self {
            name: name.to_string(),
            ssl,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: LogLevel,

    /// Log format (json, pretty, compact).
    pub format: LogFormat,

    /// Output destination.
    pub output: LogOutput,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
            output: LogOutput::Stderr,
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level (most verbose).
    Trace,
    /// Debug level.
    Debug,
    /// Info level (default).
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level (least verbose).
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (machine-readable).
    Json,
    /// Pretty format with colors (default).
    #[default]
    Pretty,
    /// Compact single-line format.
    Compact,
}

/// Log output destination.
///
/// Resolved contexts go to stdout, so logs default to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Standard output.
    Stdout,
    /// Standard error (default).
    #[default]
    Stderr,
}
