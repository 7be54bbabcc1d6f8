//! Translation pass: resolves every upstream and listener of a configuration.
//!
//! One failing entry never stops the pass; failures are collected alongside
//! the contexts that did resolve.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info, warn};

use crate::config::ResolverConfig;
use crate::tls_context::{
    build_downstream_tls_context, build_upstream_tls_context, DownstreamTlsContext, ResolveError,
    SecretSnapshot, UpstreamTlsContext,
};

/// Which side of the proxy an entry configures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Proxy to upstream.
    Upstream,
    /// Client to proxy listener.
    Downstream,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upstream => write!(f, "upstream"),
            Self::Downstream => write!(f, "listener"),
        }
    }
}

/// An entry that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationFailure {
    /// Entry direction.
    pub direction: Direction,
    /// Entry name.
    pub name: String,
    /// Why resolution failed.
    pub error: ResolveError,
}

impl fmt::Display for TranslationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}': {}", self.direction, self.name, self.error)
    }
}

/// Output of a translation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TranslationReport {
    /// Resolved upstream contexts by upstream name.
    pub upstreams: BTreeMap<String, UpstreamTlsContext>,
    /// Resolved listener contexts by listener name.
    pub listeners: BTreeMap<String, DownstreamTlsContext>,
    /// Entries that failed, in configuration order.
    #[serde(skip)]
    pub failures: Vec<TranslationFailure>,
}

impl TranslationReport {
    /// Check if any entry failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Number of contexts resolved.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.upstreams.len() + self.listeners.len()
    }
}

/// Resolve every entry against the secrets defined in `config`.
#[must_use]
pub fn translate(config: &ResolverConfig) -> TranslationReport {
    translate_with_snapshot(config, &config.secret_snapshot())
}

/// Resolve every entry against an externally supplied snapshot.
#[must_use]
pub fn translate_with_snapshot(
    config: &ResolverConfig,
    snapshot: &SecretSnapshot,
) -> TranslationReport {
    let mut report = TranslationReport::default();

    for upstream in &config.upstreams {
        match build_upstream_tls_context(&upstream.ssl, snapshot) {
            Ok(context) => {
                debug!(upstream = %upstream.name, sni = %context.sni(), "Resolved upstream TLS context");
                report.upstreams.insert(upstream.name.clone(), context);
            },
            Err(error) => {
                warn!(upstream = %upstream.name, error = %error, "Failed to resolve upstream TLS context");
                report.failures.push(TranslationFailure {
                    direction: Direction::Upstream,
                    name: upstream.name.clone(),
                    error,
                });
            },
        }
    }

    for listener in &config.listeners {
        match build_downstream_tls_context(&listener.ssl, snapshot) {
            Ok(context) => {
                debug!(
                    listener = %listener.name,
                    require_client_certificate = context.require_client_certificate(),
                    "Resolved listener TLS context"
                );
                report.listeners.insert(listener.name.clone(), context);
            },
            Err(error) => {
                warn!(listener = %listener.name, error = %error, "Failed to resolve listener TLS context");
                report.failures.push(TranslationFailure {
                    direction: Direction::Downstream,
                    name: listener.name.clone(),
                    error,
                });
            },
        }
    }

    info!(
        resolved = report.resolved_count(),
        failed = report.failures.len(),
        secrets = snapshot.len(),
        "Translation pass complete"
    );

    report
}
