//! Directional TLS contexts.

use super::builder::build_common_tls_context;
use super::context::{DownstreamTlsContext, UpstreamTlsContext};
use super::error::ResolveResult;
use super::secret::SecretSnapshot;
use super::types::{SslConfig, UpstreamSslConfig};

/// Build the client-side context used when the proxy connects to an upstream.
///
/// The configured SNI is copied verbatim; an empty SNI is allowed.
///
/// # Errors
///
/// Returns any error from [`build_common_tls_context`] unchanged.
pub fn build_upstream_tls_context(
    config: &UpstreamSslConfig,
    snapshot: &SecretSnapshot,
) -> ResolveResult<UpstreamTlsContext> {
    let common_tls_context = build_common_tls_context(config.source(), snapshot)?;
    Ok(UpstreamTlsContext {
        common_tls_context,
        sni: config.sni().to_string(),
    })
}

/// Build the server-side context used by a proxy listener.
///
/// # Client certificate policy
///
/// Client certificates are required **if and only if** a root CA is
/// configured. There is no separate switch: configuring a root CA on a
/// listener turns on mutual TLS, and leaving it out turns it off. Removing
/// the root CA from a secret therefore silently disables client
/// certificate enforcement for every listener using that secret.
///
/// # Errors
///
/// Returns any error from [`build_common_tls_context`] unchanged.
pub fn build_downstream_tls_context(
    config: &SslConfig,
    snapshot: &SecretSnapshot,
) -> ResolveResult<DownstreamTlsContext> {
    let common_tls_context = build_common_tls_context(config.source(), snapshot)?;
    let require_client_certificate = common_tls_context.validation_context.is_some();
    Ok(DownstreamTlsContext {
        common_tls_context,
        require_client_certificate,
    })
}
