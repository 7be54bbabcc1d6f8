//! Secret lookup for secret-sourced TLS material.

use super::error::{ResolveError, ResolveResult};
use super::secret::{SecretKind, SecretSnapshot, TlsSecret};
use super::types::ResourceRef;

/// Look up a TLS secret by reference.
///
/// # Errors
///
/// Returns [`ResolveError::SecretNotFound`] if no secret matches the reference
/// and [`ResolveError::WrongSecretKind`] if the match is not a TLS secret.
pub fn resolve_tls_secret<'a>(
    secret_ref: &ResourceRef,
    snapshot: &'a SecretSnapshot,
) -> ResolveResult<&'a TlsSecret> {
    let secret = snapshot
        .find(secret_ref)
        .ok_or_else(|| ResolveError::SecretNotFound {
            secret_ref: secret_ref.clone(),
        })?;

    match &secret.kind {
        SecretKind::Tls(tls) => Ok(tls),
        other => Err(ResolveError::WrongSecretKind {
            secret_ref: secret_ref.clone(),
            actual: other.secret_type(),
        }),
    }
}
