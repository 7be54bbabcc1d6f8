//! TLS context resolution error types.

use thiserror::Error;

use super::secret::SecretType;
use super::types::{CertificateField, ResourceRef};

/// Errors that can occur while resolving an SSL configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The referenced secret is not in the snapshot.
    #[error("SSL secret not found: {secret_ref}")]
    SecretNotFound {
        /// The missing secret.
        secret_ref: ResourceRef,
    },

    /// The referenced secret exists but does not hold TLS material.
    #[error("{secret_ref} is not a TLS secret (found {actual} secret)")]
    WrongSecretKind {
        /// The offending secret.
        secret_ref: ResourceRef,
        /// Kind the secret actually has.
        actual: SecretType,
    },

    /// Neither a secret reference nor file paths were configured.
    #[error("no certificate information found")]
    MissingCertificateSource,

    /// Exactly one half of the certificate pair was supplied.
    #[error("both or none of cert chain and private key must be provided: {missing} is missing")]
    IncompleteCertificatePair {
        /// The half that was not supplied.
        missing: CertificateField,
    },
}

impl ResolveError {
    /// Secret reference the error is about, if any.
    pub fn secret_ref(&self) -> Option<&ResourceRef> {
        match self {
            Self::SecretNotFound { secret_ref } | Self::WrongSecretKind { secret_ref, .. } => {
                Some(secret_ref)
            },
            Self::MissingCertificateSource | Self::IncompleteCertificatePair { .. } => None,
        }
    }
}

/// An SSL block set both `secret_ref` and `ssl_files`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("ssl config sets both secret_ref and ssl_files; exactly one certificate source is allowed")]
pub struct SourceConflictError;

/// A secret entry set no kind table, or more than one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("secret sets {found} kind tables; exactly one of tls, aws, azure, opaque is required")]
pub struct SecretKindError {
    /// Number of kind tables present.
    pub found: usize,
}

/// Result type alias for resolution operations.
pub type ResolveResult<T> = Result<T, ResolveError>;
