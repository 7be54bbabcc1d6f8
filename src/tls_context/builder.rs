//! Common TLS context construction.

use super::context::{
    CertificateValidationContext, CommonTlsContext, DataSource, TlsCertificate, TlsParameters,
    DEFAULT_ALPN_PROTOCOLS,
};
use super::error::{ResolveError, ResolveResult};
use super::resolver::resolve_tls_secret;
use super::secret::SecretSnapshot;
use super::types::{CertificateField, SslConfigSource};

/// How every field of one context is handed to the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourcingMode {
    /// Secret-sourced: content is inlined.
    Inline,
    /// File-sourced: paths are passed through.
    FilePath,
}

impl SourcingMode {
    /// Wrap a field value. Empty values are "not supplied".
    fn data_source(self, value: &str) -> Option<DataSource> {
        if value.is_empty() {
            return None;
        }
        Some(match self {
            Self::Inline => DataSource::Inline(value.to_string()),
            Self::FilePath => DataSource::FilePath(value.to_string()),
        })
    }
}

/// Build the direction-independent TLS context for a certificate source.
///
/// Secret references are looked up in `snapshot` and their content inlined;
/// file paths are passed through untouched for the proxy to read later.
/// Nothing is returned on failure.
///
/// # Errors
///
/// - [`ResolveError::MissingCertificateSource`] if `source` is `None`
/// - [`ResolveError::SecretNotFound`] / [`ResolveError::WrongSecretKind`]
///   if the referenced secret cannot be used
/// - [`ResolveError::IncompleteCertificatePair`] if only one of chain and key
///   is supplied
pub fn build_common_tls_context(
    source: Option<&SslConfigSource>,
    snapshot: &SecretSnapshot,
) -> ResolveResult<CommonTlsContext> {
    let (mode, cert_chain, private_key, root_ca) = match source {
        Some(SslConfigSource::SecretRef(secret_ref)) => {
            let tls = resolve_tls_secret(secret_ref, snapshot)?;
            (
                SourcingMode::Inline,
                tls.cert_chain.as_str(),
                tls.private_key.as_str(),
                tls.root_ca.as_str(),
            )
        },
        Some(SslConfigSource::InlineFiles(files)) => (
            SourcingMode::FilePath,
            files.tls_cert.as_str(),
            files.tls_key.as_str(),
            files.root_ca.as_str(),
        ),
        None => return Err(ResolveError::MissingCertificateSource),
    };

    let tls_certificate = match (
        mode.data_source(cert_chain),
        mode.data_source(private_key),
    ) {
        (Some(certificate_chain), Some(private_key)) => Some(TlsCertificate {
            certificate_chain,
            private_key,
        }),
        (None, None) => None,
        (Some(_), None) => {
            return Err(ResolveError::IncompleteCertificatePair {
                missing: CertificateField::PrivateKey,
            })
        },
        (None, Some(_)) => {
            return Err(ResolveError::IncompleteCertificatePair {
                missing: CertificateField::CertificateChain,
            })
        },
    };

    let validation_context = mode
        .data_source(root_ca)
        .map(|trusted_ca| CertificateValidationContext { trusted_ca });

    Ok(CommonTlsContext {
        tls_params: TlsParameters::default(),
        tls_certificate,
        validation_context,
        alpn_protocols: DEFAULT_ALPN_PROTOCOLS
            .iter()
            .map(|p| (*p).to_string())
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tls_context::secret::{AwsSecret, Secret, SecretKind, SecretType};
    use crate::tls_context::types::{ResourceRef, SslFiles};

    fn secret_source(name: &str) -> SslConfigSource {
        SslConfigSource::SecretRef(ResourceRef::new("default", name))
    }

    fn snapshot() -> SecretSnapshot {
        SecretSnapshot::new()
            .with_secret(Secret::tls(ResourceRef::new("default", "pair"), "C", "K", ""))
            .with_secret(Secret::tls(
                ResourceRef::new("default", "mtls"),
                "C",
                "K",
                "CA",
            ))
            .with_secret(Secret::tls(ResourceRef::new("default", "ca-only"), "", "", "CA"))
            .with_secret(Secret::tls(ResourceRef::new("default", "chain-only"), "C", "", ""))
            .with_secret(Secret::new(
                ResourceRef::new("default", "aws"),
                SecretKind::Aws(AwsSecret::default()),
            ))
    }

    #[test]
    fn test_secret_pair_is_inlined() {
        let context = build_common_tls_context(Some(&secret_source("pair")), &snapshot()).unwrap();

        let cert = context.tls_certificate().unwrap();
        assert_eq!(cert.certificate_chain(), &DataSource::Inline("C".to_string()));
        assert_eq!(cert.private_key(), &DataSource::Inline("K".to_string()));
        assert!(context.validation_context().is_none());
    }

    #[test]
    fn test_secret_root_ca_is_inlined() {
        let context = build_common_tls_context(Some(&secret_source("mtls")), &snapshot()).unwrap();
        assert_eq!(
            context.validation_context().unwrap().trusted_ca(),
            &DataSource::Inline("CA".to_string())
        );
    }

    #[test]
    fn test_validation_only_context() {
        let context =
            build_common_tls_context(Some(&secret_source("ca-only")), &snapshot()).unwrap();
        assert!(context.tls_certificate().is_none());
        assert!(context.validation_context().is_some());
    }

    #[test]
    fn test_files_are_passed_through() {
        let source = SslConfigSource::InlineFiles(
            SslFiles::new("/etc/c.pem", "/etc/k.pem").with_root_ca("/etc/ca.pem"),
        );
        let context = build_common_tls_context(Some(&source), &SecretSnapshot::new()).unwrap();

        let cert = context.tls_certificate().unwrap();
        assert_eq!(
            cert.certificate_chain(),
            &DataSource::FilePath("/etc/c.pem".to_string())
        );
        assert_eq!(
            cert.private_key(),
            &DataSource::FilePath("/etc/k.pem".to_string())
        );
        assert_eq!(
            context.validation_context().unwrap().trusted_ca(),
            &DataSource::FilePath("/etc/ca.pem".to_string())
        );
    }

    #[test]
    fn test_empty_files_yield_bare_context() {
        let source = SslConfigSource::InlineFiles(SslFiles::default());
        let context = build_common_tls_context(Some(&source), &SecretSnapshot::new()).unwrap();
        assert!(context.tls_certificate().is_none());
        assert!(context.validation_context().is_none());
        assert_eq!(context.alpn_protocols(), ["h2", "http/1.1"]);
    }

    #[test]
    fn test_missing_source() {
        let err = build_common_tls_context(None, &snapshot()).unwrap_err();
        assert_eq!(err, ResolveError::MissingCertificateSource);
    }

    #[test]
    fn test_incomplete_pair_from_secret() {
        let err =
            build_common_tls_context(Some(&secret_source("chain-only")), &snapshot()).unwrap_err();
        assert_eq!(
            err,
            ResolveError::IncompleteCertificatePair {
                missing: CertificateField::PrivateKey,
            }
        );
    }

    #[test]
    fn test_incomplete_pair_from_files() {
        let source = SslConfigSource::InlineFiles(SslFiles::new("", "/etc/k.pem"));
        let err = build_common_tls_context(Some(&source), &SecretSnapshot::new()).unwrap_err();
        assert_eq!(
            err,
            ResolveError::IncompleteCertificatePair {
                missing: CertificateField::CertificateChain,
            }
        );
    }

    #[test]
    fn test_secret_errors_propagate() {
        let err = build_common_tls_context(Some(&secret_source("nope")), &snapshot()).unwrap_err();
        assert!(matches!(err, ResolveError::SecretNotFound { .. }));

        let err = build_common_tls_context(Some(&secret_source("aws")), &snapshot()).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::WrongSecretKind {
                actual: SecretType::Aws,
                ..
            }
        ));
    }

    #[test]
    fn test_sourcing_mode_skips_empty() {
        assert_eq!(SourcingMode::Inline.data_source(""), None);
        assert_eq!(SourcingMode::FilePath.data_source(""), None);
        assert_eq!(
            SourcingMode::FilePath.data_source("/x"),
            Some(DataSource::FilePath("/x".to_string()))
        );
    }
}
