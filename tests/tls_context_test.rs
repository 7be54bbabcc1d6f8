//! Integration tests for TLS context resolution.

use r0n_tls_context::tls_context::{
    build_common_tls_context, build_downstream_tls_context, build_upstream_tls_context,
    AwsSecret, CertificateField, DataSource, ResolveError, ResourceRef, Secret, SecretKind,
    SecretSnapshot, SecretType, SslConfig, SslConfigSource, SslFiles, UpstreamSslConfig,
};
use serde_json::json;

fn edge_ref() -> ResourceRef {
    ResourceRef::new("gloo-system", "edge-cert")
}

fn snapshot() -> SecretSnapshot {
    SecretSnapshot::new()
        .with_secret(Secret::tls(edge_ref(), "C", "K", ""))
        .with_secret(Secret::tls(
            ResourceRef::new("gloo-system", "mtls-cert"),
            "C",
            "K",
            "CA",
        ))
        .with_secret(Secret::new(
            ResourceRef::new("gloo-system", "aws-creds"),
            SecretKind::Aws(AwsSecret {
                access_key: "AKIA".to_string(),
                secret_key: "secret".to_string(),
            }),
        ))
}

/// Every source shape the resolver accepts, good and bad.
fn sources() -> Vec<Option<SslConfigSource>> {
    let mut sources = vec![None];
    for name in ["edge-cert", "mtls-cert", "aws-creds", "missing"] {
        sources.push(Some(SslConfigSource::SecretRef(ResourceRef::new(
            "gloo-system",
            name,
        ))));
    }
    for chain in ["", "/etc/c.pem"] {
        for key in ["", "/etc/k.pem"] {
            for ca in ["", "/etc/ca.pem"] {
                sources.push(Some(SslConfigSource::InlineFiles(
                    SslFiles::new(chain, key).with_root_ca(ca),
                )));
            }
        }
    }
    sources
}

// Secret-sourced pair without a root CA.
#[test]
fn test_secret_pair_without_root_ca() {
    let config = SslConfig::new(SslConfigSource::SecretRef(edge_ref()));
    let context = build_downstream_tls_context(&config, &snapshot()).unwrap();

    let cert = context.common().tls_certificate().unwrap();
    assert_eq!(cert.certificate_chain(), &DataSource::Inline("C".to_string()));
    assert_eq!(cert.private_key(), &DataSource::Inline("K".to_string()));
    assert!(context.common().validation_context().is_none());
    assert!(!context.require_client_certificate());
}

#[test]
fn test_secret_absent() {
    let secret_ref = ResourceRef::new("gloo-system", "missing");
    let config = SslConfig::new(SslConfigSource::SecretRef(secret_ref.clone()));

    let err = build_downstream_tls_context(&config, &snapshot()).unwrap_err();
    assert_eq!(err, ResolveError::SecretNotFound { secret_ref });
}

#[test]
fn test_file_paths_with_root_ca() {
    let config = SslConfig::new(SslConfigSource::InlineFiles(
        SslFiles::new("/etc/c.pem", "/etc/k.pem").with_root_ca("/etc/ca.pem"),
    ));
    let context = build_downstream_tls_context(&config, &snapshot()).unwrap();

    let cert = context.common().tls_certificate().unwrap();
    assert_eq!(
        cert.certificate_chain(),
        &DataSource::FilePath("/etc/c.pem".to_string())
    );
    assert_eq!(
        cert.private_key(),
        &DataSource::FilePath("/etc/k.pem".to_string())
    );
    assert_eq!(
        context.common().validation_context().unwrap().trusted_ca(),
        &DataSource::FilePath("/etc/ca.pem".to_string())
    );
    assert!(context.require_client_certificate());
}

#[test]
fn test_file_chain_without_key() {
    let config = SslConfig::new(SslConfigSource::InlineFiles(SslFiles::new(
        "/etc/c.pem",
        "",
    )));

    let err = build_downstream_tls_context(&config, &snapshot()).unwrap_err();
    assert_eq!(
        err,
        ResolveError::IncompleteCertificatePair {
            missing: CertificateField::PrivateKey,
        }
    );
}

#[test]
fn test_no_source() {
    let err = build_downstream_tls_context(&SslConfig::empty(), &snapshot()).unwrap_err();
    assert_eq!(err, ResolveError::MissingCertificateSource);

    let err = build_upstream_tls_context(&UpstreamSslConfig::empty(), &snapshot()).unwrap_err();
    assert_eq!(err, ResolveError::MissingCertificateSource);
}

#[test]
fn test_secret_wrong_kind() {
    let secret_ref = ResourceRef::new("gloo-system", "aws-creds");
    let config = UpstreamSslConfig::new(SslConfigSource::SecretRef(secret_ref.clone()));

    let err = build_upstream_tls_context(&config, &snapshot()).unwrap_err();
    assert_eq!(
        err,
        ResolveError::WrongSecretKind {
            secret_ref,
            actual: SecretType::Aws,
        }
    );
}

#[test]
fn test_incomplete_pair_always_fails() {
    let snapshot = snapshot();
    for source in sources() {
        if let Some(SslConfigSource::InlineFiles(files)) = &source {
            if files.tls_cert.is_empty() != files.tls_key.is_empty() {
                let err = build_common_tls_context(source.as_ref(), &snapshot).unwrap_err();
                assert!(
                    matches!(err, ResolveError::IncompleteCertificatePair { .. }),
                    "{files:?}"
                );
            }
        }
    }
}

#[test]
fn test_client_cert_required_iff_validation_context() {
    let snapshot = snapshot();
    for source in sources() {
        let config = source.map(SslConfig::new).unwrap_or_default();
        if let Ok(context) = build_downstream_tls_context(&config, &snapshot) {
            assert_eq!(
                context.require_client_certificate(),
                context.common().validation_context().is_some()
            );
        }
    }
}

#[test]
fn test_data_sources_never_mixed() {
    let snapshot = snapshot();
    for source in sources() {
        let Ok(context) = build_common_tls_context(source.as_ref(), &snapshot) else {
            continue;
        };
        let expect_inline = matches!(source, Some(SslConfigSource::SecretRef(_)));
        for data_source in context.data_sources() {
            assert_eq!(data_source.is_inline(), expect_inline, "{source:?}");
        }
    }
}

#[test]
fn test_alpn_is_fixed() {
    let snapshot = snapshot();
    let mut resolved = 0;
    for source in sources() {
        if let Ok(context) = build_common_tls_context(source.as_ref(), &snapshot) {
            assert_eq!(context.alpn_protocols(), ["h2", "http/1.1"]);
            resolved += 1;
        }
    }
    assert!(resolved > 0);
}

#[test]
fn test_resolution_is_idempotent() {
    let snapshot = snapshot();
    for source in sources() {
        let first = build_common_tls_context(source.as_ref(), &snapshot);
        let second = build_common_tls_context(source.as_ref(), &snapshot);
        assert_eq!(first, second);
    }
}

#[test]
fn test_upstream_wire_shape() {
    let config =
        UpstreamSslConfig::new(SslConfigSource::SecretRef(edge_ref())).with_sni("api.internal");
    let context = build_upstream_tls_context(&config, &snapshot()).unwrap();

    assert_eq!(
        serde_json::to_value(&context).unwrap(),
        json!({
            "common_tls_context": {
                "tls_params": {},
                "tls_certificates": [{
                    "certificate_chain": { "inline_string": "C" },
                    "private_key": { "inline_string": "K" }
                }],
                "alpn_protocols": ["h2", "http/1.1"]
            },
            "sni": "api.internal"
        })
    );
}

#[test]
fn test_downstream_wire_shape() {
    let config = SslConfig::new(SslConfigSource::InlineFiles(
        SslFiles::new("/etc/c.pem", "/etc/k.pem").with_root_ca("/etc/ca.pem"),
    ));
    let context = build_downstream_tls_context(&config, &snapshot()).unwrap();

    assert_eq!(
        serde_json::to_value(&context).unwrap(),
        json!({
            "common_tls_context": {
                "tls_params": {},
                "tls_certificates": [{
                    "certificate_chain": { "filename": "/etc/c.pem" },
                    "private_key": { "filename": "/etc/k.pem" }
                }],
                "validation_context": {
                    "trusted_ca": { "filename": "/etc/ca.pem" }
                },
                "alpn_protocols": ["h2", "http/1.1"]
            },
            "require_client_certificate": true
        })
    );
}

#[test]
fn test_validation_only_wire_shape() {
    let config = SslConfig::new(SslConfigSource::InlineFiles(
        SslFiles::default().with_root_ca("/etc/ca.pem"),
    ));
    let context = build_downstream_tls_context(&config, &snapshot()).unwrap();
    let value = serde_json::to_value(&context).unwrap();

    assert!(value["common_tls_context"].get("tls_certificates").is_none());
    assert_eq!(value["require_client_certificate"], json!(true));
}

#[test]
fn test_concurrent_resolution_shares_snapshot() {
    let snapshot = snapshot();
    let config = SslConfig::new(SslConfigSource::SecretRef(ResourceRef::new(
        "gloo-system",
        "mtls-cert",
    )));
    let expected = build_downstream_tls_context(&config, &snapshot).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| build_downstream_tls_context(&config, &snapshot)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), expected);
        }
    });
}
