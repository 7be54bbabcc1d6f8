//! TLS Context Module
//!
//! Turns the SSL configuration attached to a listener or upstream into the
//! TLS context the proxy consumes. It supports:
//! - Secret-sourced material, inlined into the context
//! - File-sourced material, passed through as paths for the proxy to read
//! - Certificate pair validation (chain and key are both set or both unset)
//! - Upstream contexts carrying an SNI hint
//! - Downstream contexts where a root CA turns on mutual TLS
//!
//! Every operation is a pure function of its inputs. The secret snapshot is
//! only borrowed, so many resolutions can share one snapshot without locking.
//! Nothing here logs; callers report errors.

mod adapter;
mod builder;
mod context;
mod error;
mod resolver;
mod secret;
mod types;

pub use adapter::{build_downstream_tls_context, build_upstream_tls_context};
pub use builder::build_common_tls_context;
pub use context::{
    CertificateValidationContext, CommonTlsContext, DataSource, DownstreamTlsContext,
    TlsCertificate, TlsParameters, UpstreamTlsContext, DEFAULT_ALPN_PROTOCOLS,
};
pub use error::{ResolveError, ResolveResult, SecretKindError, SourceConflictError};
pub use resolver::resolve_tls_secret;
pub use secret::{
    AwsSecret, AzureSecret, OpaqueSecret, Secret, SecretKind, SecretSnapshot, SecretType,
    TlsSecret,
};
pub use types::{
    CertificateField, ResourceRef, SslConfig, SslConfigSource, SslFiles, UpstreamSslConfig,
};
