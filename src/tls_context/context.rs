//! Wire-level TLS context types.
//!
//! These serialize to the field names of the proxy's TLS configuration
//! schema (`common_tls_context`, `tls_certificates`, `trusted_ca`, ...), so
//! the JSON output can be embedded in a listener or cluster as is.
//!
//! Values are only produced by the builders in this module; fields are
//! read-only so the pairing and mTLS rules cannot be bypassed.

use serde::{Serialize, Serializer};

/// ALPN protocols advertised on every context.
pub const DEFAULT_ALPN_PROTOCOLS: [&str; 2] = ["h2", "http/1.1"];

/// How the proxy obtains the bytes of one TLS field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DataSource {
    /// Content embedded in the configuration.
    #[serde(rename = "inline_string")]
    Inline(String),
    /// Path read by the proxy when it loads the context.
    #[serde(rename = "filename")]
    FilePath(String),
}

impl DataSource {
    /// Get the inline content or path.
    pub fn value(&self) -> &str {
        match self {
            Self::Inline(value) | Self::FilePath(value) => value,
        }
    }

    /// Check if this is inline content.
    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Inline(_))
    }
}

/// Certificate chain and private key served by the proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TlsCertificate {
    pub(crate) certificate_chain: DataSource,
    pub(crate) private_key: DataSource,
}

impl TlsCertificate {
    /// Get the certificate chain.
    pub fn certificate_chain(&self) -> &DataSource {
        &self.certificate_chain
    }

    /// Get the private key.
    pub fn private_key(&self) -> &DataSource {
        &self.private_key
    }
}

/// Peer certificate validation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateValidationContext {
    pub(crate) trusted_ca: DataSource,
}

impl CertificateValidationContext {
    /// Get the trusted CA bundle.
    pub fn trusted_ca(&self) -> &DataSource {
        &self.trusted_ca
    }
}

/// TLS protocol parameters. Always left at the proxy's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TlsParameters {}

/// Direction-independent TLS context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommonTlsContext {
    pub(crate) tls_params: TlsParameters,
    #[serde(
        rename = "tls_certificates",
        serialize_with = "serialize_as_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) tls_certificate: Option<TlsCertificate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) validation_context: Option<CertificateValidationContext>,
    pub(crate) alpn_protocols: Vec<String>,
}

impl CommonTlsContext {
    /// Get the certificate pair, if configured.
    pub fn tls_certificate(&self) -> Option<&TlsCertificate> {
        self.tls_certificate.as_ref()
    }

    /// Get the validation context, if a root CA was configured.
    pub fn validation_context(&self) -> Option<&CertificateValidationContext> {
        self.validation_context.as_ref()
    }

    /// Get the ALPN protocol list.
    pub fn alpn_protocols(&self) -> &[String] {
        &self.alpn_protocols
    }

    /// Get the TLS parameters.
    pub fn tls_params(&self) -> &TlsParameters {
        &self.tls_params
    }

    /// Iterate over every populated data source in the context.
    pub fn data_sources(&self) -> impl Iterator<Item = &DataSource> {
        self.tls_certificate
            .iter()
            .flat_map(|cert| [&cert.certificate_chain, &cert.private_key])
            .chain(self.validation_context.iter().map(|v| &v.trusted_ca))
    }
}

fn serialize_as_list<S: Serializer>(
    certificate: &Option<TlsCertificate>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(certificate.iter())
}

/// TLS context for connections from the proxy to an upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpstreamTlsContext {
    pub(crate) common_tls_context: CommonTlsContext,
    pub(crate) sni: String,
}

impl UpstreamTlsContext {
    /// Get the common context.
    pub fn common(&self) -> &CommonTlsContext {
        &self.common_tls_context
    }

    /// Get the SNI sent to the upstream.
    pub fn sni(&self) -> &str {
        &self.sni
    }
}

/// TLS context for connections accepted by a proxy listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownstreamTlsContext {
    pub(crate) common_tls_context: CommonTlsContext,
    #[serde(skip_serializing_if = "is_false")]
    pub(crate) require_client_certificate: bool,
}

impl DownstreamTlsContext {
    /// Get the common context.
    pub fn common(&self) -> &CommonTlsContext {
        &self.common_tls_context
    }

    /// Whether clients must present a certificate.
    pub fn require_client_certificate(&self) -> bool {
        self.require_client_certificate
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}
