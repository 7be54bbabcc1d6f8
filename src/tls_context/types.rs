//! SSL configuration input types.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::SourceConflictError;

/// Identity of a secret: name plus namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceRef {
    /// Resource name.
    pub name: String,
    /// Namespace the resource lives in.
    pub namespace: String,
}

impl ResourceRef {
    /// Create a new resource reference.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

/// Paths to TLS material on the proxy's filesystem.
///
/// The files are not opened here; the proxy reads them when it loads the
/// listener or cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SslFiles {
    /// Certificate chain path.
    pub tls_cert: String,
    /// Private key path.
    pub tls_key: String,
    /// Root CA path.
    pub root_ca: String,
}

impl SslFiles {
    /// Create a file source for a certificate pair.
    pub fn new(tls_cert: impl Into<String>, tls_key: impl Into<String>) -> Self {
        Self {
            tls_cert: tls_cert.into(),
            tls_key: tls_key.into(),
            root_ca: String::new(),
        }
    }

    /// Set the root CA path.
    #[must_use]
    pub fn with_root_ca(mut self, root_ca: impl Into<String>) -> Self {
        self.root_ca = root_ca.into();
        self
    }
}

/// Where the certificate material for one context comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SslConfigSource {
    /// Material is taken from a TLS secret and inlined into the context.
    SecretRef(ResourceRef),
    /// Material is referenced by path and read by the proxy at load time.
    InlineFiles(SslFiles),
}

impl SslConfigSource {
    /// Combine the two optional source fields of a configuration block.
    ///
    /// # Errors
    ///
    /// Returns an error if both fields are set.
    pub fn from_parts(
        secret_ref: Option<ResourceRef>,
        ssl_files: Option<SslFiles>,
    ) -> Result<Option<Self>, SourceConflictError> {
        match (secret_ref, ssl_files) {
            (Some(_), Some(_)) => Err(SourceConflictError),
            (Some(secret_ref), None) => Ok(Some(Self::SecretRef(secret_ref))),
            (None, Some(files)) => Ok(Some(Self::InlineFiles(files))),
            (None, None) => Ok(None),
        }
    }

    fn into_parts(source: Option<Self>) -> (Option<ResourceRef>, Option<SslFiles>) {
        match source {
            Some(Self::SecretRef(secret_ref)) => (Some(secret_ref), None),
            Some(Self::InlineFiles(files)) => (None, Some(files)),
            None => (None, None),
        }
    }
}

/// Field of a certificate bundle, used to name what is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateField {
    /// Certificate chain.
    CertificateChain,
    /// Private key.
    PrivateKey,
}

impl fmt::Display for CertificateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CertificateChain => write!(f, "certificate chain"),
            Self::PrivateKey => write!(f, "private key"),
        }
    }
}

/// On-disk shape of an SSL block: two optional source fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawSslConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    secret_ref: Option<ResourceRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ssl_files: Option<SslFiles>,
}

/// SSL configuration of a downstream listener or route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSslConfig", into = "RawSslConfig")]
pub struct SslConfig {
    source: Option<SslConfigSource>,
}

impl SslConfig {
    /// Create a config with the given source.
    pub fn new(source: SslConfigSource) -> Self {
        Self {
            source: Some(source),
        }
    }

    /// Create a config that names no certificate source at all.
    pub fn empty() -> Self {
        Self { source: None }
    }

    /// Get the certificate source, if any.
    pub fn source(&self) -> Option<&SslConfigSource> {
        self.source.as_ref()
    }
}

impl TryFrom<RawSslConfig> for SslConfig {
    type Error = SourceConflictError;

    fn try_from(raw: RawSslConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            source: SslConfigSource::from_parts(raw.secret_ref, raw.ssl_files)?,
        })
    }
}

impl From<SslConfig> for RawSslConfig {
    fn from(config: SslConfig) -> Self {
        let (secret_ref, ssl_files) = SslConfigSource::into_parts(config.source);
        Self {
            secret_ref,
            ssl_files,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawUpstreamSslConfig {
    #[serde(flatten)]
    source: RawSslConfig,
    #[serde(default)]
    sni: String,
}

/// SSL configuration of an upstream (the proxy acts as TLS client).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawUpstreamSslConfig", into = "RawUpstreamSslConfig")]
pub struct UpstreamSslConfig {
    source: Option<SslConfigSource>,
    sni: String,
}

impl UpstreamSslConfig {
    /// Create an upstream config with the given source and no SNI.
    pub fn new(source: SslConfigSource) -> Self {
        Self {
            source: Some(source),
            sni: String::new(),
        }
    }

    /// Create an upstream config that names no certificate source.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set the SNI sent to the upstream.
    #[must_use]
    pub fn with_sni(mut self, sni: impl Into<String>) -> Self {
        self.sni = sni.into();
        self
    }

    /// Get the certificate source, if any.
    pub fn source(&self) -> Option<&SslConfigSource> {
        self.source.as_ref()
    }

    /// Get the SNI value.
    pub fn sni(&self) -> &str {
        &self.sni
    }
}

impl TryFrom<RawUpstreamSslConfig> for UpstreamSslConfig {
    type Error = SourceConflictError;

    fn try_from(raw: RawUpstreamSslConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            source: SslConfigSource::from_parts(raw.source.secret_ref, raw.source.ssl_files)?,
            sni: raw.sni,
        })
    }
}

impl From<UpstreamSslConfig> for RawUpstreamSslConfig {
    fn from(config: UpstreamSslConfig) -> Self {
        let (secret_ref, ssl_files) = SslConfigSource::into_parts(config.source);
        Self {
            source: RawSslConfig {
                secret_ref,
                ssl_files,
            },
            sni: config.sni,
        }
    }
}
