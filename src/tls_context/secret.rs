//! Secrets and the read-only secret snapshot.
//!
//! The snapshot is filled and refreshed by the secret store; resolution only
//! ever borrows it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::error::SecretKindError;
use super::types::ResourceRef;

/// A stored secret.
///
/// In configuration documents the payload is one of the `tls`, `aws`,
/// `azure` or `opaque` tables next to `name` and `namespace`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSecret", into = "RawSecret")]
pub struct Secret {
    /// Secret identity.
    pub metadata: ResourceRef,
    /// Secret payload.
    pub kind: SecretKind,
}

impl Secret {
    /// Create a new secret.
    pub fn new(metadata: ResourceRef, kind: SecretKind) -> Self {
        Self { metadata, kind }
    }

    /// Create a TLS secret.
    pub fn tls(
        metadata: ResourceRef,
        cert_chain: impl Into<String>,
        private_key: impl Into<String>,
        root_ca: impl Into<String>,
    ) -> Self {
        Self::new(
            metadata,
            SecretKind::Tls(TlsSecret {
                cert_chain: cert_chain.into(),
                private_key: private_key.into(),
                root_ca: root_ca.into(),
            }),
        )
    }

    /// Get the secret type.
    pub fn secret_type(&self) -> SecretType {
        self.kind.secret_type()
    }

    /// Check if this is a TLS secret.
    pub fn is_tls(&self) -> bool {
        matches!(self.kind, SecretKind::Tls(_))
    }
}

/// Secret payload variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretKind {
    /// TLS certificate material.
    Tls(TlsSecret),
    /// AWS credentials.
    Aws(AwsSecret),
    /// Azure function keys.
    Azure(AzureSecret),
    /// Arbitrary key/value data.
    Opaque(OpaqueSecret),
}

impl SecretKind {
    /// Get the type tag of this payload.
    pub fn secret_type(&self) -> SecretType {
        match self {
            Self::Tls(_) => SecretType::Tls,
            Self::Aws(_) => SecretType::Aws,
            Self::Azure(_) => SecretType::Azure,
            Self::Opaque(_) => SecretType::Opaque,
        }
    }
}

/// On-disk shape of a secret: identity plus four optional kind tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawSecret {
    #[serde(flatten)]
    metadata: ResourceRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tls: Option<TlsSecret>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    aws: Option<AwsSecret>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    azure: Option<AzureSecret>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    opaque: Option<OpaqueSecret>,
}

impl TryFrom<RawSecret> for Secret {
    type Error = SecretKindError;

    fn try_from(raw: RawSecret) -> Result<Self, Self::Error> {
        let mut kinds: Vec<SecretKind> = [
            raw.tls.map(SecretKind::Tls),
            raw.aws.map(SecretKind::Aws),
            raw.azure.map(SecretKind::Azure),
            raw.opaque.map(SecretKind::Opaque),
        ]
        .into_iter()
        .flatten()
        .collect();

        let found = kinds.len();
        match (kinds.pop(), found) {
            (Some(kind), 1) => Ok(Self::new(raw.metadata, kind)),
            _ => Err(SecretKindError { found }),
        }
    }
}

impl From<Secret> for RawSecret {
    fn from(secret: Secret) -> Self {
        let mut raw = Self {
            metadata: secret.metadata,
            tls: None,
            aws: None,
            azure: None,
            opaque: None,
        };
        match secret.kind {
            SecretKind::Tls(tls) => raw.tls = Some(tls),
            SecretKind::Aws(aws) => raw.aws = Some(aws),
            SecretKind::Azure(azure) => raw.azure = Some(azure),
            SecretKind::Opaque(opaque) => raw.opaque = Some(opaque),
        }
        raw
    }
}

/// TLS material. Empty strings mean "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsSecret {
    /// PEM certificate chain.
    pub cert_chain: String,
    /// PEM private key.
    pub private_key: String,
    /// PEM root CA bundle.
    pub root_ca: String,
}

/// AWS credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsSecret {
    /// Access key ID.
    pub access_key: String,
    /// Secret access key.
    pub secret_key: String,
}

/// Azure function API keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureSecret {
    /// Keys by name.
    pub api_keys: BTreeMap<String, String>,
}

/// Opaque secret data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpaqueSecret {
    /// Data by key.
    pub data: BTreeMap<String, String>,
}

/// Secret type tag, reported when a secret has the wrong kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecretType {
    /// TLS.
    Tls,
    /// AWS.
    Aws,
    /// Azure.
    Azure,
    /// Opaque.
    Opaque,
}

impl fmt::Display for SecretType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tls => write!(f, "tls"),
            Self::Aws => write!(f, "aws"),
            Self::Azure => write!(f, "azure"),
            Self::Opaque => write!(f, "opaque"),
        }
    }
}

/// Ordered, read-only view of the secrets known at one point in time.
///
/// References are assumed unique; the store that builds the snapshot
/// enforces that. Lookups return the first match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretSnapshot {
    secrets: Vec<Secret>,
}

impl SecretSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a secret to the end of the snapshot.
    #[must_use]
    pub fn with_secret(mut self, secret: Secret) -> Self {
        self.secrets.push(secret);
        self
    }

    /// Find a secret by reference.
    pub fn find(&self, secret_ref: &ResourceRef) -> Option<&Secret> {
        self.secrets.iter().find(|s| &s.metadata == secret_ref)
    }

    /// Iterate over secrets in snapshot order.
    pub fn iter(&self) -> impl Iterator<Item = &Secret> {
        self.secrets.iter()
    }

    /// Get the number of secrets.
    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    /// Check if the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

impl From<Vec<Secret>> for SecretSnapshot {
    fn from(secrets: Vec<Secret>) -> Self {
        Self { secrets }
    }
}

impl FromIterator<Secret> for SecretSnapshot {
    fn from_iter<I: IntoIterator<Item = Secret>>(iter: I) -> Self {
        Self {
            secrets: iter.into_iter().collect(),
        }
    }
}
