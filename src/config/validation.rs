//! Configuration validation system.

use std::collections::HashSet;

use super::types::ResolverConfig;
use crate::tls_context::SslConfigSource;

/// A single validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field path that failed validation.
    pub field: String,
    /// Error message.
    pub message: String,
    /// Severity level.
    pub severity: ValidationSeverity,
}

impl ValidationError {
    /// Create a new error.
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: ValidationSeverity::Error,
        }
    }

    /// Create a new warning.
    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: ValidationSeverity::Warning,
        }
    }
}

/// Severity of validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationSeverity {
    /// Error - configuration is invalid.
    Error,
    /// Warning - configuration may have issues.
    Warning,
}

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Create a new empty (valid) result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error to the result.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Check if the validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self
            .errors
            .iter()
            .any(|e| e.severity == ValidationSeverity::Error)
    }

    /// Get all validation issues.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Get only errors (not warnings).
    #[must_use]
    pub fn errors_only(&self) -> Vec<&ValidationError> {
        self.errors
            .iter()
            .filter(|e| e.severity == ValidationSeverity::Error)
            .collect()
    }

    /// Get only warnings.
    #[must_use]
    pub fn warnings(&self) -> Vec<&ValidationError> {
        self.errors
            .iter()
            .filter(|e| e.severity == ValidationSeverity::Warning)
            .collect()
    }

    /// Merge another validation result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
    }
}

/// Trait for configuration validators.
pub trait Validator: std::fmt::Debug + Send + Sync {
    /// Validate a configuration and return any errors.
    fn validate(&self, config: &ResolverConfig) -> ValidationResult;
}

/// Built-in validator for names and secret identity.
#[derive(Debug, Default)]
pub struct BasicValidator;

impl BasicValidator {
    /// Create a new basic validator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Validator for BasicValidator {
    fn validate(&self, config: &ResolverConfig) -> ValidationResult {
        let mut result = ValidationResult::new();

        // Lookups return the first match, so a duplicate would shadow silently.
        let mut seen_secrets = HashSet::new();
        for secret in &config.secrets {
            if secret.metadata.name.is_empty() {
                result.add_error(ValidationError::error(
                    "secrets[].name",
                    "Secret name cannot be empty",
                ));
            }
            if !seen_secrets.insert(&secret.metadata) {
                result.add_error(ValidationError::error(
                    format!("secrets.{}", secret.metadata),
                    format!("Duplicate secret: {}", secret.metadata),
                ));
            }
        }

        let upstream_names = config.upstreams.iter().map(|u| u.name.as_str());
        check_names(&mut result, "upstreams", upstream_names);

        let listener_names = config.listeners.iter().map(|l| l.name.as_str());
        check_names(&mut result, "listeners", listener_names);

        result
    }
}

fn check_names<'a>(
    result: &mut ValidationResult,
    section: &str,
    names: impl Iterator<Item = &'a str>,
) {
    let mut seen = HashSet::new();
    for name in names {
        if name.is_empty() {
            result.add_error(ValidationError::error(
                format!("{section}[].name"),
                "Name cannot be empty",
            ));
        } else if !seen.insert(name) {
            result.add_error(ValidationError::error(
                format!("{section}.{name}"),
                format!("Duplicate name in {section}: {name}"),
            ));
        }
    }
}

/// Validator that flags secret references with no matching secret, or
/// whose secret holds no TLS material.
///
/// Only warns: at runtime the snapshot comes from the secret store, which may
/// know secrets this document does not list.
#[derive(Debug, Default)]
pub struct SecretReferenceValidator;

impl SecretReferenceValidator {
    /// Create a new secret reference validator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Validator for SecretReferenceValidator {
    fn validate(&self, config: &ResolverConfig) -> ValidationResult {
        let mut result = ValidationResult::new();

        let sources = config
            .upstreams
            .iter()
            .map(|u| ("upstreams", u.name.as_str(), u.ssl.source()))
            .chain(
                config
                    .listeners
                    .iter()
                    .map(|l| ("listeners", l.name.as_str(), l.ssl.source())),
            );

        for (section, name, source) in sources {
            if let Some(SslConfigSource::SecretRef(secret_ref)) = source {
                let field = format!("{section}.{name}.ssl.secret_ref");
                match config.secrets.iter().find(|s| &s.metadata == secret_ref) {
                    None => result.add_error(ValidationError::warning(
                        field,
                        format!("Secret {secret_ref} is not defined in this configuration"),
                    )),
                    Some(secret) if !secret.is_tls() => {
                        result.add_error(ValidationError::warning(
                            field,
                            format!(
                                "Secret {secret_ref} has kind {}, expected tls",
                                secret.secret_type()
                            ),
                        ));
                    },
                    Some(_) => {},
                }
            }
        }

        result
    }
}
