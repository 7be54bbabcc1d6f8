//! R0N TLS context resolver binary.
//!
//! Usage: `r0n-tls-context [CONFIG_PATH]`
//!
//! Prints the resolved contexts as JSON on stdout. Exits non-zero when the
//! configuration is invalid or any entry fails to resolve.

use std::process::ExitCode;

use r0n_tls_context::config::{BasicValidator, ConfigLoader, SecretReferenceValidator};
use r0n_tls_context::{logging, translate};
use tracing::error;

/// Configuration path used when none is given.
const DEFAULT_CONFIG_PATH: &str = "tls-contexts.toml";

fn main() -> ExitCode {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let loader = ConfigLoader::new()
        .with_validator(BasicValidator::new())
        .with_validator(SecretReferenceValidator::new());

    let config = match loader.parse(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("r0n-tls-context: {e}");
            return ExitCode::from(2);
        },
    };

    if let Err(e) = logging::init(&config.logging) {
        eprintln!("r0n-tls-context: {e}");
    }

    if let Err(e) = loader.validate(&config) {
        error!(path = %path, error = %e, "Invalid configuration");
        return ExitCode::from(2);
    }

    let report = translate::translate(&config);

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            error!(error = %e, "Failed to serialize TLS contexts");
            return ExitCode::FAILURE;
        },
    }

    if report.has_failures() {
        error!(failed = report.failures.len(), "Some TLS contexts could not be resolved");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
