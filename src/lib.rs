//! # R0N TLS Context
//!
//! Resolves the SSL configuration attached to R0N Gateway listeners and
//! upstreams into the TLS contexts pushed to the proxy data plane.
//!
//! ## Features
//!
//! - Secret-sourced certificates, inlined into the context
//! - File-sourced certificates, passed through as paths
//! - Certificate pair checks (chain and key together or not at all)
//! - Upstream contexts with SNI
//! - Listener contexts where a configured root CA enables mutual TLS
//!
//! ## Architecture
//!
//! The [`tls_context`] module is the core: pure functions over a borrowed
//! [`tls_context::SecretSnapshot`]. The [`config`] and [`translate`] modules
//! load a TOML document and run one resolution pass over it, reporting
//! failures through `tracing`.

pub mod config;
pub mod logging;
pub mod tls_context;
pub mod translate;
