//! Error types surfaced to callers.
//!
//! Provider failures never show up here; they are absorbed by
//! [`crate::provider::fetch_or_empty`].

use std::path::PathBuf;

use thiserror::Error;

/// The fan-out itself broke, as opposed to a single provider failing.
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("provider task {provider} did not complete: {source}")]
    Join {
        provider: &'static str,
        #[source]
        source: tokio::task::JoinError,
    },
}

/// Configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
