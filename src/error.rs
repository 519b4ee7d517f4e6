//! Crate-level error types.
//!
//! Nothing in here covers bad guesses: those are [`Rejection`](crate::state::Rejection)
//! values, not errors.

use std::path::PathBuf;

/// Failures while building a [`WordStore`](crate::state::WordStore).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WordsError {
    #[error("answer list is empty")]
    EmptyAnswers,
}

/// Failures of the disk-backed session cache.
///
/// These never reach callers of the store; they are logged and swallowed,
/// so [`Error`] has no variant for them.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read cache file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write cache file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cache file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize cache: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("invalid cache entry {key:?}: {reason}")]
    InvalidEntry { key: String, reason: String },
}

/// Invalid environment configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a non-negative integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("{key} has unknown value {value:?}")]
    UnknownVariant { key: &'static str, value: String },
}

/// Errors returned while setting up the game.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Words(#[from] WordsError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
