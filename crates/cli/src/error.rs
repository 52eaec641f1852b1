//! CLI error type.

use std::path::PathBuf;

use thiserror::Error;

use herreria_site::config::ConfigError;
use herreria_site::services::AuthError;
use herreria_site::store::StoreError;

/// Errors that can end a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Store configuration is missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The store client could not be built.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Password hashing failed or the password was rejected.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Reading stdin or a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Seed file is not valid YAML for the expected shape.
    #[error("Invalid seed file {path}: {source}")]
    SeedFormat {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// Seed file entry failed validation.
    #[error("Invalid seed entry: {0}")]
    InvalidEntry(String),

    /// Some seed records could not be written.
    #[error("{failed} of {total} records could not be written")]
    PartialSeed { failed: usize, total: usize },
}
