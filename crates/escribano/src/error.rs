//! Error types for the CLI

use std::path::PathBuf;
use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Input could not be read or decoded
    #[error("Invalid input: {message}")]
    Input {
        /// Error message
        message: String,
    },

    /// One or more scenario documents failed validation
    #[error("Check failed: {failed} of {total} documents invalid")]
    Check {
        /// Number of invalid documents
        failed: usize,
        /// Number of documents checked
        total: usize,
    },

    /// Output could not be written
    #[error("Cannot write {path}: {source}")]
    Output {
        /// Destination path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Escriba library error
    #[error("Escriba error: {0}")]
    Escriba(#[from] escriba::EscribaError),

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML encoding error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl CliError {
    /// Create an input error
    #[must_use]
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
        }
    }

    /// Create a check summary error
    #[must_use]
    pub const fn check(failed: usize, total: usize) -> Self {
        Self::Check { failed, total }
    }

    /// Create an output error
    #[must_use]
    pub fn output(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Output {
            path: path.into(),
            source,
        }
    }
}
