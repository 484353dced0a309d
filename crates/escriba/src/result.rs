//! Result and error types for Escriba.

use thiserror::Error;

use crate::grammar::SelectorParseError;
use crate::scenario::ScenarioError;

/// Result type for Escriba operations
pub type EscribaResult<T> = Result<T, EscribaError>;

/// Errors that can occur in Escriba
///
/// The mapping and emission path is total and never produces these; they only
/// surface from the I/O-facing entry points (decoding recorder input, parsing
/// scenario documents).
#[derive(Debug, Error)]
pub enum EscribaError {
    /// Selector string could not be parsed
    #[error("Selector parse error: {0}")]
    Selector(#[from] SelectorParseError),

    /// Scenario document is invalid
    #[error("Scenario error: {0}")]
    Scenario(#[from] ScenarioError),

    /// Recorded action stream is malformed
    #[error("Invalid recorded action at line {line}: {message}")]
    InvalidAction {
        /// 1-based line number in the input stream
        line: usize,
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl EscribaError {
    /// Create an invalid action error
    #[must_use]
    pub fn invalid_action(line: usize, message: impl Into<String>) -> Self {
        Self::InvalidAction {
            line,
            message: message.into(),
        }
    }
}
