//! Error types for the CLI.

use thiserror::Error;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// No coverage files matched the given patterns
    #[error("No coverage files matched: {patterns}")]
    NoInput {
        /// The patterns tried
        patterns: String,
    },

    /// Enforcement failed; details were already reported
    #[error("coverage enforcement failed: {regions} untested region(s)")]
    Enforcement {
        /// How many untested regions were found
        regions: usize,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Courtney library error
    #[error(transparent)]
    Courtney(#[from] courtney::CourtneyError),
}

impl CliError {
    /// Create an invalid argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a no-input error from the patterns that matched nothing.
    #[must_use]
    pub fn no_input(patterns: &[String]) -> Self {
        Self::NoInput {
            patterns: patterns.join(", "),
        }
    }
}
