//! Result and error types for Courtney.

use std::fmt::Write as _;
use std::path::PathBuf;

use thiserror::Error;

use crate::enforce::UntestedRegion;
use crate::profile::Mode;

/// Result type for Courtney operations.
pub type CourtneyResult<T> = Result<T, CourtneyError>;

/// Errors that can occur while filtering coverage.
#[derive(Debug, Error)]
pub enum CourtneyError {
    /// The syntax provider could not load or analyse a package. Provider
    /// failures are surfaced unchanged; analysis aborts.
    #[error("failed to load package {package}: {message}")]
    Provider {
        /// Package the provider was asked for.
        package: String,
        /// Provider-supplied failure description.
        message: String,
    },

    /// Two profile blocks overlap but do not coincide.
    #[error("coverage blocks overlap in {file}: {existing} and {incoming}")]
    MergeOverlap {
        /// Profile file name the blocks belong to.
        file: String,
        /// The block already present, as a profile line fragment.
        existing: String,
        /// The incoming block, as a profile line fragment.
        incoming: String,
    },

    /// Profiles for the same file disagree on the coverage mode.
    #[error("coverage mode mismatch in {file}: {existing} and {incoming}")]
    ModeMismatch {
        /// Profile file name.
        file: String,
        /// Mode of the profile already present.
        existing: Mode,
        /// Mode of the incoming profile.
        incoming: Mode,
    },

    /// A coverage file did not follow the profile grammar.
    #[error("invalid coverage profile line: {line}")]
    ProfileSyntax {
        /// The offending line.
        line: String,
    },

    /// A glob pattern for coverage files could not be compiled.
    #[error("invalid coverage file pattern {pattern}: {message}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Description from the pattern compiler.
        message: String,
    },

    /// A package-qualified file name has no on-disk counterpart.
    #[error("cannot map {name} to a source path")]
    PathMapping {
        /// The unmappable name.
        name: String,
    },

    /// Reading or writing a coverage or source file failed.
    #[error("{path}: {source}")]
    Io {
        /// Path of the file involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Enforcement found code that is neither covered nor excluded. This
    /// is a reporting outcome, not an internal failure.
    #[error("untested code remains:\n{}", format_regions(.regions))]
    Untested {
        /// The untested regions, with source excerpts.
        regions: Vec<UntestedRegion>,
    },
}

impl CourtneyError {
    /// Create a provider failure.
    #[must_use]
    pub fn provider(package: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            package: package.into(),
            message: message.into(),
        }
    }

    /// Create an I/O failure with path context.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

fn format_regions(regions: &[UntestedRegion]) -> String {
    let mut out = String::new();
    for (i, region) in regions.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(out, "{region}");
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_message() {
        let err = CourtneyError::provider("ns/a", "parse failed");
        assert!(err.to_string().contains("ns/a"));
        assert!(err.to_string().contains("parse failed"));
    }

    #[test]
    fn io_error_carries_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = CourtneyError::io("/tmp/coverage.out", io);
        assert!(err.to_string().contains("/tmp/coverage.out"));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn untested_error_lists_regions() {
        let err = CourtneyError::Untested {
            regions: vec![UntestedRegion {
                file_name: "ns/a/a.go".to_string(),
                start_line: 6,
                end_line: 11,
                excerpt: "\tif err != nil {\n\t\treturn nil\n\t}".to_string(),
            }],
        };
        let text = err.to_string();
        assert!(text.contains("untested code remains"));
        assert!(text.contains("ns/a/a.go:6-11:"));
        assert!(text.contains("\tif err != nil {"));
    }
}
