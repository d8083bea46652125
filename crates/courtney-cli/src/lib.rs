//! Courtney CLI: the provider-free surfaces of coverage filtering.
//!
//! ## Usage
//!
//! ```bash
//! courtney merge 'cover/*.out' -o coverage.out   # Union-merge raw profiles
//! courtney enforce coverage.out \
//!     --prefix github.com/acme/ns --root .       # Fail on untested code
//! ```
//!
//! Exclusion scanning needs a typed-AST provider and therefore lives
//! behind the library's [`courtney::driver`] interface rather than here.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod commands;
mod config;
mod error;
pub mod handlers;

pub use commands::{Cli, Commands, EnforceArgs, MergeArgs};
pub use config::{CliConfig, Verbosity};
pub use error::{CliError, CliResult};
