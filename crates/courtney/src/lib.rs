//! Courtney: coverage profile filtering for intentionally-untestable
//! code.
//!
//! Standard line coverage counts every statement, including code that
//! exists only to be defensive: `panic` calls that assert invariants,
//! blocks under a `notest` marker, and the `return err` lines behind
//! `if err != nil` guards. Courtney analyses typed syntax trees to find
//! those regions, merges raw coverage profiles from any number of test
//! runs, subtracts the excluded lines from never-executed blocks, and
//! optionally enforces that nothing untested remains.
//!
//! # Architecture
//!
//! ```text
//! packages ──► AstProvider ──► Scanner ─────► ExclusionSet
//!                              (matcher,            │
//!                               solver)             ▼
//! raw profiles ──► union-merge ──► subtract ──► filtered profile
//!                                                   │
//!                                                   ▼
//!                                              enforcement
//! ```
//!
//! Parsing and type checking stay on the host side, behind
//! [`driver::AstProvider`]; this crate owns the exclusion logic and the
//! profile plumbing.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

pub mod driver;
pub mod enforce;
pub mod exclude;
pub mod matcher;
#[allow(clippy::must_use_candidate, clippy::unused_self)]
pub mod mock;
pub mod paths;
pub mod profile;
mod result;
pub mod solver;
pub mod syntax;

pub use result::{CourtneyError, CourtneyResult};
