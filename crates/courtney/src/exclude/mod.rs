//! Deciding which source lines to exclude from coverage.
//!
//! The [`Scanner`] walks typed syntax trees and accumulates an
//! [`ExclusionSet`]: every line that is intentionally defensive and
//! should therefore not count against a coverage target. Three things
//! qualify: calls to the predeclared `panic`, scopes under a `notest`
//! marker comment, and `return` statements in branches that are only
//! taken because an error value is known to be non-nil.

mod file;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::syntax::{SemanticInfo, SourceFile};

use file::FileScan;

/// Lines to remove from coverage, per file.
///
/// The set is union-monotonic: lines are only ever added, so scanning
/// files in any order, or scanning a file twice, produces the same
/// result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    files: BTreeMap<PathBuf, BTreeSet<u32>>,
}

impl ExclusionSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a 1-based line for a file.
    pub fn add(&mut self, path: &Path, line: u32) {
        self.files.entry(path.to_path_buf()).or_default().insert(line);
    }

    /// Whether a specific line of a file is excluded.
    #[must_use]
    pub fn contains(&self, path: &Path, line: u32) -> bool {
        self.files.get(path).is_some_and(|lines| lines.contains(&line))
    }

    /// The excluded lines of one file, if any.
    #[must_use]
    pub fn lines(&self, path: &Path) -> Option<&BTreeSet<u32>> {
        self.files.get(path)
    }

    /// Whether any line in `start..=end` of a file is excluded.
    #[must_use]
    pub fn intersects(&self, path: &Path, start: u32, end: u32) -> bool {
        self.files
            .get(path)
            .is_some_and(|lines| lines.range(start..=end).next().is_some())
    }

    /// Fold another set into this one.
    pub fn merge(&mut self, other: Self) {
        for (path, lines) in other.files {
            self.files.entry(path).or_default().extend(lines);
        }
    }

    /// Whether no lines are excluded at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.values().all(BTreeSet::is_empty)
    }

    /// Iterate over files and their excluded lines, in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &BTreeSet<u32>)> {
        self.files.iter().map(|(path, lines)| (path.as_path(), lines))
    }
}

/// Scans files for code to exclude from coverage.
#[derive(Debug, Default)]
pub struct Scanner {
    excludes: ExclusionSet,
}

impl Scanner {
    /// Create a scanner with an empty exclusion set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan one file, adding its exclusions to the set.
    pub fn scan_file(&mut self, source: &SourceFile, info: &SemanticInfo) {
        FileScan::new(source, info, &mut self.excludes).run();
    }

    /// The exclusions accumulated so far.
    #[must_use]
    pub fn excludes(&self) -> &ExclusionSet {
        &self.excludes
    }

    /// Consume the scanner, yielding the exclusion set.
    #[must_use]
    pub fn into_excludes(self) -> ExclusionSet {
        self.excludes
    }
}
