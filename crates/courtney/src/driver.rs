//! Orchestration: scan packages, merge raw profiles, apply exclusions,
//! save and enforce.
//!
//! The driver is the provider-facing surface. A host supplies an
//! [`AstProvider`] for the language being analysed and a
//! [`PathMapper`](crate::paths::PathMapper) for its package layout; the
//! driver sequences the analysis and the profile plumbing.

use std::path::{Path, PathBuf};

use crate::exclude::{ExclusionSet, Scanner};
use crate::paths::PathMapper;
use crate::profile::{self, Profile};
use crate::result::{CourtneyError, CourtneyResult};
use crate::syntax::{SemanticInfo, SourceFile};

/// A package selected for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    /// Package-qualified import path.
    pub path: String,
    /// Directory holding the package's sources.
    pub dir: PathBuf,
}

/// One analysed file: its syntax tree plus the semantic maps resolved
/// for it.
#[derive(Debug, Clone)]
pub struct FileAst {
    /// The syntax tree.
    pub source: SourceFile,
    /// Name resolution and type attribution for the tree.
    pub info: SemanticInfo,
}

/// A loaded, type-checked package.
#[derive(Debug, Clone)]
pub struct PackageAst {
    /// Package-qualified import path.
    pub path: String,
    /// The package's files, in a stable source order.
    pub files: Vec<FileAst>,
}

/// Supplies typed syntax trees for packages.
///
/// Implementations own the trees they return and are responsible for
/// assigning [`NodeId`](crate::syntax::NodeId)s, resolving bindings and
/// attributing types. Predeclared builtins must be left out of the
/// binding maps. Failures are surfaced unchanged as
/// [`CourtneyError::Provider`].
pub trait AstProvider {
    /// Load and analyse the given packages.
    fn load(&self, packages: &[PackageSpec]) -> CourtneyResult<Vec<PackageAst>>;
}

/// Default output file name, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "coverage.out";

/// Sequences a whole filtering run.
pub struct Driver<'a> {
    mapper: &'a dyn PathMapper,
    output: PathBuf,
    enforce: bool,
    excludes: ExclusionSet,
    results: Vec<Profile>,
}

impl<'a> Driver<'a> {
    /// Create a driver writing to [`DEFAULT_OUTPUT`].
    #[must_use]
    pub fn new(mapper: &'a dyn PathMapper) -> Self {
        Self {
            mapper,
            output: PathBuf::from(DEFAULT_OUTPUT),
            enforce: false,
            excludes: ExclusionSet::new(),
            results: Vec::new(),
        }
    }

    /// Set the output path for the merged profile.
    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Fail the run if untested code remains after exclusions.
    #[must_use]
    pub const fn with_enforce(mut self, enforce: bool) -> Self {
        self.enforce = enforce;
        self
    }

    /// Load the packages through the provider and scan every file for
    /// exclusions.
    pub fn scan(
        &mut self,
        provider: &dyn AstProvider,
        packages: &[PackageSpec],
    ) -> CourtneyResult<()> {
        let loaded = provider.load(packages)?;
        let mut scanner = Scanner::new();
        for package in &loaded {
            for file in &package.files {
                scanner.scan_file(&file.source, &file.info);
            }
        }
        self.excludes.merge(scanner.into_excludes());
        Ok(())
    }

    /// Load pre-prepared coverage files matching a glob pattern and merge
    /// them into the results. Returns how many files matched.
    pub fn load_profiles(&mut self, pattern: &str) -> CourtneyResult<usize> {
        let paths = glob::glob(pattern).map_err(|e| CourtneyError::Pattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        let mut matched = 0;
        for entry in paths {
            let path = entry.map_err(|e| CourtneyError::io(e.path().to_path_buf(), e.into_error()))?;
            self.add_profiles(profile::read_profiles(&path)?)?;
            matched += 1;
        }
        Ok(matched)
    }

    /// Merge already-parsed profiles into the results.
    pub fn add_profiles(
        &mut self,
        profiles: impl IntoIterator<Item = Profile>,
    ) -> CourtneyResult<()> {
        profile::add_profiles(&mut self.results, profiles)
    }

    /// Subtract the accumulated exclusions from the merged results.
    pub fn apply_exclusions(&mut self) -> CourtneyResult<()> {
        profile::apply_exclusions(&mut self.results, &self.excludes, self.mapper)
    }

    /// Write the merged profile to the configured output. Returns the
    /// path written, or `None` when there are no results to save.
    pub fn save(&self) -> CourtneyResult<Option<&Path>> {
        if self.results.is_empty() {
            return Ok(None);
        }
        profile::save_profiles(&self.results, &self.output)?;
        Ok(Some(&self.output))
    }

    /// Run the enforcement check, if enabled.
    pub fn enforce(&self) -> CourtneyResult<()> {
        if !self.enforce {
            return Ok(());
        }
        crate::enforce::enforce(&self.results, self.mapper)
    }

    /// The exclusions accumulated by [`Driver::scan`].
    #[must_use]
    pub fn excludes(&self) -> &ExclusionSet {
        &self.excludes
    }

    /// The merged profiles.
    #[must_use]
    pub fn results(&self) -> &[Profile] {
        &self.results
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::paths::DirMapper;
    use crate::profile::{parse_profiles, profiles_to_string};

    struct FailingProvider;

    impl AstProvider for FailingProvider {
        fn load(&self, packages: &[PackageSpec]) -> CourtneyResult<Vec<PackageAst>> {
            Err(CourtneyError::provider(
                packages[0].path.clone(),
                "type checking failed",
            ))
        }
    }

    #[test]
    fn provider_failures_abort_the_scan() {
        let mapper = DirMapper::new("ns", "/src");
        let mut driver = Driver::new(&mapper);
        let spec = PackageSpec {
            path: "ns/a".to_string(),
            dir: PathBuf::from("/src/a"),
        };
        let err = driver.scan(&FailingProvider, &[spec]);
        assert!(matches!(err, Err(CourtneyError::Provider { .. })));
    }

    #[test]
    fn save_reports_nothing_to_write() {
        let mapper = DirMapper::new("ns", "/src");
        let driver = Driver::new(&mapper);
        assert_eq!(driver.save().unwrap(), None);
    }

    #[test]
    fn profiles_merge_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("coverage.out");
        let mapper = DirMapper::new("ns", "/src");
        let mut driver = Driver::new(&mapper).with_output(&out);

        driver
            .add_profiles(parse_profiles("mode: count\nns/a.go:1.1,3.2 2 1\n").unwrap())
            .unwrap();
        driver
            .add_profiles(parse_profiles("mode: count\nns/a.go:1.1,3.2 2 2\n").unwrap())
            .unwrap();

        assert_eq!(driver.save().unwrap(), Some(out.as_path()));
        let written = std::fs::read_to_string(&out).unwrap();
        assert_eq!(written, "mode: count\nns/a.go:1.1,3.2 2 3\n");
        assert_eq!(profiles_to_string(driver.results()), written);
    }

    #[test]
    fn load_profiles_globs_coverage_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.out"), "mode: count\nns/a.go:1.1,3.2 2 1\n").unwrap();
        std::fs::write(dir.path().join("b.out"), "mode: count\nns/a.go:5.1,7.2 1 0\n").unwrap();

        let mapper = DirMapper::new("ns", dir.path());
        let mut driver = Driver::new(&mapper);
        let pattern = dir.path().join("*.out");
        let matched = driver.load_profiles(&pattern.to_string_lossy()).unwrap();
        assert_eq!(matched, 2);
        assert_eq!(driver.results()[0].blocks.len(), 2);
    }

    #[test]
    fn enforcement_is_opt_in() {
        let mapper = DirMapper::new("ns", "/src");
        let mut driver = Driver::new(&mapper);
        driver
            .add_profiles(parse_profiles("mode: set\nns/a.go:1.1,3.2 2 0\n").unwrap())
            .unwrap();

        // Not enabled: the zero block is not a failure.
        assert!(driver.enforce().is_ok());
    }
}
