//! Merge command handler.

use std::path::PathBuf;

use courtney::profile::{add_profiles, read_profiles, save_profiles, Profile};
use courtney::CourtneyError;

use crate::commands::MergeArgs;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Execute the merge command: union-merge every matching coverage file
/// and write the result.
pub fn execute_merge(config: &CliConfig, args: &MergeArgs) -> CliResult<()> {
    let files = collect_files(&args.patterns)?;
    if files.is_empty() {
        return Err(CliError::no_input(&args.patterns));
    }

    let mut results: Vec<Profile> = Vec::new();
    for path in &files {
        if config.verbosity.is_verbose() {
            println!("Merging {}", path.display());
        }
        add_profiles(&mut results, read_profiles(path)?)?;
    }

    save_profiles(&results, &args.output)?;
    if !config.verbosity.is_quiet() {
        println!(
            "Merged {} coverage file(s) into {}",
            files.len(),
            args.output.display()
        );
    }
    Ok(())
}

/// Expand the patterns, treating each as a glob. Matches come back in a
/// stable order with duplicates removed.
fn collect_files(patterns: &[String]) -> CliResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let paths = glob::glob(pattern).map_err(|e| CourtneyError::Pattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        for entry in paths {
            let path = entry
                .map_err(|e| CourtneyError::io(e.path().to_path_buf(), e.into_error()))?;
            if !files.contains(&path) {
                files.push(path);
            }
        }
    }
    Ok(files)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn merges_matching_files() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.out", "mode: count\nns/a.go:1.1,3.2 2 1\n");
        write(&dir, "b.out", "mode: count\nns/a.go:1.1,3.2 2 2\n");
        let output = dir.path().join("merged.out");

        let args = MergeArgs {
            patterns: vec![dir.path().join("*.out").to_string_lossy().to_string()],
            output: output.clone(),
        };
        execute_merge(&CliConfig::default(), &args).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(written, "mode: count\nns/a.go:1.1,3.2 2 3\n");
    }

    #[test]
    fn literal_paths_work_without_glob_syntax() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.out", "mode: set\nns/a.go:1.1,3.2 2 1\n");
        let output = dir.path().join("merged.out");

        let args = MergeArgs {
            patterns: vec![a.to_string_lossy().to_string()],
            output: output.clone(),
        };
        execute_merge(&CliConfig::default(), &args).unwrap();
        assert!(output.exists());
    }

    #[test]
    fn nothing_matched_is_an_error() {
        let dir = TempDir::new().unwrap();
        let args = MergeArgs {
            patterns: vec![dir.path().join("*.out").to_string_lossy().to_string()],
            output: dir.path().join("merged.out"),
        };
        let err = execute_merge(&CliConfig::default(), &args);
        assert!(matches!(err, Err(CliError::NoInput { .. })));
    }

    #[test]
    fn duplicate_matches_merge_once() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.out", "mode: count\nns/a.go:1.1,3.2 2 1\n");
        let output = dir.path().join("merged.out");

        // The same file through a literal path and through a glob.
        let args = MergeArgs {
            patterns: vec![
                a.to_string_lossy().to_string(),
                dir.path().join("*.out").to_string_lossy().to_string(),
            ],
            output: output.clone(),
        };
        execute_merge(&CliConfig::default(), &args).unwrap();
        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(written, "mode: count\nns/a.go:1.1,3.2 2 1\n");
    }
}
