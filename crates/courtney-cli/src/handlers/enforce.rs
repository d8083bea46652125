//! Enforce command handler.

use courtney::enforce::enforce;
use courtney::paths::DirMapper;
use courtney::profile::read_profiles;
use courtney::CourtneyError;

use crate::commands::EnforceArgs;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Execute the enforce command: fail when untested blocks remain.
pub fn execute_enforce(config: &CliConfig, args: &EnforceArgs) -> CliResult<()> {
    let results = read_profiles(&args.profile)?;
    let mapper = DirMapper::new(args.prefix.clone(), args.root.clone());

    match enforce(&results, &mapper) {
        Ok(()) => {
            if !config.verbosity.is_quiet() {
                println!("No untested code");
            }
            Ok(())
        }
        Err(CourtneyError::Untested { regions }) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&regions)?);
            } else {
                for region in &regions {
                    println!("{region}");
                }
            }
            Err(CliError::Enforcement {
                regions: regions.len(),
            })
        }
        Err(other) => Err(other.into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn setup(profile: &str, source_lines: u32) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let profile_path = dir.path().join("coverage.out");
        fs::write(&profile_path, profile).unwrap();
        let source: String = (1..=source_lines).map(|i| format!("line {i}\n")).collect();
        fs::write(dir.path().join("a.go"), source).unwrap();
        (dir, profile_path)
    }

    #[test]
    fn covered_profile_passes() {
        let (dir, profile) = setup("mode: set\nns/a.go:1.1,2.2 1 1\n", 5);
        let args = EnforceArgs {
            profile,
            prefix: "ns".to_string(),
            root: dir.path().to_path_buf(),
            json: false,
        };
        assert!(execute_enforce(&CliConfig::default(), &args).is_ok());
    }

    #[test]
    fn uncovered_blocks_fail() {
        let (dir, profile) = setup("mode: set\nns/a.go:2.1,3.2 1 0\n", 5);
        let args = EnforceArgs {
            profile,
            prefix: "ns".to_string(),
            root: dir.path().to_path_buf(),
            json: false,
        };
        let err = execute_enforce(&CliConfig::default(), &args);
        assert!(matches!(err, Err(CliError::Enforcement { regions: 1 })));
    }

    #[test]
    fn json_mode_still_fails() {
        let (dir, profile) = setup("mode: set\nns/a.go:2.1,3.2 1 0\n", 5);
        let args = EnforceArgs {
            profile,
            prefix: "ns".to_string(),
            root: dir.path().to_path_buf(),
            json: true,
        };
        assert!(execute_enforce(&CliConfig::default(), &args).is_err());
    }

    #[test]
    fn missing_profile_is_an_io_failure() {
        let dir = TempDir::new().unwrap();
        let args = EnforceArgs {
            profile: dir.path().join("absent.out"),
            prefix: "ns".to_string(),
            root: dir.path().to_path_buf(),
            json: false,
        };
        let err = execute_enforce(&CliConfig::default(), &args);
        assert!(matches!(
            err,
            Err(CliError::Courtney(CourtneyError::Io { .. }))
        ));
    }
}
