//! Command-line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Courtney: coverage profile filtering for intentionally-untestable
/// code.
#[derive(Debug, Parser)]
#[command(name = "courtney", version, about)]
pub struct Cli {
    /// Extra output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Union-merge coverage profiles into one file
    Merge(MergeArgs),
    /// Fail if a merged profile still has untested blocks
    Enforce(EnforceArgs),
}

/// Arguments for the merge command.
#[derive(Debug, Args)]
pub struct MergeArgs {
    /// Coverage files to merge; glob patterns are accepted
    #[arg(required = true)]
    pub patterns: Vec<String>,

    /// Where to write the merged profile
    #[arg(short, long, default_value = "coverage.out")]
    pub output: PathBuf,
}

/// Arguments for the enforce command.
#[derive(Debug, Args)]
pub struct EnforceArgs {
    /// The merged coverage profile to check
    pub profile: PathBuf,

    /// Package prefix that profile file names start with
    #[arg(long)]
    pub prefix: String,

    /// Source root directory the prefix maps onto
    #[arg(long)]
    pub root: PathBuf,

    /// Emit the untested regions as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn merge_parses_patterns_and_output() {
        let cli = Cli::parse_from(["courtney", "merge", "a.out", "b/*.out", "-o", "all.out"]);
        let Commands::Merge(args) = cli.command else {
            panic!("expected merge");
        };
        assert_eq!(args.patterns, vec!["a.out", "b/*.out"]);
        assert_eq!(args.output, PathBuf::from("all.out"));
    }

    #[test]
    fn merge_requires_at_least_one_pattern() {
        assert!(Cli::try_parse_from(["courtney", "merge"]).is_err());
    }

    #[test]
    fn enforce_parses_mapping_flags() {
        let cli = Cli::parse_from([
            "courtney", "enforce", "coverage.out", "--prefix", "ns", "--root", "./src", "--json",
        ]);
        let Commands::Enforce(args) = cli.command else {
            panic!("expected enforce");
        };
        assert_eq!(args.profile, PathBuf::from("coverage.out"));
        assert_eq!(args.prefix, "ns");
        assert!(args.json);
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["courtney", "-v", "-q", "merge", "a.out"]).is_err());
    }
}
