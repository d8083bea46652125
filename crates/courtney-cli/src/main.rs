//! Courtney CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use courtney_cli::{handlers, Cli, CliConfig, CliResult, Commands, Verbosity};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);

    match cli.command {
        Commands::Merge(args) => handlers::merge::execute_merge(&config, &args),
        Commands::Enforce(args) => handlers::enforce::execute_enforce(&config, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else if cli.verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    };
    CliConfig::new().with_verbosity(verbosity)
}
