use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use library_lending::{exit_code, run, LendingConfig, RunPaths};

/// Replay library lending commands against a catalog and member list.
///
/// Set LIBRARY_LENDING_CONFIG to a JSON config file and
/// LIBRARY_LENDING_TODAY (dd/mm/yyyy) to pin the overdue clock.
#[derive(Parser, Debug)]
#[command(name = "library-lending", version, about)]
struct Cli {
    /// Items file: kind,id,title,...,type
    items: PathBuf,

    /// Members file: kind,name,id,phone,...
    members: PathBuf,

    /// Commands file: borrow / return / pay / displayMembers / displayItems
    commands: PathBuf,

    /// Output file (truncated at start)
    output: PathBuf,
}

fn main() -> ExitCode {
    // Logs go to stderr; the output file only ever holds command results
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let paths = RunPaths {
        items: cli.items,
        members: cli.members,
        commands: cli.commands,
        output: cli.output,
    };

    let result = LendingConfig::from_env().and_then(|config| run(&paths, &config));

    match result {
        Ok(summary) => {
            tracing::info!(
                commands = summary.commands,
                borrowed = summary.borrowed,
                rejected = summary.rejected(),
                evictions = summary.overdue_evictions,
                "replay complete"
            );
            if let Ok(json) = serde_json::to_string(&summary) {
                tracing::debug!(summary = %json, "replay summary");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{:#}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}
