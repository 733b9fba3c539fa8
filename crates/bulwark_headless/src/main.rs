//! Headless scenario runner binary.
//!
//! Loads a RON scenario (or the built-in skirmish), runs it to
//! completion and prints a summary. Event logs go to stderr via
//! `tracing`; tune them with `RUST_LOG` or `--verbose`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use bulwark_headless::{run_scenario, Scenario};

#[derive(Parser)]
#[command(name = "bulwark_headless")]
#[command(about = "Headless scenario runner for the Bulwark gameplay core")]
#[command(version)]
struct Cli {
    /// Scenario file to run (RON). Uses the built-in skirmish when
    /// omitted.
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Override the scenario's duration in seconds.
    #[arg(short, long)]
    duration: Option<f64>,

    /// Enable verbose event logging to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut scenario = match &cli.scenario {
        Some(path) => match Scenario::load(path) {
            Ok(scenario) => scenario,
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => Scenario::default(),
    };

    if let Some(duration) = cli.duration {
        scenario.duration = duration;
    }

    match run_scenario(&scenario) {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
