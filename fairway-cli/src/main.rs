//! Fairway CLI - on-course round tracking from the command line.
//!
//! Two commands: `validate` checks course data, `simulate` replays a
//! recorded GPS trace through a live round session.

mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

#[derive(Debug, Parser)]
#[command(name = "fairway", version = fairway::VERSION, about = "On-course GPS round tracking")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate a course file and print its layout
    Validate {
        /// Path to the course JSON file
        course: PathBuf,
    },
    /// Replay a GPS trace through a round session
    Simulate {
        /// Path to the course JSON file
        course: PathBuf,
        /// Path to the trace JSON file: an array of [lat, lon] pairs
        trace: PathBuf,
        /// Milliseconds to wait between trace fixes
        #[arg(long, default_value_t = 200)]
        interval_ms: u64,
        /// Optional club bag JSON file for per-update club suggestions
        #[arg(long)]
        clubs: Option<PathBuf>,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "fairway=debug,info",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<(), CliError> = match cli.command {
        Command::Validate { course } => commands::validate::run(&course),
        Command::Simulate {
            course,
            trace,
            interval_ms,
            clubs,
        } => commands::simulate::run(&course, &trace, interval_ms, clubs.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
