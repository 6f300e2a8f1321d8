//! board-sim - replay drag-and-drop scenarios against the task board engine.
//!
//! Commands:
//! - `board-sim replay <scenario.yaml>`: run the scenario and print the columns
//! - `board-sim lanes`: print the effective lane table
//!
//! Configuration is read from `./.clientdesk/board.*`, `--config FILE` and
//! `CLIENTDESK_*` environment variables. `RUST_LOG` overrides the log level.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error

mod cli;
mod render;
mod scenario;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, OutputFormat};
use clientdesk_config::{BoardConfig, ConfigLoader};
use scenario::Scenario;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    configure_logging(cli.verbose, cli.debug, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Replay { scenario, format } => {
            let report = Scenario::from_file(&scenario)?.replay(&config).await?;
            match format {
                OutputFormat::Table => print!("{}", render::report_text(&report)),
                OutputFormat::Json => println!("{}", render::report_json(&report)?),
            }
        }
        Commands::Lanes { format } => {
            let lanes = config.lane_table();
            match format {
                OutputFormat::Table => println!("{}", render::lanes_table(&lanes)),
                OutputFormat::Json => println!("{}", render::lanes_json(&lanes)?),
            }
        }
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<BoardConfig> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    loader.load().context("loading configuration")
}

fn configure_logging(verbose: bool, debug: bool, quiet: bool) {
    use tracing::Level;
    use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

    let log_level = if quiet {
        Level::ERROR
    } else if debug {
        Level::DEBUG
    } else if verbose {
        Level::TRACE
    } else {
        Level::WARN
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{log_level}")));

    registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
