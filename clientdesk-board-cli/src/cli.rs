//! CLI definition for board-sim

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// board-sim - replay pointer scenarios against the task board engine.
///
/// Scenarios run against an in-memory system of record, so injected
/// failures and reloads are fully reproducible.
#[derive(Parser, Debug)]
#[command(name = "board-sim")]
#[command(version)]
#[command(about = "Replay drag-and-drop scenarios against the task board engine")]
pub struct Cli {
    /// Configuration file merged after ./.clientdesk/board.*
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Log everything, including per-event traces
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a YAML scenario and print the resulting columns
    Replay {
        /// Scenario file with `tasks` and `steps`
        scenario: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Print the effective lane table
    Lanes {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_replay() {
        let cli = Cli::try_parse_from([
            "board-sim",
            "--debug",
            "replay",
            "demo.yaml",
            "--format",
            "json",
        ])
        .unwrap();
        assert!(cli.debug);
        match cli.command {
            Commands::Replay { scenario, format } => {
                assert_eq!(scenario, PathBuf::from("demo.yaml"));
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["board-sim", "lanes", "-q", "--config", "x.toml"]).unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }
}
