//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - replay: drive a scan script through the pipeline and print the log
//! - check: parse a scan script without running it

use clap::{Parser, Subcommand};
use scanlog::filter::{DateFilter, StatusFilter};
use std::path::PathBuf;

/// Scanlog - scan capture debouncing, classification and a filterable log
#[derive(Parser, Debug)]
#[command(name = "scanlog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a scan script and print the resulting log
    Replay {
        /// Script file, or `-` for stdin
        script: PathBuf,

        /// Show only entries with this status (all, valid, invalid)
        #[arg(short, long, default_value = "all")]
        status: StatusFilter,

        /// Show only entries in this window (all, today, week, month)
        #[arg(short, long, default_value = "all")]
        date: DateFilter,

        /// Case-insensitive search over code, product, location and details
        #[arg(short, long)]
        query: Option<String>,

        /// Print the filtered log as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse a scan script and list its steps
    Check {
        /// Script file, or `-` for stdin
        script: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_command() {
        let cli = Cli::try_parse_from(["scanlog"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.is_verbose());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["scanlog", "-v", "-c", "/tmp/scanlog.yml", "check", "s.txt"]).unwrap();
        assert!(cli.is_verbose());
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/scanlog.yml")));
    }

    #[test]
    fn test_replay_defaults() {
        let cli = Cli::try_parse_from(["scanlog", "replay", "scans.txt"]).unwrap();
        match cli.command {
            Some(Commands::Replay {
                script,
                status,
                date,
                query,
                json,
            }) => {
                assert_eq!(script, PathBuf::from("scans.txt"));
                assert_eq!(status, StatusFilter::All);
                assert_eq!(date, DateFilter::All);
                assert!(query.is_none());
                assert!(!json);
            }
            _ => panic!("Expected replay command"),
        }
    }

    #[test]
    fn test_replay_with_filters() {
        let cli = Cli::try_parse_from([
            "scanlog", "replay", "-", "-s", "invalid", "-d", "week", "-q", "warehouse", "--json",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Replay {
                script,
                status,
                date,
                query,
                json,
            }) => {
                assert_eq!(script, PathBuf::from("-"));
                assert_eq!(status, StatusFilter::Invalid);
                assert_eq!(date, DateFilter::Week);
                assert_eq!(query, Some("warehouse".to_string()));
                assert!(json);
            }
            _ => panic!("Expected replay command"),
        }
    }

    #[test]
    fn test_replay_rejects_unknown_status() {
        let result = Cli::try_parse_from(["scanlog", "replay", "s.txt", "--status", "pending"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_replay_requires_script() {
        let result = Cli::try_parse_from(["scanlog", "replay"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_check_command() {
        let cli = Cli::try_parse_from(["scanlog", "check", "s.txt"]).unwrap();
        match cli.command {
            Some(Commands::Check { script }) => assert_eq!(script, PathBuf::from("s.txt")),
            _ => panic!("Expected check command"),
        }
    }
}
