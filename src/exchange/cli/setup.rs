use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "exchange-builder", bin_name = "exchange-builder", version)]
#[command(about = "Rank and submit your exchange university choices", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (defaults to the platform data dir)
    #[arg(long, env = "EXCHANGE_HOME", global = true)]
    pub home: Option<PathBuf>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive builder session reading commands from stdin
    #[command(alias = "s")]
    Session {
        /// JSON file with the candidate universities
        #[arg(short, long)]
        catalog: PathBuf,

        /// Start from the latest submitted application (re-selection)
        #[arg(short, long)]
        edit: bool,

        /// Location to mount at, e.g. "/application/edit?modal=search"
        #[arg(long)]
        at: Option<String>,
    },

    /// Show the latest submitted application
    Show,

    /// Get or set configuration
    Config {
        /// Configuration key (modal-param, search-key, confirm-key, base-path)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_session_flags() {
        let cli = Cli::try_parse_from([
            "exchange-builder",
            "session",
            "--catalog",
            "unis.json",
            "--edit",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Session { catalog, edit, at }) => {
                assert_eq!(catalog, PathBuf::from("unis.json"));
                assert!(edit);
                assert!(at.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn session_requires_catalog() {
        assert!(Cli::try_parse_from(["exchange-builder", "session"]).is_err());
    }

    #[test]
    fn config_takes_optional_key_and_value() {
        let cli = Cli::try_parse_from(["exchange-builder", "config", "modal-param", "overlay"])
            .unwrap();
        match cli.command {
            Some(Commands::Config { key, value }) => {
                assert_eq!(key.as_deref(), Some("modal-param"));
                assert_eq!(value.as_deref(), Some("overlay"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
