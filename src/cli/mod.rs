//! Command-line interface wiring for the orchestrator.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;

pub mod serve;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Acquire → predict pipeline orchestrator", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command, serving by default.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Some(Commands::Serve(args)) => serve::run(args, settings).await,
            None => serve::run(serve::Args::default(), settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve `GET /pipeline`.
    Serve(serve::Args),
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_serves() {
        let cli = Cli::try_parse_from(["energy-pipeline"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn serve_accepts_overrides() {
        let cli = Cli::try_parse_from(["energy-pipeline", "serve", "--port", "9003"]).unwrap();
        match cli.command {
            Some(Commands::Serve(args)) => {
                assert_eq!(args.port, Some(9003));
                assert!(args.host.is_none());
            }
            None => panic!("expected serve"),
        }
    }
}
