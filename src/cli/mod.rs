//! CLI module for workflow-nodes
//!
//! Provides subcommands for running nodes outside a workflow host:
//! - `list`: print node (or credential) descriptions
//! - `run`: execute a node against items read from disk
//! - `test-credentials`: issue a credential type's test request

pub mod credentials;
pub mod list;
pub mod run;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// workflow-nodes - Workflow nodes for news, web search, Pumble and local files
#[derive(Parser)]
#[command(name = "workflow-nodes")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print node descriptions as JSON
    List(list::ListArgs),

    /// Execute a node and print its output as JSON
    Run(run::RunArgs),

    /// Run the test request of a credential type
    TestCredentials(credentials::TestCredentialsArgs),
}

/// Load `.env` and configuration, then install logging
fn init() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init_logging(&config.logging);

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_command() {
        let cli = Cli::try_parse_from([
            "workflow-nodes",
            "run",
            "get-news",
            "--items",
            "items.json",
            "--continue-on-fail",
        ])
        .unwrap();

        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.node, "get-news");
                assert_eq!(args.items.unwrap().to_str(), Some("items.json"));
                assert!(args.params.is_none());
                assert!(args.continue_on_fail);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_parse_test_credentials_command() {
        let cli =
            Cli::try_parse_from(["workflow-nodes", "test-credentials", "rondonjonPumbleApi"]).unwrap();

        assert!(matches!(
            cli.command,
            Command::TestCredentials(args) if args.credential == "rondonjonPumbleApi"
        ));
    }

    #[test]
    fn test_run_requires_node() {
        assert!(Cli::try_parse_from(["workflow-nodes", "run"]).is_err());
    }
}
