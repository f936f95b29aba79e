use clap::Parser;
use workflow_nodes::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::List(args) => cli::list::run(args).await,
        Command::Run(args) => cli::run::run(args).await,
        Command::TestCredentials(args) => cli::credentials::run(args).await,
    }
}
