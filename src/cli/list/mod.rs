//! List command - prints node or credential descriptions

use clap::Args;

use crate::domain::CredentialDescription;
use crate::infrastructure::nodes::NodeRegistry;

/// Arguments for the list command
#[derive(Args, Clone, Debug)]
pub struct ListArgs {
    /// List credential types instead of nodes
    #[arg(long)]
    pub credentials: bool,
}

pub async fn run(args: ListArgs) -> anyhow::Result<()> {
    let config = super::init()?;

    let output = if args.credentials {
        serde_json::to_string_pretty(&CredentialDescription::all())?
    } else {
        let registry = NodeRegistry::with_builtin_nodes(&config)?;
        serde_json::to_string_pretty(&registry.descriptions())?
    };

    println!("{}", output);

    Ok(())
}
