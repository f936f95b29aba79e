//! Run command - executes one node against items read from disk

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use clap::Args;
use serde_json::Value;
use tracing::info;

use crate::domain::node::{JsonObject, WorkflowItem};
use crate::infrastructure::credentials::EnvCredentialProvider;
use crate::infrastructure::host::StaticHost;
use crate::infrastructure::nodes::NodeRegistry;

/// Arguments for the run command
#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    /// Node name or alias (e.g. `rondonjonGetNews` or `get-news`)
    pub node: String,

    /// JSON array of input item objects (default: one empty item)
    #[arg(long)]
    pub items: Option<PathBuf>,

    /// JSON object of shared parameters, or an array with one object per item
    #[arg(long)]
    pub params: Option<PathBuf>,

    /// Capture per-item failures as error items instead of aborting
    #[arg(long)]
    pub continue_on_fail: bool,
}

/// Node parameters as read from the params file
#[derive(Debug, Clone, PartialEq)]
enum Parameters {
    Shared(JsonObject),
    PerItem(Vec<JsonObject>),
}

pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    let config = super::init()?;
    let registry = NodeRegistry::with_builtin_nodes(&config)?;

    let node = registry
        .find(&args.node)
        .ok_or_else(|| anyhow!("Unknown node '{}'", args.node))?;
    let description = node.description();

    let items = match &args.items {
        Some(path) => parse_items(&read_json(path)?)?,
        None => vec![WorkflowItem::default()],
    };

    let mut host = StaticHost::new(description.name.clone())
        .with_items(items)
        .with_credential_provider(Arc::new(EnvCredentialProvider::default()))
        .with_continue_on_fail(args.continue_on_fail);

    if let Some(path) = &args.params {
        host = match parse_params(read_json(path)?)? {
            Parameters::Shared(parameters) => host.with_parameters(parameters),
            Parameters::PerItem(parameters) => host.with_item_parameters(parameters),
        };
    }

    info!(node = %description.name, "Running node");

    let output = node.execute(&host).await?;

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn parse_items(value: &Value) -> anyhow::Result<Vec<WorkflowItem>> {
    let Value::Array(values) = value else {
        bail!("Items must be a JSON array of objects");
    };

    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            WorkflowItem::from_value(value.clone())
                .ok_or_else(|| anyhow!("Item {} is not a JSON object", index))
        })
        .collect()
}

fn parse_params(value: Value) -> anyhow::Result<Parameters> {
    match value {
        Value::Object(parameters) => Ok(Parameters::Shared(parameters)),
        Value::Array(values) => values
            .into_iter()
            .enumerate()
            .map(|(index, value)| match value {
                Value::Object(parameters) => Ok(parameters),
                _ => Err(anyhow!("Parameters for item {} are not a JSON object", index)),
            })
            .collect::<anyhow::Result<Vec<_>>>()
            .map(Parameters::PerItem),
        _ => bail!("Parameters must be a JSON object or an array of objects"),
    }
}
