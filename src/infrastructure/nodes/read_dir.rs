//! Local directory listing node

use async_trait::async_trait;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::domain::node::{
    run_per_item, ExecuteFunctions, ItemParameters, ItemResult, Node, NodeDescription, NodeOutput,
    NodeProperty,
};
use crate::domain::NodeError;

pub const READ_DIR_NODE: &str = "rondonjonReadDir";

const PARAM_PATH: &str = "path";
const PARAM_DESTINATION_KEY: &str = "destinationKey";

const DEFAULT_DESTINATION_KEY: &str = "contents";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct DirEntryInfo {
    name: String,
    is_directory: bool,
    is_file: bool,
}

/// Immediate entries of `path`, sorted by name. Symlinks are not followed.
fn list_directory(path: &Path) -> Result<Vec<DirEntryInfo>, NodeError> {
    let read_error = |e: std::io::Error| {
        NodeError::filesystem(format!(
            "Failed to read directory '{}': {}",
            path.display(),
            e
        ))
    };

    let mut entries = Vec::new();

    for entry in fs::read_dir(path).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        let file_type = entry.file_type().map_err(read_error)?;

        entries.push(DirEntryInfo {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_directory: file_type.is_dir(),
            is_file: file_type.is_file(),
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(entries)
}

/// Lists a local directory without reading file contents
#[derive(Debug, Clone, Default)]
pub struct ReadDirNode;

impl ReadDirNode {
    pub fn new() -> Self {
        Self
    }

    async fn execute_item(
        &self,
        host: &dyn ExecuteFunctions,
        item_index: usize,
    ) -> Result<ItemResult, NodeError> {
        let params = ItemParameters::new(host, item_index);

        let path = params.string(PARAM_PATH, "");
        if path.trim().is_empty() {
            return Err(NodeError::validation("Path is required"));
        }

        let destination_key = params.destination_key(PARAM_DESTINATION_KEY, DEFAULT_DESTINATION_KEY);
        let entries = list_directory(Path::new(&path))?;

        let value = serde_json::to_value(entries)
            .map_err(|e| NodeError::operation(format!("Failed to encode entries: {}", e)))?;

        Ok(ItemResult::new(destination_key, value))
    }
}

#[async_trait]
impl Node for ReadDirNode {
    fn description(&self) -> NodeDescription {
        NodeDescription::new(READ_DIR_NODE, "Read Directory")
            .with_description(
                "Reads the contents of a local directory without importing the binary data of its files",
            )
            .with_property(
                NodeProperty::string(PARAM_PATH, "Path")
                    .with_default("")
                    .required()
                    .with_description("Path of a directory on the local filesystem"),
            )
            .with_property(
                NodeProperty::string(PARAM_DESTINATION_KEY, "Destination Key").with_description(
                    "The key to which the directory contents will be written (default: \"contents\")",
                ),
            )
    }

    async fn execute(&self, host: &dyn ExecuteFunctions) -> Result<NodeOutput, NodeError> {
        run_per_item(host, move |item_index| self.execute_item(host, item_index)).await
    }
}
