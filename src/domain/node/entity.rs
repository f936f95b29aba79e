//! Node trait and node metadata

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use super::host::ExecuteFunctions;
use super::item::NodeOutput;
use super::parameter::NodeProperty;
use crate::domain::error::NodeError;

/// Connection type of the host's single main port
pub const MAIN_CONNECTION: &str = "main";

/// Reference from a node to a credential type it needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCredential {
    pub name: String,
    pub required: bool,
}

/// Values the host uses when a node is added to a workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDefaults {
    pub name: String,
}

/// Everything the host needs to know to offer and configure a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescription {
    /// Unique node type name
    pub name: String,

    pub display_name: String,

    pub description: String,

    pub group: Vec<String>,

    pub version: u32,

    pub defaults: NodeDefaults,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub credentials: Vec<NodeCredential>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,

    pub inputs: Vec<String>,

    pub outputs: Vec<String>,

    pub properties: Vec<NodeProperty>,
}

impl NodeDescription {
    /// A transform node with one main input and one main output
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();

        Self {
            name: name.into(),
            defaults: NodeDefaults {
                name: display_name.clone(),
            },
            display_name,
            description: String::new(),
            group: vec!["transform".to_string()],
            version: 1,
            credentials: Vec::new(),
            documentation_url: None,
            inputs: vec![MAIN_CONNECTION.to_string()],
            outputs: vec![MAIN_CONNECTION.to_string()],
            properties: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_credential(mut self, name: impl Into<String>) -> Self {
        self.credentials.push(NodeCredential {
            name: name.into(),
            required: true,
        });
        self
    }

    pub fn with_documentation_url(mut self, url: impl Into<String>) -> Self {
        self.documentation_url = Some(url.into());
        self
    }

    pub fn with_property(mut self, property: NodeProperty) -> Self {
        self.properties.push(property);
        self
    }

    /// Lower-case, dash-separated form of the display name (`Get News` -> `get-news`)
    pub fn alias(&self) -> String {
        self.display_name
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("-")
    }

    pub fn property(&self, name: &str) -> Option<&NodeProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// An executable node
#[async_trait]
pub trait Node: Send + Sync + Debug {
    fn description(&self) -> NodeDescription;

    /// Process every input item supplied by `host`
    async fn execute(&self, host: &dyn ExecuteFunctions) -> Result<NodeOutput, NodeError>;
}
