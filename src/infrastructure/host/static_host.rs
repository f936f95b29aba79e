use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::credentials::{CredentialData, CredentialProvider};
use crate::domain::node::{ExecuteFunctions, JsonObject, WorkflowItem};
use crate::domain::NodeError;

/// In-memory host for running a node outside a workflow engine.
///
/// Per-item parameters take precedence over shared ones. Directly supplied
/// credential bundles take precedence over the credential provider.
#[derive(Debug, Clone, Default)]
pub struct StaticHost {
    node_name: String,
    items: Vec<WorkflowItem>,
    parameters: JsonObject,
    item_parameters: Vec<JsonObject>,
    credentials: HashMap<String, CredentialData>,
    credential_provider: Option<Arc<dyn CredentialProvider>>,
    continue_on_fail: bool,
}

impl StaticHost {
    pub fn new(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            ..Default::default()
        }
    }

    pub fn with_items(mut self, items: Vec<WorkflowItem>) -> Self {
        self.items = items;
        self
    }

    pub fn with_item(mut self, item: WorkflowItem) -> Self {
        self.items.push(item);
        self
    }

    /// Parameter shared by all items
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Parameter for a single item
    pub fn with_item_parameter(
        mut self,
        item_index: usize,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        if self.item_parameters.len() <= item_index {
            self.item_parameters.resize_with(item_index + 1, JsonObject::new);
        }
        self.item_parameters[item_index].insert(name.into(), value.into());
        self
    }

    pub fn with_parameters(mut self, parameters: JsonObject) -> Self {
        self.parameters.extend(parameters);
        self
    }

    /// One parameter set per item, by position
    pub fn with_item_parameters(mut self, parameters: Vec<JsonObject>) -> Self {
        self.item_parameters = parameters;
        self
    }

    pub fn with_credentials(mut self, name: impl Into<String>, data: CredentialData) -> Self {
        self.credentials.insert(name.into(), data);
        self
    }

    pub fn with_credential_provider(mut self, provider: Arc<dyn CredentialProvider>) -> Self {
        self.credential_provider = Some(provider);
        self
    }

    pub fn with_continue_on_fail(mut self, continue_on_fail: bool) -> Self {
        self.continue_on_fail = continue_on_fail;
        self
    }
}

#[async_trait]
impl ExecuteFunctions for StaticHost {
    fn node_name(&self) -> &str {
        &self.node_name
    }

    fn input_items(&self) -> Vec<WorkflowItem> {
        self.items.clone()
    }

    fn input_item(&self, item_index: usize) -> Option<WorkflowItem> {
        self.items.get(item_index).cloned()
    }

    fn node_parameter(&self, name: &str, item_index: usize) -> Option<Value> {
        self.item_parameters
            .get(item_index)
            .and_then(|parameters| parameters.get(name))
            .or_else(|| self.parameters.get(name))
            .cloned()
    }

    async fn credentials(&self, name: &str) -> Result<CredentialData, NodeError> {
        if let Some(data) = self.credentials.get(name) {
            return Ok(data.clone());
        }

        match &self.credential_provider {
            Some(provider) => provider.get_credential(name).await,
            None => Err(NodeError::credential(format!(
                "No credentials configured for '{}'",
                name
            ))),
        }
    }

    fn continue_on_fail(&self) -> bool {
        self.continue_on_fail
    }
}
