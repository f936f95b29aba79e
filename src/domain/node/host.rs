use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use super::item::WorkflowItem;
use crate::domain::credentials::CredentialData;
use crate::domain::error::NodeError;

/// Capabilities the workflow host provides to a node during one invocation
#[async_trait]
pub trait ExecuteFunctions: Send + Sync + Debug {
    /// Name of the node instance being executed
    fn node_name(&self) -> &str;

    /// The items handed to the node, in input order
    fn input_items(&self) -> Vec<WorkflowItem>;

    /// A single pristine input item
    fn input_item(&self, item_index: usize) -> Option<WorkflowItem> {
        self.input_items().into_iter().nth(item_index)
    }

    /// Resolved parameter value for an item, `None` when the host has none
    fn node_parameter(&self, name: &str, item_index: usize) -> Option<Value>;

    /// Resolved parameter value for an item, `default` when omitted or null
    fn get_parameter(&self, name: &str, item_index: usize, default: Value) -> Value {
        match self.node_parameter(name, item_index) {
            None | Some(Value::Null) => default,
            Some(value) => value,
        }
    }

    /// Credential bundle configured for this node instance
    async fn credentials(&self, name: &str) -> Result<CredentialData, NodeError>;

    /// Whether per-item failures are captured as data instead of aborting
    fn continue_on_fail(&self) -> bool;
}
