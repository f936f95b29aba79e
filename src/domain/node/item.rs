//! Workflow items and the result writer

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::error::{ErrorKind, NodeError};

/// JSON data bag of a workflow item
pub type JsonObject = Map<String, Value>;

/// Output of a node: one item sequence per output port.
///
/// Every node in this crate has a single output port, so the outer vector
/// always holds exactly one sequence.
pub type NodeOutput = Vec<Vec<WorkflowItem>>;

/// One unit of workflow data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowItem {
    /// The item's data bag
    pub json: JsonObject,

    /// Failure captured for this item (error items only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ItemError>,

    /// Index of the input item this item was derived from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paired_item: Option<usize>,
}

impl WorkflowItem {
    pub fn new(json: JsonObject) -> Self {
        Self {
            json,
            error: None,
            paired_item: None,
        }
    }

    /// Build an item from a JSON object value; other values yield `None`
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(json) => Some(Self::new(json)),
            _ => None,
        }
    }

    /// Build the synthetic item appended when a failure is captured as data
    pub fn failed(json: JsonObject, error: ItemError, paired_item: usize) -> Self {
        Self {
            json,
            error: Some(error),
            paired_item: Some(paired_item),
        }
    }

    /// Write `value` under `key`, replacing whatever was stored there
    pub fn set_result(&mut self, key: impl Into<String>, value: Value) {
        self.json.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.json.get(key)
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Serializable form of a [`NodeError`] attached to an error item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemError {
    pub message: String,
    pub kind: ErrorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
}

impl From<&NodeError> for ItemError {
    fn from(error: &NodeError) -> Self {
        Self {
            message: error.root().to_string(),
            kind: error.kind(),
            item_index: error.item_index(),
            node: error.node().map(str::to_string),
        }
    }
}

/// Successful outcome of a per-item operation: a value for the destination key
#[derive(Debug, Clone, PartialEq)]
pub struct ItemResult {
    key: String,
    value: Value,
}

impl ItemResult {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Merge into the item's data bag
    pub fn write_to(self, item: &mut WorkflowItem) {
        item.set_result(self.key, self.value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: Value) -> WorkflowItem {
        WorkflowItem::from_value(value).unwrap()
    }

    #[test]
    fn test_set_result_overwrites_existing_key() {
        let mut item = item(json!({"news": "old", "keep": 1}));

        item.set_result("news", json!({"status": 200}));

        assert_eq!(item.get("news"), Some(&json!({"status": 200})));
        assert_eq!(item.get("keep"), Some(&json!(1)));
    }

    #[test]
    fn test_set_result_is_idempotent() {
        let mut once = item(json!({"a": 1}));
        once.set_result("contents", json!([1, 2]));

        let mut twice = item(json!({"a": 1}));
        twice.set_result("contents", json!([1, 2]));
        twice.set_result("contents", json!([1, 2]));

        assert_eq!(once, twice);
    }

    #[test]
    fn test_item_result_write_to() {
        let mut item = WorkflowItem::default();

        ItemResult::new("sanitizedHtml", json!("<b>ok</b>")).write_to(&mut item);

        assert_eq!(item.get("sanitizedHtml"), Some(&json!("<b>ok</b>")));
        assert!(!item.is_error());
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(WorkflowItem::from_value(json!([1, 2])).is_none());
        assert!(WorkflowItem::from_value(json!("text")).is_none());
    }

    #[test]
    fn test_failed_item_serialization() {
        let error = NodeError::filesystem("no such directory").at_item("rondonjonReadDir", 2);
        let failed = WorkflowItem::failed(
            json!({"id": 2}).as_object().cloned().unwrap(),
            ItemError::from(&error),
            2,
        );

        let value = serde_json::to_value(&failed).unwrap();

        assert_eq!(value["json"], json!({"id": 2}));
        assert_eq!(value["pairedItem"], json!(2));
        assert_eq!(value["error"]["message"], json!("no such directory"));
        assert_eq!(value["error"]["kind"], json!("filesystem"));
        assert_eq!(value["error"]["itemIndex"], json!(2));
        assert_eq!(value["error"]["node"], json!("rondonjonReadDir"));
    }

    #[test]
    fn test_plain_item_omits_error_fields() {
        let value = serde_json::to_value(item(json!({"a": true}))).unwrap();
        assert_eq!(value, json!({"json": {"a": true}}));
    }
}
