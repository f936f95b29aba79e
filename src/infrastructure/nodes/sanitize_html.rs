//! HTML sanitizing node

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::node::{
    run_per_item, ExecuteFunctions, ItemParameters, ItemResult, Node, NodeDescription, NodeOutput,
    NodeProperty,
};
use crate::domain::NodeError;
use crate::infrastructure::html::HtmlSanitizer;

pub const SANITIZE_HTML_NODE: &str = "rondonjonSanitizeHtml";

const PARAM_HTML: &str = "html";
const PARAM_DESTINATION_KEY: &str = "destinationKey";

const DEFAULT_DESTINATION_KEY: &str = "sanitizedHtml";

/// Sanitizes a given HTML string
#[derive(Debug, Clone, Default)]
pub struct SanitizeHtmlNode {
    sanitizer: HtmlSanitizer,
}

impl SanitizeHtmlNode {
    pub fn new() -> Self {
        Self::default()
    }

    async fn execute_item(
        &self,
        host: &dyn ExecuteFunctions,
        item_index: usize,
    ) -> Result<ItemResult, NodeError> {
        let params = ItemParameters::new(host, item_index);
        let html = params.string(PARAM_HTML, "");
        let destination_key = params.destination_key(PARAM_DESTINATION_KEY, DEFAULT_DESTINATION_KEY);

        Ok(ItemResult::new(
            destination_key,
            Value::String(self.sanitizer.sanitize(&html)),
        ))
    }
}

#[async_trait]
impl Node for SanitizeHtmlNode {
    fn description(&self) -> NodeDescription {
        NodeDescription::new(SANITIZE_HTML_NODE, "Sanitize HTML")
            .with_description("Sanitizes a given HTML string")
            .with_property(
                NodeProperty::string(PARAM_HTML, "HTML")
                    .required()
                    .with_description("The HTML string that will be sanitized"),
            )
            .with_property(
                NodeProperty::string(PARAM_DESTINATION_KEY, "Destination Key").with_description(
                    "The key to which the sanitized HTML will be written (default: \"sanitizedHtml\")",
                ),
            )
    }

    async fn execute(&self, host: &dyn ExecuteFunctions) -> Result<NodeOutput, NodeError> {
        run_per_item(host, move |item_index| self.execute_item(host, item_index)).await
    }
}
