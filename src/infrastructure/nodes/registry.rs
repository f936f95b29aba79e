//! Node registry
//!
//! Holds the executable nodes and resolves them by node name or alias.

use std::sync::Arc;
use tracing::{debug, info};

use super::{
    GetNewsNode, GoogleCustomSearchNode, ReadDirNode, SanitizeHtmlNode, SendPumbleMessageNode,
};
use crate::config::AppConfig;
use crate::domain::node::{Node, NodeDescription};
use crate::domain::NodeError;
use crate::infrastructure::http_client::build_http_client;
use crate::infrastructure::web_search::GoogleCustomSearchClient;

#[derive(Debug, Default)]
pub struct NodeRegistry {
    /// Registration order is listing order
    nodes: Vec<Arc<dyn Node>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in node, configured from `config`
    pub fn with_builtin_nodes(config: &AppConfig) -> Result<Self, NodeError> {
        let client = build_http_client(&config.http)?;

        let search_client = GoogleCustomSearchClient::new(client.clone())
            .with_base_url(config.http.custom_search_base_url.clone());

        let mut registry = Self::new();

        registry.register(Arc::new(
            GetNewsNode::new(client.clone()).with_base_url(config.http.news_api_base_url.clone()),
        ))?;
        registry.register(Arc::new(
            GoogleCustomSearchNode::new(Arc::new(search_client))
                .with_max_page_size(config.nodes.search_max_page_size),
        ))?;
        registry.register(Arc::new(
            SendPumbleMessageNode::new(client)
                .with_base_url(config.http.pumble_api_base_url.clone())
                .with_default_timeout_ms(config.nodes.pumble_timeout_ms),
        ))?;
        registry.register(Arc::new(ReadDirNode::new()))?;
        registry.register(Arc::new(SanitizeHtmlNode::new()))?;

        info!(nodes = registry.nodes.len(), "Registered built-in nodes");

        Ok(registry)
    }

    /// Add a node; node names and aliases must be unique
    pub fn register(&mut self, node: Arc<dyn Node>) -> Result<(), NodeError> {
        let description = node.description();

        if self.find(&description.name).is_some() || self.find(&description.alias()).is_some() {
            return Err(NodeError::validation(format!(
                "Node '{}' is already registered",
                description.name
            )));
        }

        debug!(node = %description.name, alias = %description.alias(), "Registering node");

        self.nodes.push(node);
        Ok(())
    }

    /// Look a node up by node name (`rondonjonGetNews`) or alias (`get-news`)
    pub fn find(&self, name: &str) -> Option<Arc<dyn Node>> {
        self.nodes
            .iter()
            .find(|node| {
                let description = node.description();
                description.name == name || description.alias() == name
            })
            .cloned()
    }

    pub fn descriptions(&self) -> Vec<NodeDescription> {
        self.nodes.iter().map(|node| node.description()).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> NodeRegistry {
        NodeRegistry::with_builtin_nodes(&AppConfig::default()).unwrap()
    }

    #[test]
    fn test_builtin_nodes() {
        let registry = registry();
        let names: Vec<String> = registry.descriptions().into_iter().map(|d| d.name).collect();

        assert_eq!(
            names,
            vec![
                "rondonjonGetNews",
                "rondonjonGoogleCustomSearch",
                "rondonjonSendPumbleMessage",
                "rondonjonReadDir",
                "rondonjonSanitizeHtml",
            ]
        );
    }

    #[test]
    fn test_find_by_name_or_alias() {
        let registry = registry();

        assert!(registry.find("rondonjonReadDir").is_some());
        assert_eq!(
            registry.find("send-pumble-message").unwrap().description().name,
            "rondonjonSendPumbleMessage"
        );
        assert!(registry.find("google-custom-search").is_some());
        assert!(registry.find("unknown").is_none());
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = NodeRegistry::new();

        registry.register(Arc::new(ReadDirNode::new())).unwrap();
        assert!(registry.register(Arc::new(ReadDirNode::new())).is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_configured_defaults_reach_descriptions() {
        let mut config = AppConfig::default();
        config.nodes.pumble_timeout_ms = 1500;
        config.nodes.search_max_page_size = 5;

        let registry = NodeRegistry::with_builtin_nodes(&config).unwrap();

        let pumble = registry.find("send-pumble-message").unwrap().description();
        assert_eq!(
            pumble.property("timeoutMillis").unwrap().default,
            Some(serde_json::json!(1500))
        );

        let search = registry.find("google-custom-search").unwrap().description();
        assert_eq!(search.property("pageSize").unwrap().type_options.max_value, Some(5));
    }
}
