//! Workflow nodes
//!
//! Executable nodes for a workflow-automation host, with support for:
//! - News search (newsapi.org) and web search (Google Programmable Search)
//! - Sending Pumble channel messages
//! - Local directory listing and HTML sanitizing
//! - Per-item failure isolation with continue-on-failure

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{ExecuteFunctions, Node, NodeError, NodeOutput, WorkflowItem};
pub use infrastructure::host::StaticHost;
pub use infrastructure::nodes::NodeRegistry;
