//! Domain layer - Node contracts, items and credentials

pub mod credentials;
pub mod error;
pub mod node;
pub mod web_search;

pub use credentials::{CredentialData, CredentialDescription, CredentialProvider};
pub use error::{ErrorKind, NodeError};
pub use node::{
    run_per_item, ExecuteFunctions, ItemError, ItemParameters, ItemResult, Node, NodeDescription,
    NodeOutput, NodeProperty, WorkflowItem,
};
pub use web_search::{SearchItem, SearchQuery, WebSearchClient};
