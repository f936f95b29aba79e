//! Web search client abstraction

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

use crate::domain::credentials::GoogleCustomSearchCredentials;
use crate::domain::error::NodeError;

/// One page request against the search engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub q: String,

    /// Results per page
    pub num: u32,

    /// 1-based index of the first result
    pub start: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cr: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact_terms: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_terms: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
}

impl SearchQuery {
    /// First result index of a 1-based page
    pub fn start_for_page(page_index: u32, page_size: u32) -> u32 {
        page_index
            .saturating_sub(1)
            .saturating_mul(page_size)
            .saturating_add(1)
    }
}

/// A single search hit; fields the engine omitted are `None`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchItem {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub link: Option<String>,

    #[serde(default)]
    pub snippet: Option<String>,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait WebSearchClient: Send + Sync {
    async fn search(
        &self,
        credentials: &GoogleCustomSearchCredentials,
        query: &SearchQuery,
    ) -> Result<Vec<SearchItem>, NodeError>;
}
