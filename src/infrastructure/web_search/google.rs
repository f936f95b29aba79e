use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::credentials::{GoogleCustomSearchCredentials, GOOGLE_CUSTOM_SEARCH_BASE_URL};
use crate::domain::web_search::{SearchItem, SearchQuery, WebSearchClient};
use crate::domain::NodeError;
use crate::infrastructure::http_client::{join_url, status_text};

const SEARCH_PATH: &str = "/customsearch/v1";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    /// Absent when the page has no results
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Google Programmable Search JSON API client
#[derive(Debug, Clone)]
pub struct GoogleCustomSearchClient {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleCustomSearchClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: GOOGLE_CUSTOM_SEARCH_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn query_pairs(
        credentials: &GoogleCustomSearchCredentials,
        query: &SearchQuery,
    ) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("key", credentials.auth.clone()),
            ("cx", credentials.cx.clone()),
            ("q", query.q.clone()),
            ("num", query.num.to_string()),
            ("start", query.start.to_string()),
        ];

        let optional = [
            ("cr", &query.cr),
            ("exactTerms", &query.exact_terms),
            ("excludeTerms", &query.exclude_terms),
            ("fileType", &query.file_type),
        ];

        for (name, value) in optional {
            if let Some(value) = value {
                pairs.push((name, value.clone()));
            }
        }

        pairs
    }
}

#[async_trait]
impl WebSearchClient for GoogleCustomSearchClient {
    async fn search(
        &self,
        credentials: &GoogleCustomSearchCredentials,
        query: &SearchQuery,
    ) -> Result<Vec<SearchItem>, NodeError> {
        let url = join_url(&self.base_url, SEARCH_PATH);

        debug!(q = %query.q, num = query.num, start = query.start, "Searching");

        let response = self
            .client
            .get(&url)
            .query(&Self::query_pairs(credentials, query))
            .send()
            .await
            .map_err(|e| NodeError::transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NodeError::transport(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| status_text(status));

            return Err(NodeError::upstream_status(status.as_u16(), message));
        }

        let response: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| NodeError::operation(format!("Invalid search response: {}", e)))?;

        Ok(response.items)
    }
}
