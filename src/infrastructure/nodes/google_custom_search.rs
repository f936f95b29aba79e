//! Google Programmable Search node

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::domain::credentials::{GoogleCustomSearchCredentials, GOOGLE_CUSTOM_SEARCH_CREDENTIAL};
use crate::domain::node::{
    run_per_item, ExecuteFunctions, IntegerBounds, ItemParameters, ItemResult, Node,
    NodeDescription, NodeOutput, NodeProperty,
};
use crate::domain::web_search::{SearchItem, SearchQuery, WebSearchClient};
use crate::domain::NodeError;

pub const GOOGLE_CUSTOM_SEARCH_NODE: &str = "rondonjonGoogleCustomSearch";

const FAILURE_CONTEXT: &str = "Google Custom Search failed";

const PARAM_QUERY: &str = "query";
const PARAM_PAGE_SIZE: &str = "pageSize";
const PARAM_PAGE_INDEX: &str = "pageIndex";
const PARAM_CR: &str = "cr";
const PARAM_EXACT_TERMS: &str = "exactTerms";
const PARAM_EXCLUDE_TERMS: &str = "excludeTerms";
const PARAM_FILE_TYPE: &str = "fileType";
const PARAM_DESTINATION_KEY: &str = "destinationKey";

const DEFAULT_PAGE_SIZE: i64 = 10;
const DEFAULT_PAGE_INDEX: i64 = 1;
const DEFAULT_DESTINATION_KEY: &str = "search";

/// Search hit as written to the item, missing fields as empty strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct SearchResult {
    title: String,
    link: String,
    snippet: String,
}

impl From<SearchItem> for SearchResult {
    fn from(item: SearchItem) -> Self {
        Self {
            title: item.title.unwrap_or_default(),
            link: item.link.unwrap_or_default(),
            snippet: item.snippet.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    cr: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    exact_terms: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    exclude_terms: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    file_type: Option<String>,

    page_index: u32,

    page_size: u32,

    q: String,

    results: Vec<SearchResult>,
}

/// Searches and returns results through a [`WebSearchClient`]
pub struct GoogleCustomSearchNode {
    client: Arc<dyn WebSearchClient>,
    max_page_size: u32,
}

impl GoogleCustomSearchNode {
    pub fn new(client: Arc<dyn WebSearchClient>) -> Self {
        Self {
            client,
            max_page_size: DEFAULT_PAGE_SIZE as u32,
        }
    }

    /// Upper bound for the page size, at least 1
    pub fn with_max_page_size(mut self, max_page_size: u32) -> Self {
        self.max_page_size = max_page_size.max(1);
        self
    }

    fn page_size_bounds(&self) -> IntegerBounds {
        IntegerBounds::between(1, i64::from(self.max_page_size))
    }

    fn build_query(&self, params: &ItemParameters<'_>) -> (SearchQuery, u32) {
        let page_size = params.integer(PARAM_PAGE_SIZE, DEFAULT_PAGE_SIZE, self.page_size_bounds());
        let page_index = params.integer(PARAM_PAGE_INDEX, DEFAULT_PAGE_INDEX, IntegerBounds::at_least(1));

        let num = u32::try_from(page_size).unwrap_or(self.max_page_size);
        let page_index = u32::try_from(page_index).unwrap_or(u32::MAX);

        let query = SearchQuery {
            q: params.trimmed(PARAM_QUERY, ""),
            num,
            start: SearchQuery::start_for_page(page_index, num),
            cr: params.optional_string(PARAM_CR),
            exact_terms: params.optional_string(PARAM_EXACT_TERMS),
            exclude_terms: params.optional_string(PARAM_EXCLUDE_TERMS),
            file_type: params.optional_string(PARAM_FILE_TYPE),
        };

        (query, page_index)
    }

    async fn execute_item(
        &self,
        host: &dyn ExecuteFunctions,
        credentials: &GoogleCustomSearchCredentials,
        item_index: usize,
    ) -> Result<ItemResult, NodeError> {
        let params = ItemParameters::new(host, item_index);
        let (query, page_index) = self.build_query(&params);
        let destination_key = params.destination_key(PARAM_DESTINATION_KEY, DEFAULT_DESTINATION_KEY);

        debug!(item_index, q = %query.q, start = query.start, "Searching the web");

        let items = self
            .client
            .search(credentials, &query)
            .await
            .map_err(|e| e.with_context(FAILURE_CONTEXT))?;

        let output = SearchOutput {
            cr: query.cr,
            exact_terms: query.exact_terms,
            exclude_terms: query.exclude_terms,
            file_type: query.file_type,
            page_index,
            page_size: query.num,
            q: query.q,
            results: items.into_iter().map(SearchResult::from).collect(),
        };

        let value = serde_json::to_value(output)
            .map_err(|e| NodeError::operation(e.to_string()).with_context(FAILURE_CONTEXT))?;

        Ok(ItemResult::new(destination_key, value))
    }
}

impl std::fmt::Debug for GoogleCustomSearchNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleCustomSearchNode")
            .field("max_page_size", &self.max_page_size)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Node for GoogleCustomSearchNode {
    fn description(&self) -> NodeDescription {
        NodeDescription::new(GOOGLE_CUSTOM_SEARCH_NODE, "Google Custom Search")
            .with_description("Searches and returns the results using the Google Custom Search API")
            .with_credential(GOOGLE_CUSTOM_SEARCH_CREDENTIAL)
            .with_documentation_url("https://developers.google.com/custom-search/v1/introduction")
            .with_property(
                NodeProperty::string(PARAM_QUERY, "Query")
                    .required()
                    .with_description("The search query"),
            )
            .with_property(
                NodeProperty::number(PARAM_PAGE_SIZE, "Page Size")
                    .with_default(DEFAULT_PAGE_SIZE)
                    .with_bounds(self.page_size_bounds())
                    .with_description(
                        "The number of search results per page. Note that the API provides a maximum of 100 results in total.",
                    ),
            )
            .with_property(
                NodeProperty::number(PARAM_PAGE_INDEX, "Page Index")
                    .with_default(DEFAULT_PAGE_INDEX)
                    .with_bounds(IntegerBounds::at_least(1))
                    .with_description(
                        "The index of the page to return (default 1, minimum 1). Note that the API provides a maximum of 100 results in total.",
                    ),
            )
            .with_property(
                NodeProperty::string(PARAM_CR, "Country Restriction")
                    .with_description("Restricts the search to documents in the specified country"),
            )
            .with_property(
                NodeProperty::string(PARAM_EXACT_TERMS, "Exact Terms")
                    .with_description("A phrase that all documents in the search results must contain"),
            )
            .with_property(
                NodeProperty::string(PARAM_EXCLUDE_TERMS, "Exclude Terms").with_description(
                    "A word or phrase that should not appear in any documents in the search results",
                ),
            )
            .with_property(
                NodeProperty::string(PARAM_FILE_TYPE, "File Type")
                    .with_description("Restricts results to files of the given extension"),
            )
            .with_property(
                NodeProperty::string(PARAM_DESTINATION_KEY, "Destination Key").with_description(
                    "The key to which the search result will be written (default: \"search\")",
                ),
            )
    }

    async fn execute(&self, host: &dyn ExecuteFunctions) -> Result<NodeOutput, NodeError> {
        let credentials: GoogleCustomSearchCredentials = host
            .credentials(GOOGLE_CUSTOM_SEARCH_CREDENTIAL)
            .await?
            .decode(GOOGLE_CUSTOM_SEARCH_CREDENTIAL)?;
        let credentials = &credentials;

        run_per_item(host, move |item_index| {
            self.execute_item(host, credentials, item_index)
        })
        .await
    }
}
