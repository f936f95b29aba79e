//! newsapi.org "everything" search

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;
use std::time::Instant;
use tracing::debug;

use crate::domain::credentials::{NewsApiCredentials, NEWS_API_BASE_URL, NEWS_API_CREDENTIAL};
use crate::domain::node::{
    run_per_item, ExecuteFunctions, IntegerBounds, ItemParameters, ItemResult, Node,
    NodeDescription, NodeOutput, NodeProperty,
};
use crate::domain::NodeError;
use crate::infrastructure::http_client::{join_url, status_text};

pub const GET_NEWS_NODE: &str = "rondonjonGetNews";

const EVERYTHING_PATH: &str = "/v2/everything";
const SORT_BY: &str = "publishedAt";
const FAILURE_CONTEXT: &str = "newsapi.org HTTP request failed";

const PARAM_QUERY: &str = "query";
const PARAM_SEARCH_IN_TITLE: &str = "searchInTitle";
const PARAM_SEARCH_IN_DESCRIPTION: &str = "searchInDescription";
const PARAM_SEARCH_IN_CONTENT: &str = "searchInContent";
const PARAM_SOURCES: &str = "sources";
const PARAM_DOMAINS: &str = "domains";
const PARAM_EXCLUDED_DOMAINS: &str = "excludedDomains";
const PARAM_PAGE_SIZE: &str = "pageSize";
const PARAM_PAGE_NUMBER: &str = "pageNumber";
const PARAM_DESTINATION_KEY: &str = "destinationKey";

const DEFAULT_PAGE_SIZE: i64 = 100;
const DEFAULT_PAGE_NUMBER: i64 = 1;
const DEFAULT_DESTINATION_KEY: &str = "news";

const PAGE_SIZE_BOUNDS: IntegerBounds = IntegerBounds {
    min: Some(1),
    max: Some(100),
};
const PAGE_NUMBER_BOUNDS: IntegerBounds = IntegerBounds {
    min: Some(1),
    max: None,
};

/// Normalized parameters of one news search
#[derive(Debug, Clone, PartialEq, Eq)]
struct NewsRequest {
    q: Option<String>,
    search_in: Option<String>,
    sources: Option<String>,
    domains: Option<String>,
    excluded_domains: Option<String>,
    page: i64,
    page_size: i64,
}

impl NewsRequest {
    fn from_parameters(params: &ItemParameters<'_>) -> Self {
        let q = params.optional_string(PARAM_QUERY);

        // searchIn only narrows a free-text query
        let search_in = q.as_ref().and_then(|_| {
            let fields: Vec<&str> = [
                (PARAM_SEARCH_IN_TITLE, "title"),
                (PARAM_SEARCH_IN_CONTENT, "content"),
                (PARAM_SEARCH_IN_DESCRIPTION, "description"),
            ]
            .into_iter()
            .filter(|(param, _)| params.boolean(param, true))
            .map(|(_, field)| field)
            .collect();

            (!fields.is_empty()).then(|| fields.join(","))
        });

        Self {
            q,
            search_in,
            sources: params.optional_string(PARAM_SOURCES),
            domains: params.optional_string(PARAM_DOMAINS),
            excluded_domains: params.optional_string(PARAM_EXCLUDED_DOMAINS),
            page: params.integer(PARAM_PAGE_NUMBER, DEFAULT_PAGE_NUMBER, PAGE_NUMBER_BOUNDS),
            page_size: params.integer(PARAM_PAGE_SIZE, DEFAULT_PAGE_SIZE, PAGE_SIZE_BOUNDS),
        }
    }

    fn query_pairs(&self, api_key: &str) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("apiKey", api_key.to_string()),
            ("page", self.page.to_string()),
            ("pageSize", self.page_size.to_string()),
            ("sortBy", SORT_BY.to_string()),
        ];

        let optional = [
            ("sources", &self.sources),
            ("domains", &self.domains),
            ("excludedDomains", &self.excluded_domains),
            ("q", &self.q),
            ("searchIn", &self.search_in),
        ];

        for (name, value) in optional {
            if let Some(value) = value {
                pairs.push((name, value.clone()));
            }
        }

        pairs
    }
}

/// Gets the latest news from newsapi.org
#[derive(Debug, Clone)]
pub struct GetNewsNode {
    client: reqwest::Client,
    base_url: String,
}

impl GetNewsNode {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: NEWS_API_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn execute_item(
        &self,
        host: &dyn ExecuteFunctions,
        credentials: &NewsApiCredentials,
        item_index: usize,
    ) -> Result<ItemResult, NodeError> {
        let params = ItemParameters::new(host, item_index);
        let request = NewsRequest::from_parameters(&params);
        let destination_key = params.destination_key(PARAM_DESTINATION_KEY, DEFAULT_DESTINATION_KEY);

        debug!(item_index, q = ?request.q, page = request.page, "Requesting news");

        let started = Instant::now();

        let response = self
            .client
            .get(join_url(&self.base_url, EVERYTHING_PATH))
            .query(&request.query_pairs(&credentials.api_key))
            .send()
            .await
            .map_err(|e| NodeError::transport(e.to_string()).with_context(FAILURE_CONTEXT))?;

        let status = response.status();

        if status != StatusCode::OK {
            return Err(NodeError::upstream_status(status.as_u16(), status_text(status))
                .with_context(FAILURE_CONTEXT));
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| NodeError::transport(e.to_string()).with_context(FAILURE_CONTEXT))?;

        Ok(ItemResult::new(
            destination_key,
            json!({
                "data": data,
                "durationMillis": started.elapsed().as_millis() as u64,
                "page": request.page,
                "pageSize": request.page_size,
                "status": status.as_u16(),
                "statusText": status_text(status),
            }),
        ))
    }
}

#[async_trait]
impl Node for GetNewsNode {
    fn description(&self) -> NodeDescription {
        NodeDescription::new(GET_NEWS_NODE, "Get News")
            .with_description("Gets the latest news from newsapi.org")
            .with_credential(NEWS_API_CREDENTIAL)
            .with_documentation_url("https://newsapi.org/docs")
            .with_property(
                NodeProperty::string(PARAM_QUERY, "Query")
                    .with_description("Free-text query to search for news"),
            )
            .with_property(
                NodeProperty::boolean(PARAM_SEARCH_IN_TITLE, "Search in Title")
                    .with_default(true)
                    .with_description("Whether to search in the title of the news (if query is provided)"),
            )
            .with_property(
                NodeProperty::boolean(PARAM_SEARCH_IN_DESCRIPTION, "Search in Description")
                    .with_default(true)
                    .with_description(
                        "Whether to search in the description of the news (if query is provided)",
                    ),
            )
            .with_property(
                NodeProperty::boolean(PARAM_SEARCH_IN_CONTENT, "Search in Content")
                    .with_default(true)
                    .with_description("Whether to search in the content of the news (if query is provided)"),
            )
            .with_property(
                NodeProperty::string(PARAM_SOURCES, "Sources").with_description(
                    "Comma-separated list of sources to get news from (see newsapi.org for available sources)",
                ),
            )
            .with_property(
                NodeProperty::string(PARAM_DOMAINS, "Domains").with_description(
                    "Comma-separated list of domains to get news from (e.g. bbc.co.uk, techcrunch.com, engadget.com)",
                ),
            )
            .with_property(
                NodeProperty::string(PARAM_EXCLUDED_DOMAINS, "Excluded Domains").with_description(
                    "Comma-separated list of domains to exclude news from (e.g. bbc.co.uk, techcrunch.com, engadget.com)",
                ),
            )
            .with_property(
                NodeProperty::number(PARAM_PAGE_SIZE, "Page Size")
                    .with_default(DEFAULT_PAGE_SIZE)
                    .with_bounds(PAGE_SIZE_BOUNDS)
                    .with_description(
                        "The number of results to return per page (default 100, minimum 1, maximum 100)",
                    ),
            )
            .with_property(
                NodeProperty::number(PARAM_PAGE_NUMBER, "Page Number")
                    .with_default(DEFAULT_PAGE_NUMBER)
                    .with_bounds(PAGE_NUMBER_BOUNDS)
                    .with_description("The page number to get (default 1, minimum 1)"),
            )
            .with_property(
                NodeProperty::string(PARAM_DESTINATION_KEY, "Destination Key").with_description(
                    "The key to which the newsapi.org response will be written (default: \"news\")",
                ),
            )
    }

    async fn execute(&self, host: &dyn ExecuteFunctions) -> Result<NodeOutput, NodeError> {
        let credentials: NewsApiCredentials = host
            .credentials(NEWS_API_CREDENTIAL)
            .await?
            .decode(NEWS_API_CREDENTIAL)?;
        let credentials = &credentials;

        run_per_item(host, move |item_index| {
            self.execute_item(host, credentials, item_index)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::credentials::CredentialData;
    use crate::domain::node::WorkflowItem;
    use crate::domain::ErrorKind;
    use crate::infrastructure::host::StaticHost;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn host() -> StaticHost {
        StaticHost::new(GET_NEWS_NODE)
            .with_item(WorkflowItem::default())
            .with_credentials(NEWS_API_CREDENTIAL, CredentialData::new().with("apiKey", "news-key"))
    }

    fn node(server: &MockServer) -> GetNewsNode {
        GetNewsNode::new(reqwest::Client::new()).with_base_url(server.uri())
    }

    async fn received_query(server: &MockServer) -> Vec<(String, String)> {
        let requests = server.received_requests().await.unwrap();
        requests[0]
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_request_normalization() {
        let host = StaticHost::new(GET_NEWS_NODE)
            .with_parameter(PARAM_QUERY, "  rust  ")
            .with_parameter(PARAM_SEARCH_IN_CONTENT, false)
            .with_parameter(PARAM_SOURCES, "   ")
            .with_parameter(PARAM_DOMAINS, " bbc.co.uk ")
            .with_parameter(PARAM_PAGE_SIZE, 250)
            .with_parameter(PARAM_PAGE_NUMBER, 0);

        let request = NewsRequest::from_parameters(&ItemParameters::new(&host, 0));

        assert_eq!(request.q.as_deref(), Some("rust"));
        assert_eq!(request.search_in.as_deref(), Some("title,description"));
        assert_eq!(request.sources, None);
        assert_eq!(request.domains.as_deref(), Some("bbc.co.uk"));
        assert_eq!(request.page_size, 100);
        assert_eq!(request.page, 1);
    }

    #[test]
    fn test_search_in_omitted_when_all_flags_off() {
        let host = StaticHost::new(GET_NEWS_NODE)
            .with_parameter(PARAM_QUERY, "rust")
            .with_parameter(PARAM_SEARCH_IN_TITLE, false)
            .with_parameter(PARAM_SEARCH_IN_CONTENT, false)
            .with_parameter(PARAM_SEARCH_IN_DESCRIPTION, false);

        let request = NewsRequest::from_parameters(&ItemParameters::new(&host, 0));
        let pairs = request.query_pairs("key");

        assert!(pairs.iter().any(|(k, v)| *k == "q" && v == "rust"));
        assert!(!pairs.iter().any(|(k, _)| *k == "searchIn"));
    }

    #[tokio::test]
    async fn test_empty_query_sends_no_q_or_search_in() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .and(query_param("apiKey", "news-key"))
            .and(query_param("sortBy", "publishedAt"))
            .and(query_param("page", "1"))
            .and(query_param("pageSize", "100"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "ok", "totalResults": 0, "articles": []})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let output = node(&server).execute(&host()).await.unwrap();

        let query = received_query(&server).await;
        assert!(!query.iter().any(|(k, _)| k == "q" || k == "searchIn"));

        let news = output[0][0].get("news").unwrap();
        assert_eq!(news["status"], json!(200));
        assert_eq!(news["statusText"], json!("OK"));
        assert_eq!(news["page"], json!(1));
        assert_eq!(news["pageSize"], json!(100));
        assert_eq!(news["data"]["status"], json!("ok"));
        assert!(news["durationMillis"].is_u64());
    }

    #[tokio::test]
    async fn test_query_with_title_only() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .and(query_param("q", "x"))
            .and(query_param("searchIn", "title"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"articles": []})))
            .expect(1)
            .mount(&server)
            .await;

        let host = host()
            .with_parameter(PARAM_QUERY, "x")
            .with_parameter(PARAM_SEARCH_IN_TITLE, true)
            .with_parameter(PARAM_SEARCH_IN_CONTENT, false)
            .with_parameter(PARAM_SEARCH_IN_DESCRIPTION, false)
            .with_parameter(PARAM_DESTINATION_KEY, "headlines");

        let output = node(&server).execute(&host).await.unwrap();

        assert!(output[0][0].get("headlines").is_some());
        assert!(output[0][0].get("news").is_none());
    }

    #[tokio::test]
    async fn test_non_ok_status_fails_item() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"status": "error", "code": "apiKeyInvalid"})),
            )
            .mount(&server)
            .await;

        let error = node(&server).execute(&host()).await.unwrap_err();

        assert_eq!(error.item_index(), Some(0));
        assert_eq!(error.kind(), ErrorKind::UpstreamStatus);
        assert_eq!(
            error.root().to_string(),
            "newsapi.org HTTP request failed: Unauthorized"
        );
    }

    #[tokio::test]
    async fn test_unreadable_body_is_transport_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let error = node(&server).execute(&host()).await.unwrap_err();

        assert_eq!(error.item_index(), Some(0));
        assert_eq!(error.kind(), ErrorKind::Transport);
        assert!(error
            .root()
            .to_string()
            .starts_with("newsapi.org HTTP request failed: "));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let node = GetNewsNode::new(reqwest::Client::new()).with_base_url(format!("http://{}", address));
        let error = node.execute(&host()).await.unwrap_err();

        assert_eq!(error.item_index(), Some(0));
        assert_eq!(error.kind(), ErrorKind::Transport);
        assert!(error
            .root()
            .to_string()
            .starts_with("newsapi.org HTTP request failed: "));
    }

    #[tokio::test]
    async fn test_continue_on_fail_keeps_original_item() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let host = host().with_continue_on_fail(true);
        let output = node(&server).execute(&host).await.unwrap();

        let items = &output[0];
        assert_eq!(items.len(), 2);
        assert!(items[0].get("news").is_none());
        assert_eq!(items[1].paired_item, Some(0));
        assert_eq!(
            items[1].error.as_ref().unwrap().message,
            "newsapi.org HTTP request failed: Internal Server Error"
        );
    }

    #[tokio::test]
    async fn test_missing_credentials_abort_run() {
        let server = MockServer::start().await;
        let host = StaticHost::new(GET_NEWS_NODE)
            .with_item(WorkflowItem::default())
            .with_continue_on_fail(true);

        let error = node(&server).execute(&host).await.unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Credential);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[test]
    fn test_description() {
        let description = GetNewsNode::new(reqwest::Client::new()).description();

        assert_eq!(description.name, "rondonjonGetNews");
        assert_eq!(description.alias(), "get-news");
        assert_eq!(description.properties.len(), 10);

        let page_size = description.property(PARAM_PAGE_SIZE).unwrap();
        assert_eq!(page_size.default, Some(json!(100)));
        assert_eq!(page_size.type_options.max_value, Some(100));
    }
}
