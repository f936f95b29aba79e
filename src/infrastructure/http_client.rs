use reqwest::StatusCode;

use crate::config::HttpConfig;
use crate::domain::NodeError;

/// Shared reqwest client for all outbound node requests
pub fn build_http_client(config: &HttpConfig) -> Result<reqwest::Client, NodeError> {
    reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(|e| NodeError::operation(format!("Failed to build HTTP client: {}", e)))
}

/// Canonical reason phrase, empty for unknown codes
pub fn status_text(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("").to_string()
}

/// Join a base URL and an absolute path without doubling the slash
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
