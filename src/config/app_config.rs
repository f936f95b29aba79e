use serde::Deserialize;

use crate::domain::credentials::{
    GOOGLE_CUSTOM_SEARCH_BASE_URL, NEWS_API_BASE_URL, PUMBLE_API_BASE_URL,
};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub http: HttpConfig,
    pub nodes: NodeDefaults,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Outbound HTTP settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub news_api_base_url: String,
    pub custom_search_base_url: String,
    pub pumble_api_base_url: String,
    pub user_agent: String,
}

/// Fallbacks the nodes apply when the host leaves a value out
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NodeDefaults {
    pub pumble_timeout_ms: u64,
    pub search_max_page_size: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            news_api_base_url: NEWS_API_BASE_URL.to_string(),
            custom_search_base_url: GOOGLE_CUSTOM_SEARCH_BASE_URL.to_string(),
            pumble_api_base_url: PUMBLE_API_BASE_URL.to_string(),
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for NodeDefaults {
    fn default() -> Self {
        Self {
            pumble_timeout_ms: 5000,
            search_max_page_size: 10,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.http.news_api_base_url, "https://newsapi.org");
        assert_eq!(config.http.custom_search_base_url, "https://www.googleapis.com");
        assert_eq!(config.nodes.pumble_timeout_ms, 5000);
        assert_eq!(config.nodes.search_max_page_size, 10);
    }

    #[test]
    fn test_partial_source_keeps_defaults() {
        let config: AppConfig = config::Config::builder()
            .set_override("nodes.pumble_timeout_ms", 250i64)
            .unwrap()
            .set_override("logging.format", "json")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.nodes.pumble_timeout_ms, 250);
        assert_eq!(config.nodes.search_max_page_size, 10);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.http.pumble_api_base_url, PUMBLE_API_BASE_URL);
    }
}
