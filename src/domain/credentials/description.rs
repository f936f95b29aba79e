//! Credential type metadata: fields, injection rule and test request

use serde::{Deserialize, Serialize};

use super::credential::{
    GOOGLE_CUSTOM_SEARCH_CREDENTIAL, NEWS_API_CREDENTIAL, PUMBLE_CREDENTIAL,
};
use crate::domain::node::NodeProperty;

pub const NEWS_API_BASE_URL: &str = "https://newsapi.org";
pub const GOOGLE_CUSTOM_SEARCH_BASE_URL: &str = "https://www.googleapis.com";
pub const PUMBLE_API_BASE_URL: &str = "https://pumble-api-keys.addons.marketplace.cake.com";

/// Where a credential field is injected into outgoing requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Authentication {
    QueryParameter { name: String, property: String },
    Header { name: String, property: String },
}

impl Authentication {
    /// Credential field that supplies the injected value
    pub fn property(&self) -> &str {
        match self {
            Self::QueryParameter { property, .. } | Self::Header { property, .. } => property,
        }
    }
}

/// Request that proves a credential bundle works
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialTestRequest {
    pub base_url: String,

    /// Path and query relative to `base_url`
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDescription {
    pub name: String,

    pub display_name: String,

    pub documentation_url: String,

    pub properties: Vec<NodeProperty>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticate: Option<Authentication>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<CredentialTestRequest>,
}

impl CredentialDescription {
    pub fn news_api() -> Self {
        Self {
            name: NEWS_API_CREDENTIAL.to_string(),
            display_name: "News API".to_string(),
            documentation_url: "https://newsapi.org/docs".to_string(),
            properties: vec![NodeProperty::string("apiKey", "API Key")
                .password()
                .required()],
            authenticate: Some(Authentication::QueryParameter {
                name: "apiKey".to_string(),
                property: "apiKey".to_string(),
            }),
            test: Some(CredentialTestRequest {
                base_url: NEWS_API_BASE_URL.to_string(),
                url: "/v2/everything?q=n8n&pageSize=1&page=1".to_string(),
            }),
        }
    }

    pub fn google_custom_search_api() -> Self {
        Self {
            name: GOOGLE_CUSTOM_SEARCH_CREDENTIAL.to_string(),
            display_name: "Google Custom Search API".to_string(),
            documentation_url: "https://developers.google.com/custom-search/v1/introduction"
                .to_string(),
            properties: vec![
                NodeProperty::string("auth", "API Key").password().required(),
                NodeProperty::string("cx", "Search Engine ID")
                    .required()
                    .with_description("The Programmable Search Engine ID"),
            ],
            authenticate: None,
            test: None,
        }
    }

    pub fn pumble_api() -> Self {
        Self {
            name: PUMBLE_CREDENTIAL.to_string(),
            display_name: "Pumble API".to_string(),
            documentation_url:
                "https://pumble.com/help/integrations/automation-workflow-integrations/api-keys-integration/"
                    .to_string(),
            properties: vec![NodeProperty::string("apiKey", "API Key")
                .password()
                .required()],
            authenticate: Some(Authentication::Header {
                name: "Api-Key".to_string(),
                property: "apiKey".to_string(),
            }),
            test: Some(CredentialTestRequest {
                base_url: PUMBLE_API_BASE_URL.to_string(),
                url: "/listChannels".to_string(),
            }),
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            Self::news_api(),
            Self::google_custom_search_api(),
            Self::pumble_api(),
        ]
    }

    pub fn find(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|d| d.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_find_credentials() {
        assert!(CredentialDescription::find("rondonjonPumbleApi").is_some());
        assert!(CredentialDescription::find("unknown").is_none());
        assert_eq!(CredentialDescription::all().len(), 3);
    }

    #[test]
    fn test_injection_rules() {
        let news = CredentialDescription::news_api();
        assert_eq!(
            news.authenticate,
            Some(Authentication::QueryParameter {
                name: "apiKey".to_string(),
                property: "apiKey".to_string(),
            })
        );

        let pumble = CredentialDescription::pumble_api();
        assert_eq!(pumble.authenticate.as_ref().unwrap().property(), "apiKey");
        assert_eq!(pumble.test.unwrap().url, "/listChannels");

        assert!(CredentialDescription::google_custom_search_api().test.is_none());
    }

    #[test]
    fn test_serialization_marks_secrets() {
        let value = serde_json::to_value(CredentialDescription::google_custom_search_api()).unwrap();

        assert_eq!(value["properties"][0]["typeOptions"]["password"], json!(true));
        assert!(value["properties"][1].get("typeOptions").is_none());
        assert!(value.get("authenticate").is_none());
    }
}
