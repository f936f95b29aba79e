use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::error::NodeError;

pub const NEWS_API_CREDENTIAL: &str = "rondonjonNewsApi";
pub const GOOGLE_CUSTOM_SEARCH_CREDENTIAL: &str = "rondonjonGoogleCustomSearchApi";
pub const PUMBLE_CREDENTIAL: &str = "rondonjonPumbleApi";

/// Raw credential bundle as supplied by the host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialData(Map<String, Value>);

impl CredentialData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode the bundle into the typed credentials of `credential_name`
    pub fn decode<T: DeserializeOwned>(&self, credential_name: &str) -> Result<T, NodeError> {
        serde_json::from_value(Value::Object(self.0.clone())).map_err(|e| {
            NodeError::credential(format!(
                "Invalid '{}' credentials: {}",
                credential_name, e
            ))
        })
    }
}

impl From<Map<String, Value>> for CredentialData {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

const MASK: &str = "****";

/// newsapi.org key
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsApiCredentials {
    pub api_key: String,
}

impl std::fmt::Debug for NewsApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsApiCredentials")
            .field("api_key", &MASK)
            .finish()
    }
}

/// Google Programmable Search key and engine id
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleCustomSearchCredentials {
    /// API key
    pub auth: String,

    /// Search engine id
    pub cx: String,
}

impl std::fmt::Debug for GoogleCustomSearchCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleCustomSearchCredentials")
            .field("auth", &MASK)
            .field("cx", &self.cx)
            .finish()
    }
}

/// Pumble API Keys add-on key
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PumbleCredentials {
    pub api_key: String,
}

impl std::fmt::Debug for PumbleCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PumbleCredentials")
            .field("api_key", &MASK)
            .finish()
    }
}
