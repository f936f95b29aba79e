use async_trait::async_trait;
use std::collections::HashMap;
use std::env;

use crate::domain::credentials::{
    CredentialData, CredentialProvider, GOOGLE_CUSTOM_SEARCH_CREDENTIAL, NEWS_API_CREDENTIAL,
    PUMBLE_CREDENTIAL,
};
use crate::domain::NodeError;

/// Environment variables backing the fields of one credential type
#[derive(Debug, Clone, Default)]
pub struct EnvMapping {
    /// (credential field, environment variable), all required
    pub vars: Vec<(String, String)>,
}

impl EnvMapping {
    pub fn new(field: impl Into<String>, env_var: impl Into<String>) -> Self {
        Self::default().with_var(field, env_var)
    }

    pub fn with_var(mut self, field: impl Into<String>, env_var: impl Into<String>) -> Self {
        self.vars.push((field.into(), env_var.into()));
        self
    }
}

/// Credential provider that reads from environment variables
#[derive(Debug)]
pub struct EnvCredentialProvider {
    mappings: HashMap<String, EnvMapping>,
}

impl EnvCredentialProvider {
    pub fn new() -> Self {
        Self {
            mappings: HashMap::new(),
        }
    }

    pub fn with_mapping(mut self, name: impl Into<String>, mapping: EnvMapping) -> Self {
        self.mappings.insert(name.into(), mapping);
        self
    }

    pub fn with_defaults(self) -> Self {
        self.with_mapping(NEWS_API_CREDENTIAL, EnvMapping::new("apiKey", "NEWS_API_KEY"))
            .with_mapping(
                GOOGLE_CUSTOM_SEARCH_CREDENTIAL,
                EnvMapping::new("auth", "GOOGLE_CUSTOM_SEARCH_AUTH")
                    .with_var("cx", "GOOGLE_CUSTOM_SEARCH_CX"),
            )
            .with_mapping(PUMBLE_CREDENTIAL, EnvMapping::new("apiKey", "PUMBLE_API_KEY"))
    }

    fn read_credential(&self, name: &str) -> Result<CredentialData, NodeError> {
        let mapping = self.mappings.get(name).ok_or_else(|| {
            NodeError::credential(format!(
                "No environment mapping configured for credential: {}",
                name
            ))
        })?;

        let mut data = CredentialData::new();

        for (field, env_var) in &mapping.vars {
            let value = env::var(env_var).map_err(|_| {
                NodeError::credential(format!(
                    "Environment variable '{}' not set for credential: {}",
                    env_var, name
                ))
            })?;

            data = data.with(field.as_str(), value);
        }

        Ok(data)
    }
}

impl Default for EnvCredentialProvider {
    fn default() -> Self {
        Self::new().with_defaults()
    }
}

#[async_trait]
impl CredentialProvider for EnvCredentialProvider {
    async fn get_credential(&self, name: &str) -> Result<CredentialData, NodeError> {
        self.read_credential(name)
    }

    async fn supports(&self, name: &str) -> bool {
        self.mappings
            .get(name)
            .is_some_and(|mapping| mapping.vars.iter().all(|(_, var)| env::var(var).is_ok()))
    }

    fn provider_name(&self) -> &'static str {
        "env"
    }
}
