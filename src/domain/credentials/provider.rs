use async_trait::async_trait;
use std::fmt::Debug;

use super::CredentialData;
use crate::domain::error::NodeError;

/// Source of credential bundles, keyed by credential type name
#[async_trait]
pub trait CredentialProvider: Send + Sync + Debug {
    /// Get the bundle for a credential type
    async fn get_credential(&self, name: &str) -> Result<CredentialData, NodeError>;

    /// Check if this provider can supply the given credential type
    async fn supports(&self, name: &str) -> bool;

    /// Get provider name for logging/debugging
    fn provider_name(&self) -> &'static str;
}
