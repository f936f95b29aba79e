use serde::Serialize;
use tracing::{debug, info};

use crate::domain::credentials::{Authentication, CredentialData, CredentialDescription};
use crate::domain::NodeError;
use crate::infrastructure::http_client::{join_url, status_text};

/// Outcome of a credential test request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialTestResult {
    pub ok: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    pub message: String,
}

/// Runs the test request declared by a credential type
#[derive(Debug, Clone)]
pub struct CredentialTester {
    client: reqwest::Client,
}

impl CredentialTester {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Issue the declared test request with the bundle injected.
    ///
    /// Transport failures and non-2xx answers are reported as a failed
    /// result; only a type without a test request or a bundle missing the
    /// injected field is an error.
    pub async fn test(
        &self,
        description: &CredentialDescription,
        data: &CredentialData,
    ) -> Result<CredentialTestResult, NodeError> {
        let test = description.test.as_ref().ok_or_else(|| {
            NodeError::validation(format!(
                "Credential '{}' does not declare a test request",
                description.name
            ))
        })?;

        let url = join_url(&test.base_url, &test.url);
        let mut request = self.client.get(&url);

        if let Some(authentication) = &description.authenticate {
            let secret = data.get_str(authentication.property()).ok_or_else(|| {
                NodeError::credential(format!(
                    "Credential '{}' is missing field '{}'",
                    description.name,
                    authentication.property()
                ))
            })?;

            request = match authentication {
                Authentication::QueryParameter { name, .. } => {
                    request.query(&[(name.as_str(), secret)])
                }
                Authentication::Header { name, .. } => request.header(name.as_str(), secret),
            };
        }

        debug!(credential = %description.name, url = %url, "Testing credential");

        let result = match request.send().await {
            Ok(response) => {
                let status = response.status();
                CredentialTestResult {
                    ok: status.is_success(),
                    status: Some(status.as_u16()),
                    message: status_text(status),
                }
            }
            Err(e) => CredentialTestResult {
                ok: false,
                status: None,
                message: e.to_string(),
            },
        };

        info!(credential = %description.name, ok = result.ok, "Credential test finished");

        Ok(result)
    }
}
