//! Test-credentials command - checks a credential bundle against its API

use anyhow::{anyhow, bail};
use clap::Args;

use crate::config::HttpConfig;
use crate::domain::credentials::{
    CredentialDescription, CredentialProvider, NEWS_API_CREDENTIAL, PUMBLE_CREDENTIAL,
};
use crate::infrastructure::credentials::{CredentialTester, EnvCredentialProvider};
use crate::infrastructure::http_client::build_http_client;

/// Arguments for the test-credentials command
#[derive(Args, Clone, Debug)]
pub struct TestCredentialsArgs {
    /// Credential type name (e.g. `rondonjonNewsApi`)
    pub credential: String,
}

pub async fn run(args: TestCredentialsArgs) -> anyhow::Result<()> {
    let config = super::init()?;

    let description = CredentialDescription::find(&args.credential)
        .map(|description| with_configured_base_url(description, &config.http))
        .ok_or_else(|| anyhow!("Unknown credential type '{}'", args.credential))?;

    let provider = EnvCredentialProvider::default();
    let data = provider.get_credential(&description.name).await?;

    let tester = CredentialTester::new(build_http_client(&config.http)?);
    let result = tester.test(&description, &data).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    if !result.ok {
        bail!("Credential test for '{}' failed: {}", description.name, result.message);
    }

    Ok(())
}

/// Point the test request at the configured API base URL
fn with_configured_base_url(
    mut description: CredentialDescription,
    http: &HttpConfig,
) -> CredentialDescription {
    let base_url = match description.name.as_str() {
        NEWS_API_CREDENTIAL => Some(&http.news_api_base_url),
        PUMBLE_CREDENTIAL => Some(&http.pumble_api_base_url),
        _ => None,
    };

    if let (Some(test), Some(base_url)) = (description.test.as_mut(), base_url) {
        test.base_url = base_url.clone();
    }

    description
}
