//! Credential types used by the nodes

mod credential;
mod description;
mod provider;

pub use credential::{
    CredentialData, GoogleCustomSearchCredentials, NewsApiCredentials, PumbleCredentials,
    GOOGLE_CUSTOM_SEARCH_CREDENTIAL, NEWS_API_CREDENTIAL, PUMBLE_CREDENTIAL,
};
pub use description::{
    Authentication, CredentialDescription, CredentialTestRequest, GOOGLE_CUSTOM_SEARCH_BASE_URL,
    NEWS_API_BASE_URL, PUMBLE_API_BASE_URL,
};
pub use provider::CredentialProvider;

#[cfg(test)]
pub use provider::mock;
