//! Credential provider and credential test implementations

mod env_provider;
mod tester;

pub use env_provider::{EnvCredentialProvider, EnvMapping};
pub use tester::{CredentialTestResult, CredentialTester};
