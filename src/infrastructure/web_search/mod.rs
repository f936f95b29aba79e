//! Web search client implementations

mod google;

pub use google::GoogleCustomSearchClient;
