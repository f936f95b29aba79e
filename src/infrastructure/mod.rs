//! Infrastructure layer - External service implementations

pub mod credentials;
pub mod host;
pub mod html;
pub mod http_client;
pub mod logging;
pub mod nodes;
pub mod web_search;
