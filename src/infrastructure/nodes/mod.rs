//! Node implementations

mod get_news;
mod google_custom_search;
mod read_dir;
mod registry;
mod sanitize_html;
mod send_pumble_message;

pub use get_news::{GetNewsNode, GET_NEWS_NODE};
pub use google_custom_search::{GoogleCustomSearchNode, GOOGLE_CUSTOM_SEARCH_NODE};
pub use read_dir::{ReadDirNode, READ_DIR_NODE};
pub use registry::NodeRegistry;
pub use sanitize_html::{SanitizeHtmlNode, SANITIZE_HTML_NODE};
pub use send_pumble_message::{SendPumbleMessageNode, SEND_PUMBLE_MESSAGE_NODE};
