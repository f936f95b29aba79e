use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category of a node failure, as exposed on error items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Transport,
    UpstreamStatus,
    Filesystem,
    Validation,
    Credential,
    Operation,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Transport => "transport",
            ErrorKind::UpstreamStatus => "upstream_status",
            ErrorKind::Filesystem => "filesystem",
            ErrorKind::Validation => "validation",
            ErrorKind::Credential => "credential",
            ErrorKind::Operation => "operation",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while executing a node
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("{message}")]
    Transport { message: String },

    #[error("{message}")]
    UpstreamStatus { status: u16, message: String },

    #[error("{message}")]
    Filesystem { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Credential error: {message}")]
    Credential { message: String },

    #[error("{message}")]
    Operation { message: String },

    /// A failure annotated with the item it happened on
    #[error("Node '{node}' failed on item {item_index}: {source}")]
    Item {
        node: String,
        item_index: usize,
        source: Box<NodeError>,
    },
}

impl NodeError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn upstream_status(status: u16, message: impl Into<String>) -> Self {
        Self::UpstreamStatus {
            status,
            message: message.into(),
        }
    }

    pub fn filesystem(message: impl Into<String>) -> Self {
        Self::Filesystem {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn credential(message: impl Into<String>) -> Self {
        Self::Credential {
            message: message.into(),
        }
    }

    pub fn operation(message: impl Into<String>) -> Self {
        Self::Operation {
            message: message.into(),
        }
    }

    /// Annotates the error with the index of the failing item.
    ///
    /// An error that already carries an item index keeps it, so an index set
    /// by an inner failure boundary is never replaced by an outer one.
    pub fn at_item(self, node: impl Into<String>, item_index: usize) -> Self {
        match self {
            Self::Item { .. } => self,
            other => Self::Item {
                node: node.into(),
                item_index,
                source: Box::new(other),
            },
        }
    }

    /// Prefixes the message while keeping the error kind
    pub fn with_context(self, context: &str) -> Self {
        let prefix = |message: String| format!("{}: {}", context, message);

        match self {
            Self::Transport { message } => Self::Transport {
                message: prefix(message),
            },
            Self::UpstreamStatus { status, message } => Self::UpstreamStatus {
                status,
                message: prefix(message),
            },
            Self::Filesystem { message } => Self::Filesystem {
                message: prefix(message),
            },
            Self::Validation { message } => Self::Validation {
                message: prefix(message),
            },
            Self::Credential { message } => Self::Credential {
                message: prefix(message),
            },
            Self::Operation { message } => Self::Operation {
                message: prefix(message),
            },
            Self::Item {
                node,
                item_index,
                source,
            } => Self::Item {
                node,
                item_index,
                source: Box::new((*source).with_context(context)),
            },
        }
    }

    /// Item index annotation, if any
    pub fn item_index(&self) -> Option<usize> {
        match self {
            Self::Item { item_index, .. } => Some(*item_index),
            _ => None,
        }
    }

    /// Name of the node that annotated the error, if any
    pub fn node(&self) -> Option<&str> {
        match self {
            Self::Item { node, .. } => Some(node),
            _ => None,
        }
    }

    /// The underlying error without item annotations
    pub fn root(&self) -> &NodeError {
        match self {
            Self::Item { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self.root() {
            Self::Transport { .. } => ErrorKind::Transport,
            Self::UpstreamStatus { .. } => ErrorKind::UpstreamStatus,
            Self::Filesystem { .. } => ErrorKind::Filesystem,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Credential { .. } => ErrorKind::Credential,
            Self::Operation { .. } | Self::Item { .. } => ErrorKind::Operation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = NodeError::transport("newsapi.org HTTP request failed: connection refused");
        assert_eq!(
            error.to_string(),
            "newsapi.org HTTP request failed: connection refused"
        );

        let error = NodeError::validation("missing path");
        assert_eq!(error.to_string(), "Validation error: missing path");
    }

    #[test]
    fn test_at_item_annotates_index() {
        let error = NodeError::filesystem("not found").at_item("rondonjonReadDir", 3);

        assert_eq!(error.item_index(), Some(3));
        assert_eq!(error.node(), Some("rondonjonReadDir"));
        assert_eq!(error.kind(), ErrorKind::Filesystem);
        assert_eq!(
            error.to_string(),
            "Node 'rondonjonReadDir' failed on item 3: not found"
        );
    }

    #[test]
    fn test_at_item_keeps_inner_index() {
        let error = NodeError::operation("boom")
            .at_item("inner", 1)
            .at_item("outer", 7);

        assert_eq!(error.item_index(), Some(1));
        assert_eq!(error.node(), Some("inner"));
    }

    #[test]
    fn test_with_context_keeps_kind() {
        let error = NodeError::upstream_status(403, "Forbidden").with_context("Google Custom Search failed");

        assert_eq!(error.kind(), ErrorKind::UpstreamStatus);
        assert_eq!(error.to_string(), "Google Custom Search failed: Forbidden");
    }
}
