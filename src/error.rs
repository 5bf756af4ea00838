//! Error types for richtext library.

use std::io;
use thiserror::Error;

/// Result type alias for richtext operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading or rendering rich text.
///
/// Only the input-shape variants (`Json`, `InvalidDocument`,
/// `InvalidReferenceTable`) escape a top-level render. Everything raised while
/// walking a node is caught at that node and turned into an error marker in
/// the output tree.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not valid JSON, or does not have the rich-text shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input is not a document tree.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// The linked entries or assets cannot form a reference table.
    #[error("Invalid reference table: {0}")]
    InvalidReferenceTable(String),

    /// A node is structurally invalid for its own node type.
    #[error("Malformed {node_type} node: {reason}")]
    MalformedNode {
        /// Node-type tag of the offending node
        node_type: String,
        /// What is wrong with it
        reason: String,
    },

    /// Nesting went deeper than the configured bound.
    #[error("Nesting depth limit of {0} exceeded")]
    DepthExceeded(usize),

    /// The hyperlink lookup service failed.
    #[error("Hyperlink lookup failed: {0}")]
    Lookup(String),

    /// A node path does not point at a node of the document.
    #[error("No node at path {0}")]
    NodeNotFound(String),

    /// Error during serialisation of the output tree.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Build a [`Error::MalformedNode`].
    pub fn malformed(node_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedNode {
            node_type: node_type.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::DepthExceeded(16);
        assert_eq!(err.to_string(), "Nesting depth limit of 16 exceeded");

        let err = Error::malformed("embedded-entry-block", "missing data.target");
        assert_eq!(
            err.to_string(),
            "Malformed embedded-entry-block node: missing data.target"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
