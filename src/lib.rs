//! # richtext
//!
//! Rendering of structured rich-text documents into output trees.
//!
//! A rich-text field is a tree of typed nodes (paragraphs, headings, lists,
//! tables, quotes, embedded references) plus a table of the entries and
//! assets it links to. The [`DocumentWalker`] dispatches every node to a
//! renderer by its type, resolves references against the table, dispatches
//! resolved entities to renderers by their own type, and threads a
//! [`RenderContext`] down the tree so nested containers do not double their
//! spacing.
//!
//! ## Quick Start
//!
//! ```
//! use richtext::{render::to_html, DocumentWalker, RenderContext, RichText};
//!
//! let doc = RichText::from_json_str(r#"{
//!     "json": {
//!         "nodeType": "document",
//!         "content": [{
//!             "nodeType": "blockquote",
//!             "content": [{
//!                 "nodeType": "paragraph",
//!                 "content": [{"nodeType": "text", "value": "quoted", "marks": []}]
//!             }]
//!         }]
//!     }
//! }"#)?;
//!
//! let result = DocumentWalker::new().render(&doc, &RenderContext::root())?;
//! assert_eq!(
//!     to_html(&result.output),
//!     "<div class=\"container\"><blockquote>\
//!      <div class=\"container container--gutterless\"><p>quoted</p></div>\
//!      </blockquote></div>"
//! );
//! # Ok::<(), richtext::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Never fails a whole document**: unknown tags and missing references
//!   render a literal fallback, malformed nodes an error marker
//! - **Pluggable renderers** per node type and per entity type
//! - **Re-entrant rendering** of documents nested in entities, depth-bounded
//! - **Asynchronous hyperlink resolution** with per-node state machines
//! - **Output formats**: HTML, Markdown, plain text, JSON
//! - **Parallel batches**: uses Rayon for independent documents

pub mod error;
pub mod hyperlink;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use error::{Error, Result};
pub use hyperlink::{
    HyperlinkLookup, HyperlinkResolution, HyperlinkResolver, LinkedDocument, LookupResponse,
    StaticLookup, UnresolvedReason,
};
pub use model::{Entity, EntityClass, Node, NodeType, ReferenceTable, RichText};
pub use render::{
    DocumentWalker, JsonFormat, LayoutParent, Output, RenderContext, RenderOptions, RenderResult,
};

use std::path::Path;

/// Parse a rich-text field (`{"json": ..., "links": ...}`) from a file.
///
/// # Example
///
/// ```no_run
/// let doc = richtext::parse_file("body.json").unwrap();
/// println!("Nodes: {}", doc.node_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<RichText> {
    let json = std::fs::read_to_string(path)?;
    RichText::from_json_str(&json)
}

/// Render a rich-text field with the default renderers.
pub fn render_str(json: &str) -> Result<RenderResult> {
    let doc = RichText::from_json_str(json)?;
    DocumentWalker::new().render(&doc, &RenderContext::root())
}

/// Render a rich-text field to HTML.
///
/// # Example
///
/// ```
/// let html = richtext::to_html(
///     r#"{"json": {"nodeType": "document", "content": [{"nodeType": "hr", "content": []}]}}"#,
/// )?;
/// assert_eq!(html, "<div class=\"container\"><hr></div>");
/// # Ok::<(), richtext::Error>(())
/// ```
pub fn to_html(json: &str) -> Result<String> {
    Ok(render::to_html(&render_str(json)?.output))
}

/// Render a rich-text field to Markdown.
pub fn to_markdown(json: &str) -> Result<String> {
    Ok(render::to_markdown(&render_str(json)?.output))
}

/// Render a rich-text field to plain text.
pub fn to_text(json: &str) -> Result<String> {
    Ok(render::to_text(&render_str(json)?.output))
}

/// Render a rich-text field to the JSON form of its output tree.
pub fn to_json(json: &str, format: JsonFormat) -> Result<String> {
    render::to_json(&render_str(json)?.output, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "json": {
            "nodeType": "document",
            "content": [
                {"nodeType": "heading-2", "content": [{"nodeType": "text", "value": "Title"}]},
                {"nodeType": "paragraph", "content": [{"nodeType": "text", "value": "Body"}]}
            ]
        }
    }"#;

    #[test]
    fn test_to_markdown() {
        assert_eq!(to_markdown(DOC).unwrap(), "## Title\n\nBody");
    }

    #[test]
    fn test_to_text() {
        assert_eq!(to_text(DOC).unwrap(), "Title\n\nBody");
    }

    #[test]
    fn test_invalid_input_is_a_hard_error() {
        assert!(matches!(to_html("not json"), Err(Error::Json(_))));
        assert!(matches!(
            to_html(r#"{"json": {"nodeType": "paragraph", "content": []}}"#),
            Err(Error::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_parse_file_missing() {
        assert!(matches!(
            parse_file("/nonexistent/body.json"),
            Err(Error::Io(_))
        ));
    }
}
