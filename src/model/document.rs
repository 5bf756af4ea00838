//! Document-level types.

use super::links::Links;
use super::{Node, NodeType, ReferenceTable};
use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Identity of one document instance, used to key hyperlink resolutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentInstance(Uuid);

impl DocumentInstance {
    /// Create a fresh instance identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentInstance {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A rich-text field: a document tree plus the entities it links to.
#[derive(Debug, Clone)]
pub struct RichText {
    /// Identity of this instance
    pub instance: DocumentInstance,

    /// Root node (always a `document` node with content)
    pub document: Node,

    /// Pre-fetched entries and assets
    pub table: ReferenceTable,
}

#[derive(Deserialize)]
struct RawRichText {
    json: Value,
    #[serde(default)]
    links: Option<Links>,
}

impl RichText {
    /// Wrap an already-built document tree.
    pub fn new(document: Node, table: ReferenceTable) -> Result<Self> {
        validate_root(&document)?;
        Ok(Self {
            instance: DocumentInstance::new(),
            document,
            table,
        })
    }

    /// Parse a `{json, links}` rich-text field.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Build from an already-parsed `{json, links}` value.
    pub fn from_value(value: Value) -> Result<Self> {
        let raw: RawRichText = serde_json::from_value(value)?;
        if !raw.json.is_object() {
            return Err(Error::InvalidDocument("`json` is not a node object".into()));
        }
        let document: Node = serde_json::from_value(raw.json)?;
        let table = ReferenceTable::from_links(raw.links.unwrap_or_default())?;
        Self::new(document, table)
    }

    /// Number of nodes in the tree, root included.
    pub fn node_count(&self) -> usize {
        fn count(node: &Node) -> usize {
            1 + node.content.iter().flatten().map(count).sum::<usize>()
        }
        count(&self.document)
    }

    /// Ids referenced by the tree that the reference table cannot satisfy.
    ///
    /// Entry hyperlinks are not listed, since they fall back to the lookup
    /// service.
    pub fn missing_references(&self) -> Vec<(NodeType, String)> {
        let mut missing = Vec::new();
        self.collect_missing(&self.document, &mut missing);
        missing
    }

    fn collect_missing(&self, node: &Node, out: &mut Vec<(NodeType, String)>) {
        let class = match node.node_type {
            NodeType::EntryHyperlink => None,
            ref other => other.entity_class(),
        };
        if let (Some(class), Some(id)) = (class, node.target_id()) {
            if self.table.resolve(id, class).entity().is_none() {
                out.push((node.node_type.clone(), id.to_string()));
            }
        }
        for child in node.content.iter().flatten() {
            self.collect_missing(child, out);
        }
    }
}

fn validate_root(document: &Node) -> Result<()> {
    if document.node_type != NodeType::Document {
        return Err(Error::InvalidDocument(format!(
            "root node is `{}`, expected `document`",
            document.node_type
        )));
    }
    if document.content.is_none() {
        return Err(Error::InvalidDocument("root node has no content".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntityClass;

    const SAMPLE: &str = r#"{
        "json": {
            "nodeType": "document",
            "data": {},
            "content": [
                {"nodeType": "embedded-entry-block", "content": [],
                 "data": {"target": {"sys": {"id": "cta-1"}}}},
                {"nodeType": "embedded-asset-block", "content": [],
                 "data": {"target": {"sys": {"id": "gone"}}}}
            ]
        },
        "links": {
            "entries": {"block": [{"sys": {"id": "cta-1"}, "__typename": "ComponentCta"}]},
            "assets": {"block": []}
        }
    }"#;

    #[test]
    fn test_from_json_str() {
        let doc = RichText::from_json_str(SAMPLE).unwrap();
        assert_eq!(doc.node_count(), 3);
        assert!(doc.table.resolve("cta-1", EntityClass::Entry).entity().is_some());
    }

    #[test]
    fn test_missing_references() {
        let doc = RichText::from_json_str(SAMPLE).unwrap();
        assert_eq!(
            doc.missing_references(),
            vec![(NodeType::EmbeddedAssetBlock, "gone".to_string())]
        );
    }

    #[test]
    fn test_non_document_root_is_rejected() {
        let result = RichText::from_json_str(r#"{"json": {"nodeType": "paragraph", "content": []}}"#);
        assert!(matches!(result, Err(Error::InvalidDocument(_))));

        let result = RichText::from_json_str(r#"{"json": [1, 2, 3]}"#);
        assert!(matches!(result, Err(Error::InvalidDocument(_))));

        let result = RichText::from_json_str(r#"{"json": {"nodeType": "document"}}"#);
        assert!(matches!(result, Err(Error::InvalidDocument(_))));
    }

    #[test]
    fn test_instances_are_distinct() {
        let a = RichText::new(Node::document(vec![]), ReferenceTable::new()).unwrap();
        let b = RichText::new(Node::document(vec![]), ReferenceTable::new()).unwrap();
        assert_ne!(a.instance, b.instance);
    }
}
