//! Node-level types of the document tree.

use super::EntityClass;
use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;

/// Node-type tag of a document node.
///
/// Known tags get their own variant; anything else is kept verbatim in
/// [`NodeType::Unknown`] so that rendering can fall back instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    /// Root of a document
    Document,
    /// A paragraph
    Paragraph,
    /// A heading; levels outside 1-6 have no default renderer
    Heading(u8),
    /// A block quote
    Quote,
    /// A bulleted list
    UnorderedList,
    /// A numbered list
    OrderedList,
    /// An item of either list kind
    ListItem,
    /// A table
    Table,
    /// A table row
    TableRow,
    /// A table body cell
    TableCell,
    /// A table header cell
    TableHeaderCell,
    /// A horizontal rule
    HorizontalRule,
    /// A block-level reference to a linked entry
    EmbeddedEntryBlock,
    /// An inline reference to a linked entry
    EmbeddedEntryInline,
    /// A block-level reference to a linked asset
    EmbeddedAssetBlock,
    /// A hyperlink whose destination is another entry
    EntryHyperlink,
    /// A hyperlink to a URI
    Hyperlink,
    /// A text leaf
    Text,
    /// Any tag this crate does not know
    Unknown(String),
}

impl NodeType {
    /// The wire tag of this node type.
    pub fn as_str(&self) -> Cow<'_, str> {
        Cow::Borrowed(match self {
            NodeType::Document => "document",
            NodeType::Paragraph => "paragraph",
            NodeType::Heading(1) => "heading-1",
            NodeType::Heading(2) => "heading-2",
            NodeType::Heading(3) => "heading-3",
            NodeType::Heading(4) => "heading-4",
            NodeType::Heading(5) => "heading-5",
            NodeType::Heading(6) => "heading-6",
            NodeType::Heading(level) => return Cow::Owned(format!("heading-{}", level)),
            NodeType::Quote => "blockquote",
            NodeType::UnorderedList => "unordered-list",
            NodeType::OrderedList => "ordered-list",
            NodeType::ListItem => "list-item",
            NodeType::Table => "table",
            NodeType::TableRow => "table-row",
            NodeType::TableCell => "table-cell",
            NodeType::TableHeaderCell => "table-header-cell",
            NodeType::HorizontalRule => "hr",
            NodeType::EmbeddedEntryBlock => "embedded-entry-block",
            NodeType::EmbeddedEntryInline => "embedded-entry-inline",
            NodeType::EmbeddedAssetBlock => "embedded-asset-block",
            NodeType::EntryHyperlink => "entry-hyperlink",
            NodeType::Hyperlink => "hyperlink",
            NodeType::Text => "text",
            NodeType::Unknown(tag) => tag.as_str(),
        })
    }

    /// Parse a wire tag. Never fails; unknown tags map to [`NodeType::Unknown`].
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "document" => NodeType::Document,
            "paragraph" => NodeType::Paragraph,
            "blockquote" => NodeType::Quote,
            "unordered-list" => NodeType::UnorderedList,
            "ordered-list" => NodeType::OrderedList,
            "list-item" => NodeType::ListItem,
            "table" => NodeType::Table,
            "table-row" => NodeType::TableRow,
            "table-cell" => NodeType::TableCell,
            "table-header-cell" => NodeType::TableHeaderCell,
            "hr" => NodeType::HorizontalRule,
            "embedded-entry-block" => NodeType::EmbeddedEntryBlock,
            "embedded-entry-inline" => NodeType::EmbeddedEntryInline,
            "embedded-asset-block" => NodeType::EmbeddedAssetBlock,
            "entry-hyperlink" => NodeType::EntryHyperlink,
            "hyperlink" => NodeType::Hyperlink,
            "text" => NodeType::Text,
            other => match other.strip_prefix("heading-").and_then(|n| n.parse().ok()) {
                Some(level @ 1..=6) => NodeType::Heading(level),
                _ => NodeType::Unknown(other.to_string()),
            },
        }
    }

    /// Whether nodes of this type point at an out-of-band entity.
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            NodeType::EmbeddedEntryBlock
                | NodeType::EmbeddedEntryInline
                | NodeType::EmbeddedAssetBlock
                | NodeType::EntryHyperlink
        )
    }

    /// Table a reference of this type points into.
    pub fn entity_class(&self) -> Option<EntityClass> {
        match self {
            NodeType::EmbeddedEntryBlock
            | NodeType::EmbeddedEntryInline
            | NodeType::EntryHyperlink => Some(EntityClass::Entry),
            NodeType::EmbeddedAssetBlock => Some(EntityClass::Asset),
            _ => None,
        }
    }
}

impl From<String> for NodeType {
    fn from(tag: String) -> Self {
        NodeType::from_tag(&tag)
    }
}

impl From<NodeType> for String {
    fn from(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Unknown(tag) => tag,
            known => known.as_str().into_owned(),
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

/// Inline style mark carried by a text leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mark {
    /// Mark kind
    #[serde(rename = "type")]
    pub kind: MarkKind,
}

impl Mark {
    /// Create a mark of the given kind.
    pub fn new(kind: MarkKind) -> Self {
        Self { kind }
    }
}

/// Known inline style marks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MarkKind {
    Bold,
    Italic,
    Underline,
    Code,
    Superscript,
    Subscript,
    Strikethrough,
    Other(String),
}

impl From<String> for MarkKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "bold" => MarkKind::Bold,
            "italic" => MarkKind::Italic,
            "underline" => MarkKind::Underline,
            "code" => MarkKind::Code,
            "superscript" => MarkKind::Superscript,
            "subscript" => MarkKind::Subscript,
            "strikethrough" => MarkKind::Strikethrough,
            _ => MarkKind::Other(tag),
        }
    }
}

impl From<MarkKind> for String {
    fn from(kind: MarkKind) -> Self {
        match kind {
            MarkKind::Bold => "bold".into(),
            MarkKind::Italic => "italic".into(),
            MarkKind::Underline => "underline".into(),
            MarkKind::Code => "code".into(),
            MarkKind::Superscript => "superscript".into(),
            MarkKind::Subscript => "subscript".into(),
            MarkKind::Strikethrough => "strikethrough".into(),
            MarkKind::Other(tag) => tag,
        }
    }
}

/// System fields of a link target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sys {
    /// Stable identifier of the target; empty when the wire form has none
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,

    /// Link kind as sent by the content service (e.g. "Entry", "Asset")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
}

/// A string field that is `None` when the wire value has any other type.
///
/// Leaves the decision to the node accessors, which report the node as
/// malformed instead of rejecting the whole document.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

/// Reference from a node to an out-of-band entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    #[serde(default)]
    pub sys: Sys,
}

/// Tag-specific payload of a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeData {
    /// Target of reference-bearing nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Target>,

    /// Destination of plain hyperlinks
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub uri: Option<String>,
}

/// A node of the document tree.
///
/// Which fields are meaningful depends on `node_type`. The accessors
/// ([`Node::children`], [`Node::required_target`], [`Node::text_value`])
/// return [`Error::MalformedNode`] when a node lacks what its tag requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Node-type tag
    pub node_type: NodeType,

    /// Ordered child nodes (absent on text leaves)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Node>>,

    /// Tag-specific payload
    #[serde(default)]
    pub data: NodeData,

    /// Inline style marks (text leaves only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,

    /// Raw text (text leaves only)
    #[serde(
        default,
        alias = "text",
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<String>,
}

impl Node {
    /// Create a node with the given type and no children.
    pub fn new(node_type: NodeType) -> Self {
        Self {
            node_type,
            content: Some(Vec::new()),
            data: NodeData::default(),
            marks: Vec::new(),
            value: None,
        }
    }

    /// Create a container node with the given children.
    pub fn container(node_type: NodeType, content: Vec<Node>) -> Self {
        Self {
            content: Some(content),
            ..Self::new(node_type)
        }
    }

    /// Create a document root.
    pub fn document(content: Vec<Node>) -> Self {
        Self::container(NodeType::Document, content)
    }

    /// Create a paragraph.
    pub fn paragraph(content: Vec<Node>) -> Self {
        Self::container(NodeType::Paragraph, content)
    }

    /// Create a heading; the level is clamped to 1-6.
    pub fn heading(level: u8, content: Vec<Node>) -> Self {
        Self::container(NodeType::Heading(level.clamp(1, 6)), content)
    }

    /// Create a block quote.
    pub fn quote(content: Vec<Node>) -> Self {
        Self::container(NodeType::Quote, content)
    }

    /// Create a plain text leaf.
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            node_type: NodeType::Text,
            content: None,
            data: NodeData::default(),
            marks: Vec::new(),
            value: Some(value.into()),
        }
    }

    /// Create a text leaf carrying marks.
    pub fn styled_text(value: impl Into<String>, marks: &[MarkKind]) -> Self {
        let mut node = Self::text(value);
        node.marks = marks.iter().cloned().map(Mark::new).collect();
        node
    }

    /// Create a horizontal rule.
    pub fn hr() -> Self {
        Self::new(NodeType::HorizontalRule)
    }

    /// Create a reference-bearing node pointing at `id`.
    pub fn reference(node_type: NodeType, id: impl Into<String>) -> Self {
        let mut node = Self::new(node_type);
        node.data.target = Some(Target {
            sys: Sys {
                id: id.into(),
                link_type: None,
            },
        });
        node
    }

    /// Create an entry hyperlink with the given link text.
    pub fn entry_hyperlink(id: impl Into<String>, text: impl Into<String>) -> Self {
        let mut node = Self::reference(NodeType::EntryHyperlink, id);
        node.content = Some(vec![Self::text(text)]);
        node
    }

    /// Create a plain URI hyperlink.
    pub fn hyperlink(uri: impl Into<String>, content: Vec<Node>) -> Self {
        let mut node = Self::container(NodeType::Hyperlink, content);
        node.data.uri = Some(uri.into());
        node
    }

    /// Parse a single node tree from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Child nodes; an error if this node has no `content` at all.
    pub fn children(&self) -> Result<&[Node]> {
        self.content
            .as_deref()
            .ok_or_else(|| Error::malformed(self.node_type.as_str(), "missing content"))
    }

    /// Identifier of the referenced entity, if any.
    pub fn target_id(&self) -> Option<&str> {
        self.data
            .target
            .as_ref()
            .map(|t| t.sys.id.as_str())
            .filter(|id| !id.is_empty())
    }

    /// Identifier of the referenced entity; an error if the node has none.
    pub fn required_target(&self) -> Result<&str> {
        self.target_id()
            .ok_or_else(|| Error::malformed(self.node_type.as_str(), "missing data.target.sys.id"))
    }

    /// Raw text of a text leaf; an error if the node has none.
    pub fn text_value(&self) -> Result<&str> {
        self.value
            .as_deref()
            .ok_or_else(|| Error::malformed(self.node_type.as_str(), "missing value"))
    }

    /// Whether the node carries the given mark.
    pub fn has_mark(&self, kind: &MarkKind) -> bool {
        self.marks.iter().any(|m| &m.kind == kind)
    }

    /// Concatenated text of all text leaves below this node.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(ref value) = self.value {
            out.push_str(value);
        }
        for child in self.content.iter().flatten() {
            child.collect_text(out);
        }
    }

    /// Child at `index`, if present.
    pub fn child(&self, index: usize) -> Option<&Node> {
        self.content.as_ref().and_then(|c| c.get(index))
    }
}
