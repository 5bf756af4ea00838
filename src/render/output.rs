//! Output tree produced by the document walker.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A node of the rendered output tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Output {
    /// Nothing at all (e.g. a hyperlink still being resolved)
    Empty,

    /// A run of text
    Text {
        /// The text content
        text: String,
    },

    /// A forced line break inside a text leaf
    Break,

    /// Sibling outputs without a wrapper
    Fragment {
        /// Child outputs
        children: Vec<Output>,
    },

    /// The grid/container layout primitive around block content
    Container {
        /// Whether the container applies its default outer spacing
        gutters: bool,
        /// Child outputs
        children: Vec<Output>,
    },

    /// A structural element such as `p`, `h2` or `table`
    Element(Element),

    /// An inline link
    Link {
        /// Destination path or URI
        href: String,
        /// Link content
        children: Vec<Output>,
    },

    /// Marker for a node that could not be rendered
    Error {
        /// Node-type tag of the failing node
        node_type: String,
        /// Error description
        message: String,
    },
}

impl Output {
    /// Create a text output.
    pub fn text(text: impl Into<String>) -> Self {
        Output::Text { text: text.into() }
    }

    /// Create a fragment, collapsing the trivial cases.
    pub fn fragment(mut children: Vec<Output>) -> Self {
        children.retain(|c| !matches!(c, Output::Empty));
        match children.len() {
            0 => Output::Empty,
            1 => children.remove(0),
            _ => Output::Fragment { children },
        }
    }

    /// Create a container.
    pub fn container(gutters: bool, children: Vec<Output>) -> Self {
        Output::Container { gutters, children }
    }

    /// Create an error marker.
    pub fn error(node_type: impl Into<String>, message: impl Into<String>) -> Self {
        Output::Error {
            node_type: node_type.into(),
            message: message.into(),
        }
    }

    /// Check whether this output renders nothing.
    pub fn is_empty(&self) -> bool {
        matches!(self, Output::Empty)
    }

    /// Direct children of this output.
    pub fn children(&self) -> &[Output] {
        match self {
            Output::Fragment { children }
            | Output::Container { children, .. }
            | Output::Link { children, .. } => children,
            Output::Element(element) => &element.children,
            _ => &[],
        }
    }

    /// Concatenated text of the output, breaks rendered as `\n`.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Output::Text { text } => out.push_str(text),
            Output::Break => out.push('\n'),
            _ => {
                for child in self.children() {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Visit this output and all descendants in document order.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Output)) {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }

    /// Collect all error markers below this output.
    pub fn errors(&self) -> Vec<&Output> {
        let mut errors = Vec::new();
        self.walk(&mut |o| {
            if matches!(o, Output::Error { .. }) {
                errors.push(o);
            }
        });
        errors
    }
}

impl From<Element> for Output {
    fn from(element: Element) -> Self {
        Output::Element(element)
    }
}

/// A tagged element of the output tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Element name (`p`, `h1`, `blockquote`, `li`, ...)
    pub tag: String,

    /// Attributes, ordered by name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,

    /// Child outputs
    #[serde(default)]
    pub children: Vec<Output>,
}

impl Element {
    /// Create an element without attributes or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the children.
    pub fn with_children(mut self, children: Vec<Output>) -> Self {
        self.children = children;
        self
    }

    /// Add a single child.
    pub fn with_child(mut self, child: Output) -> Self {
        self.children.push(child);
        self
    }

    /// Get an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}
