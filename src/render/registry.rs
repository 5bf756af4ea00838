//! Node renderer registry providing the tag-to-renderer mapping.
//!
//! # Example
//!
//! ```
//! use richtext::model::{Node, NodeType};
//! use richtext::render::{
//!     Element, NodeRenderer, Output, RenderContext, RenderScope, RendererRegistry,
//! };
//!
//! struct Callout;
//!
//! impl NodeRenderer for Callout {
//!     fn render(
//!         &self,
//!         node: &Node,
//!         scope: &mut RenderScope<'_>,
//!         context: &RenderContext,
//!     ) -> richtext::Result<Output> {
//!         let children = scope.render_children(node, context)?;
//!         Ok(Element::new("aside").with_children(children).into())
//!     }
//! }
//!
//! let mut registry = RendererRegistry::with_defaults();
//! registry.register(NodeType::Unknown("callout".into()), Callout);
//! assert!(registry.contains(&NodeType::Unknown("callout".into())));
//! ```

use super::blocks::{
    ContainerRenderer, DocumentRenderer, ElementRenderer, HorizontalRuleRenderer, TableRenderer,
    TextRenderer, UriHyperlinkRenderer,
};
use super::references::{
    EmbeddedAssetRenderer, EmbeddedEntryRenderer, EntryHyperlinkRenderer, InlineEntryRenderer,
};
use super::{LayoutParent, Output, RenderContext, RenderScope};
use crate::error::Result;
use crate::model::{Node, NodeType};
use std::collections::HashMap;
use std::sync::Arc;

/// Trait for rendering one kind of node.
///
/// Implemented for plain closures with the same signature as
/// [`NodeRenderer::render`].
pub trait NodeRenderer: Send + Sync {
    /// Render `node`. Children are rendered through `scope`.
    ///
    /// Returning an error replaces this node's output with an error marker;
    /// siblings are unaffected.
    fn render(
        &self,
        node: &Node,
        scope: &mut RenderScope<'_>,
        context: &RenderContext,
    ) -> Result<Output>;

    /// The context this renderer hands to its children.
    fn child_context(&self, context: &RenderContext) -> RenderContext {
        context.clone()
    }
}

impl<F> NodeRenderer for F
where
    F: Fn(&Node, &mut RenderScope<'_>, &RenderContext) -> Result<Output> + Send + Sync,
{
    fn render(
        &self,
        node: &Node,
        scope: &mut RenderScope<'_>,
        context: &RenderContext,
    ) -> Result<Output> {
        self(node, scope, context)
    }
}

/// Registry mapping node-type tags to renderers.
///
/// Tags without an entry render through the literal fallback, so an empty
/// registry still renders every document.
#[derive(Clone, Default)]
pub struct RendererRegistry {
    renderers: HashMap<NodeType, Arc<dyn NodeRenderer>>,
}

impl RendererRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the default renderers for every known tag.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(NodeType::Document, DocumentRenderer);
        registry.register(
            NodeType::Paragraph,
            ContainerRenderer::new("p", LayoutParent::Paragraph),
        );
        for level in 1..=6u8 {
            registry.register(
                NodeType::Heading(level),
                ContainerRenderer::heading(level),
            );
        }
        registry.register(
            NodeType::Quote,
            ContainerRenderer::new("blockquote", LayoutParent::Quote),
        );
        registry.register(NodeType::Table, TableRenderer);
        registry.register(NodeType::HorizontalRule, HorizontalRuleRenderer);

        registry.register(NodeType::UnorderedList, ElementRenderer::new("ul"));
        registry.register(NodeType::OrderedList, ElementRenderer::new("ol"));
        registry.register(
            NodeType::ListItem,
            ElementRenderer::new("li").with_role(LayoutParent::ListItem),
        );
        registry.register(NodeType::TableRow, ElementRenderer::new("tr"));
        registry.register(NodeType::TableCell, ElementRenderer::new("td"));
        registry.register(NodeType::TableHeaderCell, ElementRenderer::new("th"));

        registry.register(NodeType::EmbeddedEntryBlock, EmbeddedEntryRenderer);
        registry.register(NodeType::EmbeddedEntryInline, InlineEntryRenderer);
        registry.register(NodeType::EmbeddedAssetBlock, EmbeddedAssetRenderer);
        registry.register(NodeType::EntryHyperlink, EntryHyperlinkRenderer);
        registry.register(NodeType::Hyperlink, UriHyperlinkRenderer);

        registry.register(NodeType::Text, TextRenderer);
        registry
    }

    /// Register a renderer, replacing any previous one for the tag.
    pub fn register<R: NodeRenderer + 'static>(&mut self, node_type: NodeType, renderer: R) {
        self.renderers.insert(node_type, Arc::new(renderer));
    }

    /// Register a shared renderer.
    pub fn register_shared(&mut self, node_type: NodeType, renderer: Arc<dyn NodeRenderer>) {
        self.renderers.insert(node_type, renderer);
    }

    /// Remove the renderer for a tag, returning it.
    pub fn unregister(&mut self, node_type: &NodeType) -> Option<Arc<dyn NodeRenderer>> {
        self.renderers.remove(node_type)
    }

    /// Get the renderer for a tag.
    pub fn get(&self, node_type: &NodeType) -> Option<&Arc<dyn NodeRenderer>> {
        self.renderers.get(node_type)
    }

    /// Check if a tag has a renderer.
    pub fn contains(&self, node_type: &NodeType) -> bool {
        self.renderers.contains_key(node_type)
    }

    /// Number of registered tags.
    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    /// Check whether no tag is registered.
    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_with_defaults() {
        let registry = RendererRegistry::with_defaults();
        assert!(registry.contains(&NodeType::Paragraph));
        assert!(registry.contains(&NodeType::Heading(6)));
        assert!(registry.contains(&NodeType::Text));
        assert!(registry.contains(&NodeType::EntryHyperlink));
        assert!(!registry.contains(&NodeType::Unknown("widget".into())));
    }

    #[test]
    fn test_registry_new_is_empty() {
        let registry = RendererRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get(&NodeType::Paragraph).is_none());
    }

    fn stars(_node: &Node, _scope: &mut RenderScope<'_>, _context: &RenderContext) -> Result<Output> {
        Ok(Output::text("***"))
    }

    #[test]
    fn test_register_fn_replaces_default() {
        let mut registry = RendererRegistry::with_defaults();
        let before = registry.len();
        registry.register(NodeType::HorizontalRule, stars);
        assert_eq!(registry.len(), before);

        assert!(registry.unregister(&NodeType::HorizontalRule).is_some());
        assert!(!registry.contains(&NodeType::HorizontalRule));
    }
}
