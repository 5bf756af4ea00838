//! The document walker: dispatches every node to its renderer.
//!
//! # Example
//!
//! ```
//! use richtext::model::{Node, ReferenceTable, RichText};
//! use richtext::render::{to_html, DocumentWalker, RenderContext};
//!
//! let doc = RichText::new(
//!     Node::document(vec![Node::paragraph(vec![Node::text("a\nb")])]),
//!     ReferenceTable::new(),
//! )?;
//! let walker = DocumentWalker::new();
//! let result = walker.render(&doc, &RenderContext::root())?;
//! assert_eq!(
//!     to_html(&result.output),
//!     "<div class=\"container\"><p>a<br>b</p></div>"
//! );
//! # Ok::<(), richtext::Error>(())
//! ```

use super::dispatch::{EntityRegistry, EntityRenderer};
use super::references::fallback_output;
use super::registry::{NodeRenderer, RendererRegistry};
use super::{
    LayoutParent, NodePath, Output, PathSegment, RenderContext, RenderOptions, RenderResult,
    RenderStats,
};
use crate::error::{Error, Result};
use crate::hyperlink::{HyperlinkKey, HyperlinkResolution, HyperlinkResolver, UnresolvedReason};
use crate::model::{DocumentInstance, Entity, EntityClass, Node, ReferenceTable, Resolution, RichText};
use std::sync::Arc;

/// Walks document trees and produces output trees.
///
/// Holds no per-document state; one walker can render any number of
/// documents, from any number of threads.
#[derive(Clone)]
pub struct DocumentWalker {
    nodes: RendererRegistry,
    entities: EntityRegistry,
    options: RenderOptions,
    resolver: Option<Arc<HyperlinkResolver>>,
}

impl DocumentWalker {
    /// Create a walker with the default node and entity renderers.
    pub fn new() -> Self {
        Self {
            nodes: RendererRegistry::with_defaults(),
            entities: EntityRegistry::with_defaults(),
            options: RenderOptions::default(),
            resolver: None,
        }
    }

    /// Replace the node renderer registry.
    pub fn with_registry(mut self, registry: RendererRegistry) -> Self {
        self.nodes = registry;
        self
    }

    /// Replace the entity renderer registry.
    pub fn with_entities(mut self, entities: EntityRegistry) -> Self {
        self.entities = entities;
        self
    }

    /// Register a node renderer.
    pub fn with_node_renderer<R: NodeRenderer + 'static>(
        mut self,
        node_type: crate::model::NodeType,
        renderer: R,
    ) -> Self {
        self.nodes.register(node_type, renderer);
        self
    }

    /// Register an entity renderer.
    pub fn with_entity_renderer<R: EntityRenderer + 'static>(
        mut self,
        type_tag: impl Into<String>,
        renderer: R,
    ) -> Self {
        self.entities.register(type_tag, renderer);
        self
    }

    /// Set render options.
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve entry hyperlinks through `resolver`.
    pub fn with_resolver(mut self, resolver: Arc<HyperlinkResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// The render options in use.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// The node renderer registry in use.
    pub fn registry(&self) -> &RendererRegistry {
        &self.nodes
    }

    /// The entity renderer registry in use.
    pub fn entities(&self) -> &EntityRegistry {
        &self.entities
    }

    /// Render a rich-text document.
    pub fn render(&self, document: &RichText, context: &RenderContext) -> Result<RenderResult> {
        self.render_tree(&document.document, &document.table, document.instance, context)
    }

    /// Render a bare document tree against a reference table.
    ///
    /// Fails only if `root` is not a tree at all (no `content`); everything
    /// below the root degrades per node.
    pub fn render_tree(
        &self,
        root: &Node,
        table: &ReferenceTable,
        instance: DocumentInstance,
        context: &RenderContext,
    ) -> Result<RenderResult> {
        if root.content.is_none() {
            return Err(Error::InvalidDocument(format!(
                "root `{}` node has no content",
                root.node_type
            )));
        }

        let mut scope = RenderScope::new(self, table, instance, NodePath::root());
        let output = scope.render_node(root, context);
        log::debug!(
            "Rendered document {} ({} nodes, {} errors)",
            instance,
            scope.stats.node_count,
            scope.stats.error_count
        );
        Ok(RenderResult::new(output, scope.stats))
    }

    /// Re-render only the subtree affected by a change at `path`.
    ///
    /// Nested-document steps cannot be replayed from outside their entity
    /// renderer, so the subtree re-rendered is the one rooted at the last
    /// node of the root document on the path.
    pub fn rerender_node(
        &self,
        document: &RichText,
        path: &NodePath,
        context: &RenderContext,
    ) -> Result<Output> {
        let indices = path.local_prefix();
        let mut node = &document.document;
        let mut context = context.clone();

        for &index in &indices {
            if let Some(renderer) = self.nodes.get(&node.node_type) {
                context = renderer.child_context(&context);
            }
            node = node
                .child(index)
                .ok_or_else(|| Error::NodeNotFound(path.to_string()))?;
        }

        let mut scope = RenderScope::new(
            self,
            &document.table,
            document.instance,
            NodePath::from_indices(&indices),
        );
        Ok(scope.render_node(node, &context))
    }

    /// Render independent documents, in parallel when the `parallel`
    /// feature is enabled.
    pub fn render_batch(
        &self,
        documents: &[RichText],
        context: &RenderContext,
    ) -> Vec<Result<RenderResult>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            documents
                .par_iter()
                .map(|doc| self.render(doc, context))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            documents
                .iter()
                .map(|doc| self.render(doc, context))
                .collect()
        }
    }
}

impl Default for DocumentWalker {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-walk state handed to renderers.
///
/// Gives renderers access to the reference table, the entity dispatcher,
/// the hyperlink resolver and recursion into children, and tracks the
/// current node's path and the walk statistics.
pub struct RenderScope<'a> {
    walker: &'a DocumentWalker,
    table: &'a ReferenceTable,
    instance: DocumentInstance,
    path: NodePath,
    stats: RenderStats,
}

impl<'a> RenderScope<'a> {
    fn new(
        walker: &'a DocumentWalker,
        table: &'a ReferenceTable,
        instance: DocumentInstance,
        path: NodePath,
    ) -> Self {
        Self {
            walker,
            table,
            instance,
            path,
            stats: RenderStats::new(),
        }
    }

    /// Render one node through its registered renderer.
    ///
    /// Never fails: unknown tags fall back to a literal rendering and
    /// renderer errors become an error marker for this node only.
    pub fn render_node(&mut self, node: &Node, context: &RenderContext) -> Output {
        let walker = self.walker;
        self.stats.node_count += 1;

        if self.path.len() > walker.options.max_tree_depth {
            return self.fail(node, Error::DepthExceeded(walker.options.max_tree_depth));
        }

        let Some(renderer) = walker.nodes.get(&node.node_type) else {
            log::debug!("No renderer for `{}` at {}", node.node_type, self.path);
            return self.fallback(node);
        };

        match renderer.render(node, self, context) {
            Ok(output) => output,
            Err(err) => self.fail(node, err),
        }
    }

    /// Render all children of `node` under `context`.
    pub fn render_children(&mut self, node: &Node, context: &RenderContext) -> Result<Vec<Output>> {
        let children = node.children()?;
        let mut outputs = Vec::with_capacity(children.len());
        for (index, child) in children.iter().enumerate() {
            self.path.push(PathSegment::Child(index));
            outputs.push(self.render_node(child, context));
            self.path.pop();
        }
        Ok(outputs)
    }

    /// The literal fallback rendering of `node`: its tag, plus its target id.
    pub fn fallback(&mut self, node: &Node) -> Output {
        self.stats.fallback_count += 1;
        fallback_output(node)
    }

    /// Look up `id` in the reference table of the document being walked.
    pub fn resolve(&mut self, id: &str, class: EntityClass) -> Resolution<'a> {
        let resolution = self.table.resolve(id, class);
        if resolution.entity().is_some() {
            self.stats.resolved_reference_count += 1;
        } else {
            log::debug!("{:?} {} not in reference table", class, id);
        }
        resolution
    }

    /// Render an entity through the type dispatcher.
    pub fn dispatch(&mut self, entity: &Entity, context: &RenderContext) -> Result<Output> {
        let walker = self.walker;
        match walker.entities.get(&entity.type_tag) {
            Some(renderer) => {
                self.stats.dispatched_entity_count += 1;
                renderer.render(entity, self, context)
            }
            None => {
                log::debug!("No entity renderer for `{}`", entity.type_tag);
                self.stats.fallback_count += 1;
                let label = if entity.type_tag.is_empty() {
                    &entity.id
                } else {
                    &entity.type_tag
                };
                Ok(Output::text(label.clone()))
            }
        }
    }

    /// Render a document nested inside an entity.
    ///
    /// `key` names the nested document among its siblings (e.g. the entity
    /// id and field). The nested walk runs against the nested document's own
    /// reference table, with `parent` as its context parent.
    pub fn render_nested(
        &mut self,
        key: &str,
        document: &RichText,
        parent: LayoutParent,
        context: &RenderContext,
    ) -> Result<Output> {
        let nested = context.nested(parent);
        let limit = self.walker.options.max_depth;
        if nested.depth() > limit {
            return Err(Error::DepthExceeded(limit));
        }

        let path = self.path.join(PathSegment::Nested(key.to_string()));
        let mut scope = RenderScope::new(self.walker, &document.table, self.instance, path);
        let output = scope.render_node(&document.document, &nested);
        self.stats.merge(&scope.stats);
        Ok(output)
    }

    /// Current resolution state of the entry hyperlink being rendered.
    ///
    /// The first call for a node issues the lookup and answers `Pending`.
    pub fn hyperlink(&mut self, target: &str) -> HyperlinkResolution {
        let walker = self.walker;
        let Some(resolver) = walker.resolver.as_ref() else {
            return HyperlinkResolution::Unresolved(UnresolvedReason::NoLookupService);
        };

        let key = HyperlinkKey::new(self.instance, self.path.clone());
        let state = resolver.resolve(key, target, walker.options.preview);
        match state {
            HyperlinkResolution::Pending => self.stats.pending_link_count += 1,
            HyperlinkResolution::Page(_) | HyperlinkResolution::Post(_) => {
                self.stats.link_count += 1
            }
            HyperlinkResolution::Unresolved(_) => {}
        }
        state
    }

    /// Record a link produced without the lookup service.
    pub fn count_link(&mut self) {
        self.stats.link_count += 1;
    }

    /// Record emitted text segments.
    pub fn count_text_segments(&mut self, count: usize) {
        self.stats.text_segment_count += count as u32;
    }

    /// Render options of the walker.
    pub fn options(&self) -> &'a RenderOptions {
        &self.walker.options
    }

    /// Path of the node currently being rendered.
    pub fn path(&self) -> &NodePath {
        &self.path
    }

    /// Document instance being rendered.
    pub fn instance(&self) -> DocumentInstance {
        self.instance
    }

    fn fail(&mut self, node: &Node, err: Error) -> Output {
        log::warn!("Failed to render `{}` at {}: {}", node.node_type, self.path, err);
        self.stats.error_count += 1;
        Output::error(node.node_type.as_str(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeType;

    fn render(root: Node) -> RenderResult {
        DocumentWalker::new()
            .render_tree(
                &root,
                &ReferenceTable::new(),
                DocumentInstance::new(),
                &RenderContext::root(),
            )
            .unwrap()
    }

    #[test]
    fn test_unknown_tag_renders_literal() {
        let mut widget = Node::reference(NodeType::Unknown("widget".into()), "w1");
        widget.content = None;
        let result = render(Node::document(vec![
            widget,
            Node::new(NodeType::Unknown("gizmo".into())),
        ]));

        assert_eq!(result.output.plain_text(), "widget w1gizmo");
        assert_eq!(result.stats.fallback_count, 2);
        assert_eq!(result.stats.error_count, 0);
    }

    #[test]
    fn test_malformed_node_is_contained() {
        let mut broken = Node::paragraph(vec![]);
        broken.content = None;
        let result = render(Node::document(vec![
            broken,
            Node::paragraph(vec![Node::text("still here")]),
        ]));

        assert_eq!(result.stats.error_count, 1);
        assert_eq!(result.output.errors().len(), 1);
        assert!(result.output.plain_text().contains("still here"));
    }

    #[test]
    fn test_root_without_content_is_rejected() {
        let mut root = Node::document(vec![]);
        root.content = None;
        let result = DocumentWalker::new().render_tree(
            &root,
            &ReferenceTable::new(),
            DocumentInstance::new(),
            &RenderContext::root(),
        );
        assert!(matches!(result, Err(Error::InvalidDocument(_))));
    }

    #[test]
    fn test_tree_depth_bound() {
        let mut node = Node::text("deep");
        for _ in 0..10 {
            node = Node::quote(vec![node]);
        }
        let walker =
            DocumentWalker::new().with_options(RenderOptions::new().with_max_tree_depth(4));
        let result = walker
            .render_tree(
                &Node::document(vec![node]),
                &ReferenceTable::new(),
                DocumentInstance::new(),
                &RenderContext::root(),
            )
            .unwrap();

        assert_eq!(result.stats.error_count, 1);
        assert!(!result.output.plain_text().contains("deep"));
    }

    #[test]
    fn test_empty_registry_still_renders() {
        let walker = DocumentWalker::new().with_registry(RendererRegistry::new());
        let result = walker
            .render_tree(
                &Node::document(vec![Node::paragraph(vec![Node::text("x")])]),
                &ReferenceTable::new(),
                DocumentInstance::new(),
                &RenderContext::root(),
            )
            .unwrap();
        assert_eq!(result.output.plain_text(), "document");
    }
}
