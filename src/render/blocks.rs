//! Default renderers for structural nodes and text leaves.

use super::registry::NodeRenderer;
use super::{Element, LayoutParent, Output, RenderContext, RenderScope};
use crate::error::{Error, Result};
use crate::model::{MarkKind, Node};

/// Renders the document root as the plain sequence of its children.
pub struct DocumentRenderer;

impl NodeRenderer for DocumentRenderer {
    fn render(
        &self,
        node: &Node,
        scope: &mut RenderScope<'_>,
        context: &RenderContext,
    ) -> Result<Output> {
        Ok(Output::fragment(scope.render_children(node, context)?))
    }
}

/// Block renderer that wraps an element in the grid container.
///
/// The container keeps its gutters unless the current parent already
/// provides the spacing; children see this node's role as their parent.
pub struct ContainerRenderer {
    tag: String,
    role: LayoutParent,
}

impl ContainerRenderer {
    pub fn new(tag: impl Into<String>, role: LayoutParent) -> Self {
        Self {
            tag: tag.into(),
            role,
        }
    }

    /// Renderer for `hN` headings.
    pub fn heading(level: u8) -> Self {
        Self::new(format!("h{}", level.clamp(1, 6)), LayoutParent::Heading)
    }
}

impl NodeRenderer for ContainerRenderer {
    fn render(
        &self,
        node: &Node,
        scope: &mut RenderScope<'_>,
        context: &RenderContext,
    ) -> Result<Output> {
        let children = scope.render_children(node, &self.child_context(context))?;
        let element = Element::new(self.tag.as_str()).with_children(children);
        Ok(Output::container(context.gutters(), vec![element.into()]))
    }

    fn child_context(&self, context: &RenderContext) -> RenderContext {
        context.with_parent(self.role.clone())
    }
}

/// Table: a container around a horizontally scrollable wrapper.
pub struct TableRenderer;

impl NodeRenderer for TableRenderer {
    fn render(
        &self,
        node: &Node,
        scope: &mut RenderScope<'_>,
        context: &RenderContext,
    ) -> Result<Output> {
        let rows = scope.render_children(node, &self.child_context(context))?;
        let table = Element::new("div")
            .with_attr("style", "overflow:auto")
            .with_child(Element::new("table").with_children(rows).into());
        Ok(Output::container(context.gutters(), vec![table.into()]))
    }

    fn child_context(&self, context: &RenderContext) -> RenderContext {
        context.with_parent(LayoutParent::Table)
    }
}

/// Horizontal rule, wrapped in a container.
pub struct HorizontalRuleRenderer;

impl NodeRenderer for HorizontalRuleRenderer {
    fn render(
        &self,
        _node: &Node,
        _scope: &mut RenderScope<'_>,
        context: &RenderContext,
    ) -> Result<Output> {
        Ok(Output::container(
            context.gutters(),
            vec![Element::new("hr").into()],
        ))
    }
}

/// Plain element without a container of its own (lists, rows, cells).
pub struct ElementRenderer {
    tag: String,
    role: Option<LayoutParent>,
}

impl ElementRenderer {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            role: None,
        }
    }

    /// Make children see `role` as their parent.
    pub fn with_role(mut self, role: LayoutParent) -> Self {
        self.role = Some(role);
        self
    }
}

impl NodeRenderer for ElementRenderer {
    fn render(
        &self,
        node: &Node,
        scope: &mut RenderScope<'_>,
        context: &RenderContext,
    ) -> Result<Output> {
        let children = scope.render_children(node, &self.child_context(context))?;
        Ok(Element::new(self.tag.as_str()).with_children(children).into())
    }

    fn child_context(&self, context: &RenderContext) -> RenderContext {
        match self.role {
            Some(ref role) => context.with_parent(role.clone()),
            None => context.clone(),
        }
    }
}

/// Text leaves: one segment per line, a break between lines, then marks.
pub struct TextRenderer;

impl NodeRenderer for TextRenderer {
    fn render(
        &self,
        node: &Node,
        scope: &mut RenderScope<'_>,
        _context: &RenderContext,
    ) -> Result<Output> {
        let text = node.text_value()?;

        let mut segments = Vec::new();
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                segments.push(Output::Break);
            }
            segments.push(Output::text(line));
        }
        scope.count_text_segments(text.matches('\n').count() + 1);

        let mut output = if segments.len() == 1 {
            segments.remove(0)
        } else {
            Output::Fragment { children: segments }
        };

        for mark in &node.marks {
            if let Some(tag) = mark_tag(&mark.kind) {
                output = Element::new(tag).with_child(output).into();
            }
        }
        Ok(output)
    }
}

fn mark_tag(kind: &MarkKind) -> Option<&'static str> {
    match kind {
        MarkKind::Bold => Some("strong"),
        MarkKind::Italic => Some("em"),
        MarkKind::Underline => Some("u"),
        MarkKind::Code => Some("code"),
        MarkKind::Superscript => Some("sup"),
        MarkKind::Subscript => Some("sub"),
        MarkKind::Strikethrough => Some("s"),
        MarkKind::Other(_) => None,
    }
}

/// Plain URI hyperlinks.
pub struct UriHyperlinkRenderer;

impl NodeRenderer for UriHyperlinkRenderer {
    fn render(
        &self,
        node: &Node,
        scope: &mut RenderScope<'_>,
        context: &RenderContext,
    ) -> Result<Output> {
        let href = node
            .data
            .uri
            .as_deref()
            .filter(|uri| !uri.is_empty())
            .ok_or_else(|| Error::malformed(node.node_type.as_str(), "missing data.uri"))?;
        let children = scope.render_children(node, context)?;
        scope.count_link();
        Ok(Output::Link {
            href: href.to_string(),
            children,
        })
    }
}
