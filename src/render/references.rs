//! Renderers for reference-bearing nodes.
//!
//! Embedded entries and assets resolve synchronously against the reference
//! table. Entry hyperlinks first try the table and otherwise escalate to the
//! hyperlink resolver, rendering nothing until the lookup is terminal.

use super::registry::NodeRenderer;
use super::{Element, Output, RenderContext, RenderScope};
use crate::error::Result;
use crate::hyperlink::HyperlinkResolution;
use crate::model::{Entity, EntityClass, Node};

/// Literal rendering of a node nothing else could render: `"tag id"`, or the
/// tag alone when the node has no target.
pub fn fallback_output(node: &Node) -> Output {
    match node.target_id() {
        Some(id) => Output::text(format!("{} {}", node.node_type, id)),
        None => Output::text(node.node_type.as_str()),
    }
}

/// `embedded-entry-block`: dispatch the referenced entry by its type.
pub struct EmbeddedEntryRenderer;

impl NodeRenderer for EmbeddedEntryRenderer {
    fn render(
        &self,
        node: &Node,
        scope: &mut RenderScope<'_>,
        context: &RenderContext,
    ) -> Result<Output> {
        let id = node.required_target()?;
        let Some(entity) = scope.resolve(id, EntityClass::Entry).entity() else {
            return Ok(scope.fallback(node));
        };

        let body = scope.dispatch(entity, context)?;
        Ok(Element::new("div")
            .with_attr("class", "embedded-entry")
            .with_child(body)
            .into())
    }
}

/// `embedded-entry-inline`: dispatch inline, optionally with a stub entity
/// for entries the table does not carry.
pub struct InlineEntryRenderer;

impl NodeRenderer for InlineEntryRenderer {
    fn render(
        &self,
        node: &Node,
        scope: &mut RenderScope<'_>,
        context: &RenderContext,
    ) -> Result<Output> {
        let id = node.required_target()?;
        let body = match scope.resolve(id, EntityClass::Entry).entity() {
            Some(entity) => scope.dispatch(entity, context)?,
            None => match scope.options().inline_entry_type.as_deref() {
                Some(type_tag) => scope.dispatch(&Entity::new(id, type_tag), context)?,
                None => return Ok(scope.fallback(node)),
            },
        };
        Ok(Element::new("span").with_child(body).into())
    }
}

/// `embedded-asset-block`: a container around the dispatched asset.
pub struct EmbeddedAssetRenderer;

impl NodeRenderer for EmbeddedAssetRenderer {
    fn render(
        &self,
        node: &Node,
        scope: &mut RenderScope<'_>,
        context: &RenderContext,
    ) -> Result<Output> {
        let id = node.required_target()?;
        let Some(asset) = scope.resolve(id, EntityClass::Asset).entity() else {
            return Ok(scope.fallback(node));
        };

        let body = scope.dispatch(asset, context)?;
        Ok(Output::container(context.gutters(), vec![body]))
    }
}

/// `entry-hyperlink`: an inline link to a page or post.
pub struct EntryHyperlinkRenderer;

impl NodeRenderer for EntryHyperlinkRenderer {
    fn render(
        &self,
        node: &Node,
        scope: &mut RenderScope<'_>,
        context: &RenderContext,
    ) -> Result<Output> {
        let id = node.required_target()?;

        if let Some(href) = linked_entry_path(scope, id) {
            let children = scope.render_children(node, context)?;
            scope.count_link();
            return Ok(Output::Link { href, children });
        }

        let href = match scope.hyperlink(id) {
            HyperlinkResolution::Page(doc) => scope.options().page_path(&doc.slug),
            HyperlinkResolution::Post(doc) => scope.options().post_path(&doc.slug),
            HyperlinkResolution::Pending | HyperlinkResolution::Unresolved(_) => {
                return Ok(Output::Empty)
            }
        };
        let children = scope.render_children(node, context)?;
        Ok(Output::Link { href, children })
    }
}

/// Path of a page or post the reference table already carries.
fn linked_entry_path(scope: &mut RenderScope<'_>, id: &str) -> Option<String> {
    let entity = scope.resolve(id, EntityClass::Entry).entity()?;
    let slug = entity.str_field("slug").filter(|s| !s.is_empty())?;
    let options = scope.options();
    if entity.type_tag == options.page_type {
        Some(options.page_path(slug))
    } else if entity.type_tag == options.post_type {
        Some(options.post_path(slug))
    } else {
        None
    }
}
