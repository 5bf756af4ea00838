//! Type dispatcher: renders resolved entities by their type tag.
//!
//! Entity renderers may re-enter the walker on documents nested in the
//! entity's payload through [`RenderScope::render_nested`], which is how a
//! quote card renders its quote or a person card its biography.

use super::{Element, LayoutParent, Output, RenderContext, RenderScope};
use crate::error::Result;
use crate::model::{Entity, ASSET_TYPE_TAG};
use std::collections::HashMap;
use std::sync::Arc;

/// Trait for rendering one type of entity.
pub trait EntityRenderer: Send + Sync {
    /// Render `entity` in the context of the node that referenced it.
    fn render(
        &self,
        entity: &Entity,
        scope: &mut RenderScope<'_>,
        context: &RenderContext,
    ) -> Result<Output>;
}

impl<F> EntityRenderer for F
where
    F: Fn(&Entity, &mut RenderScope<'_>, &RenderContext) -> Result<Output> + Send + Sync,
{
    fn render(
        &self,
        entity: &Entity,
        scope: &mut RenderScope<'_>,
        context: &RenderContext,
    ) -> Result<Output> {
        self(entity, scope, context)
    }
}

/// Registry mapping entity type tags to renderers.
#[derive(Clone, Default)]
pub struct EntityRegistry {
    renderers: HashMap<String, Arc<dyn EntityRenderer>>,
}

impl EntityRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry that renders assets as images.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ASSET_TYPE_TAG, AssetRenderer);
        registry
    }

    /// Register a renderer, replacing any previous one for the type.
    pub fn register<R: EntityRenderer + 'static>(
        &mut self,
        type_tag: impl Into<String>,
        renderer: R,
    ) {
        self.renderers.insert(type_tag.into(), Arc::new(renderer));
    }

    /// Get the renderer for a type tag.
    pub fn get(&self, type_tag: &str) -> Option<&Arc<dyn EntityRenderer>> {
        self.renderers.get(type_tag)
    }

    /// Check if a type tag has a renderer.
    pub fn contains(&self, type_tag: &str) -> bool {
        self.renderers.contains_key(type_tag)
    }

    /// Registered type tags, sorted.
    pub fn type_tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.renderers.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

/// Media assets as `img` elements.
pub struct AssetRenderer;

impl EntityRenderer for AssetRenderer {
    fn render(
        &self,
        entity: &Entity,
        _scope: &mut RenderScope<'_>,
        _context: &RenderContext,
    ) -> Result<Output> {
        let mut img = Element::new("img");
        if let Some(url) = entity.str_field("url") {
            img = img.with_attr("src", url);
        }
        let alt = entity
            .str_field("description")
            .filter(|d| !d.is_empty())
            .or_else(|| entity.str_field("title"))
            .unwrap_or_default();
        Ok(img.with_attr("alt", alt).into())
    }
}

/// Renders an entity by rendering one of its rich-text fields.
///
/// The nested document sees `role` as its parent, so its containers drop
/// their gutters when the role provides its own spacing.
#[derive(Debug, Clone)]
pub struct RichTextFieldRenderer {
    field: String,
    role: LayoutParent,
}

impl RichTextFieldRenderer {
    pub fn new(field: impl Into<String>, role: LayoutParent) -> Self {
        Self {
            field: field.into(),
            role,
        }
    }
}

impl EntityRenderer for RichTextFieldRenderer {
    fn render(
        &self,
        entity: &Entity,
        scope: &mut RenderScope<'_>,
        context: &RenderContext,
    ) -> Result<Output> {
        let wrapper = Element::new("div").with_attr("data-entity", entity.type_tag.as_str());
        let Some(document) = entity.rich_text(&self.field) else {
            log::debug!("{} {} has no `{}` field", entity.type_tag, entity.id, self.field);
            return Ok(wrapper.into());
        };

        let key = format!("{}.{}", entity.id, self.field);
        let body = scope.render_nested(&key, &document?, self.role.clone(), context)?;
        Ok(wrapper.with_child(body).into())
    }
}
