//! Render context threaded through the walk.

use std::fmt;
use std::str::FromStr;

/// Semantic role of the nearest ancestor that set one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LayoutParent {
    Quote,
    ProductTable,
    InfoBlock,
    Duplex,
    ProductDescription,
    CardPerson,
    Category,
    CtaSubline,
    HeroBannerBody,
    PostIntro,
    Paragraph,
    Heading,
    ListItem,
    Table,
    HorizontalRule,
    Other(String),
}

impl LayoutParent {
    /// Whether this parent already provides the outer spacing a container
    /// would otherwise add.
    pub fn suppresses_gutters(&self) -> bool {
        matches!(
            self,
            LayoutParent::Quote
                | LayoutParent::ProductTable
                | LayoutParent::InfoBlock
                | LayoutParent::Duplex
                | LayoutParent::ProductDescription
                | LayoutParent::CardPerson
                | LayoutParent::Category
                | LayoutParent::CtaSubline
                | LayoutParent::HeroBannerBody
                | LayoutParent::PostIntro
        )
    }

    /// The kebab-case name of this role.
    pub fn as_str(&self) -> &str {
        match self {
            LayoutParent::Quote => "quote",
            LayoutParent::ProductTable => "product-table",
            LayoutParent::InfoBlock => "info-block",
            LayoutParent::Duplex => "duplex",
            LayoutParent::ProductDescription => "product-description",
            LayoutParent::CardPerson => "card-person",
            LayoutParent::Category => "category",
            LayoutParent::CtaSubline => "cta-subline",
            LayoutParent::HeroBannerBody => "hero-banner-body",
            LayoutParent::PostIntro => "post-intro",
            LayoutParent::Paragraph => "paragraph",
            LayoutParent::Heading => "heading",
            LayoutParent::ListItem => "list-item",
            LayoutParent::Table => "table",
            LayoutParent::HorizontalRule => "horizontal-rule",
            LayoutParent::Other(name) => name,
        }
    }
}

impl FromStr for LayoutParent {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "quote" => LayoutParent::Quote,
            "product-table" => LayoutParent::ProductTable,
            "info-block" => LayoutParent::InfoBlock,
            "duplex" => LayoutParent::Duplex,
            "product-description" => LayoutParent::ProductDescription,
            "card-person" => LayoutParent::CardPerson,
            "category" => LayoutParent::Category,
            "cta-subline" => LayoutParent::CtaSubline,
            "hero-banner-body" => LayoutParent::HeroBannerBody,
            "post-intro" => LayoutParent::PostIntro,
            "paragraph" => LayoutParent::Paragraph,
            "heading" => LayoutParent::Heading,
            "list-item" => LayoutParent::ListItem,
            "table" => LayoutParent::Table,
            "horizontal-rule" => LayoutParent::HorizontalRule,
            other => LayoutParent::Other(other.to_string()),
        })
    }
}

impl fmt::Display for LayoutParent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contextual state handed from a node to its children.
///
/// A value type: recursion either passes it on unchanged or derives a new
/// one with [`RenderContext::with_parent`] / [`RenderContext::nested`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    parent: Option<LayoutParent>,
    depth: usize,
}

impl RenderContext {
    /// The seed context: no parent, top-level document.
    pub fn root() -> Self {
        Self::default()
    }

    /// A root context that already sits inside `parent`.
    pub fn within(parent: LayoutParent) -> Self {
        Self::root().with_parent(parent)
    }

    /// Copy of this context with `parent` replaced.
    pub fn with_parent(&self, parent: LayoutParent) -> Self {
        Self {
            parent: Some(parent),
            depth: self.depth,
        }
    }

    /// Context for a document nested inside an entity with role `parent`.
    pub fn nested(&self, parent: LayoutParent) -> Self {
        Self {
            parent: Some(parent),
            depth: self.depth + 1,
        }
    }

    /// The nearest semantic ancestor.
    pub fn parent(&self) -> Option<&LayoutParent> {
        self.parent.as_ref()
    }

    /// How many entity-to-document hops lie above this point.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Whether a container rendered here should keep its outer spacing.
    pub fn gutters(&self) -> bool {
        !self
            .parent
            .as_ref()
            .is_some_and(LayoutParent::suppresses_gutters)
    }
}
