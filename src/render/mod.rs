//! Rendering of rich-text documents into output trees, and serialisation of
//! output trees to HTML, Markdown, plain text and JSON.

mod blocks;
mod context;
mod dispatch;
mod html;
mod json;
mod markdown;
mod options;
mod output;
mod path;
mod references;
mod registry;
mod result;
mod text;
mod walker;

pub use blocks::{
    ContainerRenderer, DocumentRenderer, ElementRenderer, HorizontalRuleRenderer, TableRenderer,
    TextRenderer, UriHyperlinkRenderer,
};
pub use context::{LayoutParent, RenderContext};
pub use dispatch::{AssetRenderer, EntityRegistry, EntityRenderer, RichTextFieldRenderer};
pub use html::{escape_html, to_html, CONTAINER_CLASS, GUTTERLESS_CLASS};
pub use json::{to_json, JsonFormat};
pub use markdown::{to_markdown, MarkdownRenderer};
pub use options::RenderOptions;
pub use output::{Element, Output};
pub use path::{NodePath, PathSegment};
pub use references::{
    fallback_output, EmbeddedAssetRenderer, EmbeddedEntryRenderer, EntryHyperlinkRenderer,
    InlineEntryRenderer,
};
pub use registry::{NodeRenderer, RendererRegistry};
pub use result::{RenderResult, RenderStats};
pub use text::to_text;
pub use walker::{DocumentWalker, RenderScope};
