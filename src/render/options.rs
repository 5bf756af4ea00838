//! Rendering options and configuration.

/// Options for rendering rich-text documents.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Maximum number of entity-to-document hops (nested documents)
    pub max_depth: usize,

    /// Maximum node nesting inside a single document
    pub max_tree_depth: usize,

    /// Ask the hyperlink lookup service for preview (draft) content
    pub preview: bool,

    /// Path prefix for links to pages (destination kind A)
    pub page_path_prefix: String,

    /// Path prefix for links to posts (destination kind B)
    pub post_path_prefix: String,

    /// Entity type tag for entries that resolve to pages
    pub page_type: String,

    /// Entity type tag for entries that resolve to posts
    pub post_type: String,

    /// Type tag dispatched for inline entries missing from the entry table
    pub inline_entry_type: Option<String>,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the nested-document depth bound.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the node nesting bound.
    pub fn with_max_tree_depth(mut self, depth: usize) -> Self {
        self.max_tree_depth = depth.max(1);
        self
    }

    /// Enable or disable preview lookups.
    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    /// Set the page path prefix.
    pub fn with_page_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.page_path_prefix = prefix.into();
        self
    }

    /// Set the post path prefix.
    pub fn with_post_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.post_path_prefix = prefix.into();
        self
    }

    /// Set the entity type tags that count as pages and posts.
    pub fn with_link_types(mut self, page: impl Into<String>, post: impl Into<String>) -> Self {
        self.page_type = page.into();
        self.post_type = post.into();
        self
    }

    /// Dispatch unlinked inline entries as entities of type `type_tag`.
    pub fn with_inline_entry_type(mut self, type_tag: impl Into<String>) -> Self {
        self.inline_entry_type = Some(type_tag.into());
        self
    }

    /// Path of a page with the given slug.
    pub fn page_path(&self, slug: &str) -> String {
        format!("{}{}", self.page_path_prefix, slug)
    }

    /// Path of a post with the given slug.
    pub fn post_path(&self, slug: &str) -> String {
        format!("{}{}", self.post_path_prefix, slug)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_depth: 16,
            max_tree_depth: 256,
            preview: false,
            page_path_prefix: "/".to_string(),
            post_path_prefix: "/post/".to_string(),
            page_type: "Page".to_string(),
            post_type: "Post".to_string(),
            inline_entry_type: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = RenderOptions::default();
        assert_eq!(options.max_depth, 16);
        assert!(!options.preview);
        assert!(options.inline_entry_type.is_none());
        assert_eq!(options.page_path("about"), "/about");
        assert_eq!(options.post_path("hello-world"), "/post/hello-world");
    }

    #[test]
    fn test_builder() {
        let options = RenderOptions::new()
            .with_preview(true)
            .with_page_prefix("/en/")
            .with_inline_entry_type("NtMergetag")
            .with_max_tree_depth(0);

        assert!(options.preview);
        assert_eq!(options.page_path("about"), "/en/about");
        assert_eq!(options.inline_entry_type.as_deref(), Some("NtMergetag"));
        assert_eq!(options.max_tree_depth, 1);
    }
}
