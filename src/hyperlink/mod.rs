//! On-demand resolution of entry hyperlinks.
//!
//! An entry hyperlink whose target the reference table cannot turn into a
//! page or post is resolved through an external [`HyperlinkLookup`]. Each
//! hyperlink node gets its own state machine:
//!
//! ```text
//! Pending -> Page | Post | Unresolved
//! ```
//!
//! The terminal states are never left. The walker renders nothing while a
//! node is pending; completed lookups are announced on the
//! [`ResolutionEvents`] stream so the caller can re-render the node.

mod lookup;
mod resolver;

pub use lookup::{HyperlinkLookup, LinkedDocument, LookupResponse, StaticLookup};
pub use resolver::{HyperlinkResolver, ResolutionEvents};

use crate::model::DocumentInstance;
use crate::render::NodePath;
use std::fmt;

/// Resolution state of one hyperlink node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HyperlinkResolution {
    /// Lookup in flight
    Pending,
    /// Resolved to a page
    Page(LinkedDocument),
    /// Resolved to a post
    Post(LinkedDocument),
    /// Nothing to link to
    Unresolved(UnresolvedReason),
}

impl HyperlinkResolution {
    /// Whether this state is final.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, HyperlinkResolution::Pending)
    }
}

/// Why a hyperlink has no destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// The service knows no page or post for the id
    NotFound,
    /// The service failed
    LookupFailed(String),
    /// The walker has no lookup service
    NoLookupService,
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedReason::NotFound => f.write_str("not found"),
            UnresolvedReason::LookupFailed(msg) => write!(f, "lookup failed: {}", msg),
            UnresolvedReason::NoLookupService => f.write_str("no lookup service"),
        }
    }
}

/// Identity of a hyperlink node: the document instance and the node's path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HyperlinkKey {
    pub instance: DocumentInstance,
    pub path: NodePath,
}

impl HyperlinkKey {
    pub fn new(instance: DocumentInstance, path: NodePath) -> Self {
        Self { instance, path }
    }
}

impl fmt::Display for HyperlinkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.instance, self.path)
    }
}

/// A hyperlink reached a terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionEvent {
    /// Document the hyperlink belongs to
    pub instance: DocumentInstance,
    /// Path of the hyperlink node
    pub path: NodePath,
    /// The terminal state
    pub state: HyperlinkResolution,
}

/// Turn a lookup answer into a terminal state; pages win over posts.
pub(crate) fn classify(target: &str, response: LookupResponse) -> HyperlinkResolution {
    let page = response.page.filter(|doc| !doc.slug.is_empty());
    let post = response.post.filter(|doc| !doc.slug.is_empty());

    match (page, post) {
        (Some(page), Some(_)) => {
            log::warn!("Entry {} resolves to both a page and a post, linking the page", target);
            HyperlinkResolution::Page(page)
        }
        (Some(page), None) => HyperlinkResolution::Page(page),
        (None, Some(post)) => HyperlinkResolution::Post(post),
        (None, None) => HyperlinkResolution::Unresolved(UnresolvedReason::NotFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        let about = LinkedDocument::new("42", "about");
        let news = LinkedDocument::new("42", "news");

        assert_eq!(
            classify(
                "42",
                LookupResponse {
                    page: Some(about.clone()),
                    post: Some(news.clone()),
                }
            ),
            HyperlinkResolution::Page(about)
        );
        assert_eq!(
            classify(
                "42",
                LookupResponse {
                    page: None,
                    post: Some(news.clone()),
                }
            ),
            HyperlinkResolution::Post(news)
        );
        assert_eq!(
            classify("42", LookupResponse::default()),
            HyperlinkResolution::Unresolved(UnresolvedReason::NotFound)
        );
    }

    #[test]
    fn test_empty_slug_does_not_count() {
        let response = LookupResponse {
            page: Some(LinkedDocument::new("1", "")),
            post: Some(LinkedDocument::new("1", "news")),
        };
        assert!(matches!(
            classify("1", response),
            HyperlinkResolution::Post(_)
        ));
    }

    #[test]
    fn test_terminal_states() {
        assert!(!HyperlinkResolution::Pending.is_terminal());
        assert!(HyperlinkResolution::Unresolved(UnresolvedReason::NotFound).is_terminal());
    }
}
