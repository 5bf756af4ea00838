//! The hyperlink lookup service contract.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A page or post an entry hyperlink can point at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedDocument {
    /// Identifier of the destination
    #[serde(default)]
    pub id: String,

    /// URL slug of the destination
    pub slug: String,
}

impl LinkedDocument {
    pub fn new(id: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
        }
    }
}

/// Answer of the lookup service: at most one of the two should be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResponse {
    /// Matching page, if any
    #[serde(default)]
    pub page: Option<LinkedDocument>,

    /// Matching post, if any
    #[serde(default)]
    pub post: Option<LinkedDocument>,
}

/// External service mapping an entry id to the page or post it denotes.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use richtext::hyperlink::{HyperlinkLookup, LinkedDocument, LookupResponse};
///
/// struct Everything;
///
/// #[async_trait]
/// impl HyperlinkLookup for Everything {
///     async fn lookup(&self, id: &str, _preview: bool) -> richtext::Result<LookupResponse> {
///         Ok(LookupResponse {
///             page: Some(LinkedDocument::new(id, id)),
///             post: None,
///         })
///     }
/// }
/// ```
#[async_trait]
pub trait HyperlinkLookup: Send + Sync {
    /// Look up `id`; `preview` asks for draft content.
    async fn lookup(&self, id: &str, preview: bool) -> Result<LookupResponse>;
}

/// Lookup answering from a fixed map, for tests and the CLI.
///
/// Ids without an answer resolve to nothing.
#[derive(Debug, Clone, Default)]
pub struct StaticLookup {
    answers: HashMap<String, LookupResponse>,
}

impl StaticLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `id` with a page.
    pub fn with_page(mut self, id: impl Into<String>, slug: impl Into<String>) -> Self {
        let id = id.into();
        let document = LinkedDocument::new(id.clone(), slug);
        self.answers.entry(id).or_default().page = Some(document);
        self
    }

    /// Answer `id` with a post.
    pub fn with_post(mut self, id: impl Into<String>, slug: impl Into<String>) -> Self {
        let id = id.into();
        let document = LinkedDocument::new(id.clone(), slug);
        self.answers.entry(id).or_default().post = Some(document);
        self
    }

    /// Load answers from a JSON object of `id -> {page?, post?}`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let answers: HashMap<String, LookupResponse> = serde_json::from_str(json)?;
        Ok(Self { answers })
    }

    /// Number of ids with an answer.
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

#[async_trait]
impl HyperlinkLookup for StaticLookup {
    async fn lookup(&self, id: &str, _preview: bool) -> Result<LookupResponse> {
        Ok(self.answers.get(id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_str() {
        let lookup = StaticLookup::from_json_str(
            r#"{"42": {"page": {"slug": "about"}}, "7": {"post": {"id": "7", "slug": "news"}}}"#,
        )
        .unwrap();
        assert_eq!(lookup.len(), 2);
        assert_eq!(
            lookup.answers["42"].page,
            Some(LinkedDocument::new("", "about"))
        );
        assert!(lookup.answers["7"].page.is_none());
    }

    #[test]
    fn test_builder_merges_answers() {
        let lookup = StaticLookup::new().with_page("1", "a").with_post("1", "b");
        assert_eq!(lookup.len(), 1);
        assert_eq!(lookup.answers["1"].page, Some(LinkedDocument::new("1", "a")));
        assert_eq!(lookup.answers["1"].post, Some(LinkedDocument::new("1", "b")));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(StaticLookup::from_json_str("[1, 2]").is_err());
    }
}
