//! Rendering result with statistics.

use super::Output;
use serde::{Deserialize, Serialize};

/// Result of rendering a document: the output tree plus statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered output tree
    pub output: Output,

    /// Walk statistics
    pub stats: RenderStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(output: Output, stats: RenderStats) -> Self {
        Self { output, stats }
    }

    /// Whether any node of the document failed to render.
    pub fn has_errors(&self) -> bool {
        self.stats.error_count > 0
    }
}

/// Statistics collected while walking a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Nodes handed to a renderer (nested documents included)
    pub node_count: u32,

    /// Text segments emitted by text leaves
    pub text_segment_count: u32,

    /// References satisfied from the reference table
    pub resolved_reference_count: u32,

    /// Nodes rendered through the literal fallback
    pub fallback_count: u32,

    /// Entities rendered through the type dispatcher
    pub dispatched_entity_count: u32,

    /// Hyperlinks rendered as links
    pub link_count: u32,

    /// Hyperlinks still waiting on the lookup service
    pub pending_link_count: u32,

    /// Nodes replaced by an error marker
    pub error_count: u32,
}

impl RenderStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &RenderStats) {
        self.node_count += other.node_count;
        self.text_segment_count += other.text_segment_count;
        self.resolved_reference_count += other.resolved_reference_count;
        self.fallback_count += other.fallback_count;
        self.dispatched_entity_count += other.dispatched_entity_count;
        self.link_count += other.link_count;
        self.pending_link_count += other.pending_link_count;
        self.error_count += other.error_count;
    }
}
