//! Document model types for rich-text content.
//!
//! The input side of rendering: an immutable tree of typed nodes plus the
//! id-keyed reference table of entries and assets the tree points at.

mod document;
mod links;
mod node;

pub use document::{DocumentInstance, RichText};
pub use links::{Entity, EntityClass, ReferenceTable, Resolution, ASSET_TYPE_TAG};
pub use node::{Mark, MarkKind, Node, NodeData, NodeType, Sys, Target};
