//! Domain models for manifest-tree
//!
//! Manifest records, classification indexes and the tree projection.
//! Contains no I/O; reading files lives in [`crate::storage`].

mod line_index;
mod manifest;
mod index;
mod tree;

pub use line_index::{document_offsets, LineIndex, Position};
pub use manifest::{Manifest, ManifestRef, ManifestSummary};
pub use index::{
    Bucket, BucketUnion, ManifestIndexes, ManifestsByKind, ManifestsByLabels, ManifestsByNs,
    UNKNOWN_NS,
};
pub use tree::{children, descend, expand, Axis, Grouping, Level, OpenAt, RenderedNode, TreeNode, NO_NAME};
