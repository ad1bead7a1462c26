//! manifest-tree - browse Kubernetes-style YAML manifests
//!
//! Manifests are read from a YAML file or a directory of them and grouped
//! three ways at once: by apiVersion and kind, by label, and by namespace.
//! Each grouping can be walked as a tree whose nodes are expanded on demand.

pub mod domain;
pub mod storage;
pub mod explorer;
pub mod cli;

pub use domain::{Axis, Manifest, ManifestIndexes, TreeNode};
pub use explorer::{Explorer, ManifestsTree};
pub use storage::{ManifestSet, ManifestSource, ManifestsFile, ManifestsFolder};
