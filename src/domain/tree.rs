//! Tree projection of classification indexes
//!
//! Any index that bottoms out in [`Bucket`]s can be viewed as a tree:
//! every map key becomes a branch labeled `"{key} [{count}]"`, every
//! manifest in a bucket becomes a leaf. Nodes only record the key path that
//! leads to them, so children are computed when a node is expanded and
//! nothing beyond one level is built up front.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::index::{Bucket, ManifestIndexes};
use super::line_index::Position;
use super::manifest::ManifestRef;

/// Leaf label for manifests without a name
pub const NO_NAME: &str = "noname";

/// A classification axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    #[default]
    Kind,
    Labels,
    Ns,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Kind, Axis::Labels, Axis::Ns];

    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Kind => "kind",
            Axis::Labels => "labels",
            Axis::Ns => "ns",
        }
    }

    /// The index for this axis
    pub fn select<'a>(&self, indexes: &'a ManifestIndexes) -> &'a dyn Grouping {
        match self {
            Axis::Kind => &indexes.by_kinds,
            Axis::Labels => &indexes.by_labels,
            Axis::Ns => &indexes.by_ns,
        }
    }

    fn leaf_label(&self, manifest: &ManifestRef) -> String {
        let name = manifest.name().unwrap_or(NO_NAME);
        match self {
            Axis::Kind => name.to_string(),
            Axis::Labels | Axis::Ns => format!(
                "{}/{}:{}",
                manifest.api_version().unwrap_or_default(),
                manifest.kind().unwrap_or_default(),
                name
            ),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kind" => Ok(Axis::Kind),
            "labels" => Ok(Axis::Labels),
            "ns" => Ok(Axis::Ns),
            other => Err(format!("unknown axis: {}", other)),
        }
    }
}

/// One level of a grouping, as seen by the projection
pub enum Level<'a> {
    Leaves(&'a [ManifestRef]),
    Branches(Vec<(&'a str, &'a dyn Grouping)>),
}

/// A nested mapping that ends in buckets of manifests
pub trait Grouping {
    fn level(&self) -> Level<'_>;

    /// Number of manifests reachable below this grouping
    fn count(&self) -> usize {
        match self.level() {
            Level::Leaves(manifests) => manifests.len(),
            Level::Branches(children) => children.iter().map(|(_, g)| g.count()).sum(),
        }
    }
}

impl Grouping for Bucket {
    fn level(&self) -> Level<'_> {
        Level::Leaves(self)
    }
}

impl<G: Grouping + 'static> Grouping for BTreeMap<String, G> {
    fn level(&self) -> Level<'_> {
        Level::Branches(
            self.iter()
                .map(|(k, v)| (k.as_str(), v as &dyn Grouping))
                .collect(),
        )
    }
}

/// Location a leaf navigates to when opened
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenAt {
    pub path: PathBuf,
    pub line: usize,
    pub column: usize,
}

/// A node of the projected tree
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub label: String,
    pub tooltip: String,
    /// Keys from the root to this node; empty for leaves
    pub key_path: Vec<String>,
    pub manifest: Option<ManifestRef>,
}

impl TreeNode {
    fn branch(key: &str, parent: &[String], count: usize) -> Self {
        let mut key_path = parent.to_vec();
        key_path.push(key.to_string());
        Self {
            label: format!("{} [{}]", key, count),
            tooltip: count.to_string(),
            key_path,
            manifest: None,
        }
    }

    fn leaf(axis: Axis, manifest: &ManifestRef) -> Self {
        Self {
            label: axis.leaf_label(manifest),
            tooltip: manifest.source_path().display().to_string(),
            key_path: Vec::new(),
            manifest: Some(ManifestRef::clone(manifest)),
        }
    }

    pub fn is_expandable(&self) -> bool {
        self.manifest.is_none()
    }

    /// Source path and position of a leaf's manifest
    pub fn navigation(&self) -> Option<(PathBuf, Option<Position>)> {
        let m = self.manifest.as_ref()?;
        Some((m.source_path().to_path_buf(), m.position()))
    }

    /// Action for opening a leaf's manifest; documents without a position
    /// open at the top of the file
    pub fn open_at(&self) -> Option<OpenAt> {
        let (path, position) = self.navigation()?;
        let Position { line, column } = position.unwrap_or(Position { line: 1, column: 1 });
        Some(OpenAt { path, line, column })
    }
}

/// Follows `key_path` down from `root`
pub fn descend<'a>(root: &'a dyn Grouping, key_path: &[String]) -> Option<&'a dyn Grouping> {
    let mut current = root;
    for key in key_path {
        current = match current.level() {
            Level::Branches(children) => children
                .into_iter()
                .find(|(k, _)| *k == key.as_str())
                .map(|(_, g)| g)?,
            Level::Leaves(_) => return None,
        };
    }
    Some(current)
}

/// Children of the node at `key_path` (the root when empty), sorted by label
pub fn children(axis: Axis, root: &dyn Grouping, key_path: &[String]) -> Vec<TreeNode> {
    let Some(grouping) = descend(root, key_path) else {
        return Vec::new();
    };

    let mut nodes: Vec<TreeNode> = match grouping.level() {
        Level::Leaves(manifests) => manifests.iter().map(|m| TreeNode::leaf(axis, m)).collect(),
        Level::Branches(branches) => branches
            .into_iter()
            .map(|(key, g)| TreeNode::branch(key, key_path, g.count()))
            .collect(),
    };

    nodes.sort_by(|a, b| a.label.cmp(&b.label));
    nodes
}

/// Serializable fully-expanded tree, used for rendering
#[derive(Debug, Clone, Serialize)]
pub struct RenderedNode {
    pub label: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RenderedNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_at: Option<OpenAt>,
}

/// Expands every node down to `depth` levels (unbounded when `None`)
pub fn expand(axis: Axis, root: &dyn Grouping, depth: Option<usize>) -> Vec<RenderedNode> {
    fn walk(axis: Axis, root: &dyn Grouping, path: &[String], depth: Option<usize>) -> Vec<RenderedNode> {
        children(axis, root, path)
            .into_iter()
            .map(|node| {
                let children = match depth {
                    Some(0) => Vec::new(),
                    _ if node.is_expandable() => {
                        walk(axis, root, &node.key_path, depth.map(|d| d - 1))
                    }
                    _ => Vec::new(),
                };
                RenderedNode {
                    open_at: node.open_at(),
                    label: node.label,
                    children,
                }
            })
            .collect()
    }

    match depth {
        Some(0) => Vec::new(),
        _ => walk(axis, root, &[], depth.map(|d| d - 1)),
    }
}
