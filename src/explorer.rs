//! Host-facing tree views
//!
//! A [`ManifestsTree`] serves one axis of the active source to a host tree
//! widget. An [`Explorer`] owns one tree per axis and swaps their source
//! whenever the host reports a new active document, bumping a generation
//! counter so subscribers know to refresh.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::{watch, RwLock};

use crate::domain::{self, Axis, TreeNode};
use crate::storage::{ManifestsFile, ProjectConfig, SharedSource};

/// Tree data for one classification axis
pub struct ManifestsTree {
    axis: Axis,
    source: RwLock<Option<SharedSource>>,
    changed: watch::Sender<u64>,
}

impl ManifestsTree {
    pub fn new(axis: Axis, source: Option<SharedSource>) -> Self {
        let (changed, _) = watch::channel(0);
        Self {
            axis,
            source: RwLock::new(source),
            changed,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Current source, if any
    pub async fn source(&self) -> Option<SharedSource> {
        self.source.read().await.clone()
    }

    /// Replaces the source and notifies subscribers
    pub async fn set_source(&self, source: Option<SharedSource>) {
        *self.source.write().await = source;
        self.changed.send_modify(|generation| *generation += 1);
    }

    /// Receives the generation counter, bumped on every source change
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changed.subscribe()
    }

    /// Children of `parent`, or the root nodes when `parent` is `None`.
    ///
    /// Loads the source on first use. Returns nothing without a source.
    pub async fn children(&self, parent: Option<&TreeNode>) -> Vec<TreeNode> {
        let Some(source) = self.source().await else {
            return Vec::new();
        };

        let key_path: &[String] = match parent {
            Some(node) if !node.is_expandable() => return Vec::new(),
            Some(node) => &node.key_path,
            None => &[],
        };

        let indexes = source.tree_sources().await;
        domain::children(self.axis, self.axis.select(indexes), key_path)
    }
}

/// The three axis trees plus the active-document handling
pub struct Explorer {
    config: ProjectConfig,
    trees: Vec<Arc<ManifestsTree>>,
}

impl Explorer {
    /// Creates the trees, starting from `active` if it is a manifest path
    pub fn new(config: ProjectConfig, active: Option<&Path>) -> Self {
        let initial: Option<SharedSource> = active
            .filter(|p| config.is_manifest_path(p))
            .map(|p| Arc::new(ManifestsFile::new(p)) as SharedSource);

        let trees = Axis::ALL
            .iter()
            .map(|axis| Arc::new(ManifestsTree::new(*axis, initial.clone())))
            .collect();

        Self { config, trees }
    }

    pub fn trees(&self) -> &[Arc<ManifestsTree>] {
        &self.trees
    }

    pub fn tree(&self, axis: Axis) -> Option<&Arc<ManifestsTree>> {
        self.trees.iter().find(|t| t.axis() == axis)
    }

    /// Handles an "active document changed" event.
    ///
    /// Paths without a manifest extension are ignored and `false` is
    /// returned. Otherwise every tree gets a fresh single-file source.
    pub async fn activate(&self, path: &Path) -> bool {
        if !self.config.is_manifest_path(path) {
            log::debug!("Ignoring non-manifest document: {}", path.display());
            return false;
        }

        log::debug!("Active manifest document: {}", path.display());
        let source: SharedSource = Arc::new(ManifestsFile::new(path));
        for tree in &self.trees {
            tree.set_source(Some(Arc::clone(&source))).await;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const PODS: &str = "\
kind: Pod
apiVersion: v1
metadata:
  name: web
  namespace: prod
  labels:
    app: web
---
kind: Pod
apiVersion: v1
metadata:
  name: db
";

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn labels(nodes: &[TreeNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.label.as_str()).collect()
    }

    #[tokio::test]
    async fn tree_without_source_is_empty() {
        let tree = ManifestsTree::new(Axis::Kind, None);
        assert!(tree.children(None).await.is_empty());
    }

    #[tokio::test]
    async fn tree_expands_lazily() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "pods.yaml", PODS);
        let source: SharedSource = Arc::new(ManifestsFile::new(&path));
        let tree = ManifestsTree::new(Axis::Kind, Some(Arc::clone(&source)));

        assert!(!source.is_initialized());
        let roots = tree.children(None).await;
        assert!(source.is_initialized());
        assert_eq!(labels(&roots), vec!["v1 [2]"]);

        let kinds = tree.children(Some(&roots[0])).await;
        assert_eq!(labels(&kinds), vec!["Pod [2]"]);

        let leaves = tree.children(Some(&kinds[0])).await;
        assert_eq!(labels(&leaves), vec!["db", "web"]);
        assert!(tree.children(Some(&leaves[0])).await.is_empty());

        let open = leaves[1].open_at().unwrap();
        assert_eq!(open.path, path);
        assert_eq!(open.line, 1);
    }

    #[tokio::test]
    async fn namespace_tree_uses_composite_leaves() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "pods.yaml", PODS);
        let explorer = Explorer::new(ProjectConfig::default(), Some(path.as_path()));

        let ns = explorer.tree(Axis::Ns).unwrap();
        let roots = ns.children(None).await;
        assert_eq!(labels(&roots), vec!["prod [1]", "undefinedNs [1]"]);
        let leaves = ns.children(Some(&roots[0])).await;
        assert_eq!(labels(&leaves), vec!["v1/Pod:web"]);
    }

    #[tokio::test]
    async fn initial_non_manifest_path_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "notes.txt", PODS);
        let explorer = Explorer::new(ProjectConfig::default(), Some(path.as_path()));

        for tree in explorer.trees() {
            assert!(tree.source().await.is_none());
        }
    }

    #[tokio::test]
    async fn activate_replaces_source_and_notifies() {
        let dir = TempDir::new().unwrap();
        let first = write(&dir, "first.yaml", PODS);
        let second = write(&dir, "second.yaml", "kind: Service\napiVersion: v1\nmetadata:\n  name: s\n");

        let explorer = Explorer::new(ProjectConfig::default(), Some(first.as_path()));
        let mut receivers: Vec<_> = explorer.trees().iter().map(|t| t.subscribe()).collect();

        assert!(explorer.activate(&second).await);

        for rx in &mut receivers {
            assert!(rx.has_changed().unwrap());
            assert_eq!(*rx.borrow_and_update(), 1);
        }

        let kind = explorer.tree(Axis::Kind).unwrap();
        let roots = kind.children(None).await;
        let kinds = kind.children(Some(&roots[0])).await;
        assert_eq!(labels(&kinds), vec!["Service [1]"]);

        let sources: Vec<_> = current_sources(&explorer).await;
        assert!(Arc::ptr_eq(&sources[0], &sources[1]));
        assert!(Arc::ptr_eq(&sources[1], &sources[2]));
    }

    async fn current_sources(explorer: &Explorer) -> Vec<SharedSource> {
        let mut out = Vec::new();
        for tree in explorer.trees() {
            out.push(tree.source().await.unwrap());
        }
        out
    }

    #[tokio::test]
    async fn activate_ignores_other_documents() {
        let explorer = Explorer::new(ProjectConfig::default(), None);
        let rx = explorer.trees()[0].subscribe();

        assert!(!explorer.activate(Path::new("README.md")).await);
        assert!(!rx.has_changed().unwrap());
        assert!(explorer.trees()[0].source().await.is_none());
    }

    #[tokio::test]
    async fn activate_unreadable_document_shows_nothing() {
        let dir = TempDir::new().unwrap();
        let explorer = Explorer::new(ProjectConfig::default(), None);

        assert!(explorer.activate(&dir.path().join("gone.yaml")).await);
        let tree = explorer.tree(Axis::Labels).unwrap();
        assert!(tree.children(None).await.is_empty());
        let source = tree.source().await.unwrap();
        assert!(source.get().unwrap().invalid_source);
    }
}
