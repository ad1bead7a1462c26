//! Manifest sources
//!
//! A source owns a set of manifests and their classification indexes. It is
//! created with a path and filled by [`ManifestSource::init`], which never
//! fails: unreadable or unparsable input leaves an empty set with
//! [`ManifestSet::invalid_source`] raised.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use super::file::ManifestsFile;
use super::folder::ManifestsFolder;
use crate::domain::{ManifestIndexes, ManifestRef};

/// Why a source could not be loaded. Only ever logged; callers see
/// [`ManifestSet::invalid_source`].
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to discover files under {path}: {reason}")]
    Discovery { path: PathBuf, reason: String },
}

/// Everything a source produced during initialization
#[derive(Debug, Clone, Default)]
pub struct ManifestSet {
    /// Every parsed document, in encounter order
    pub manifests: Vec<ManifestRef>,

    /// Documents that failed the validity check; excluded from the indexes
    pub invalid_manifests: Vec<ManifestRef>,

    pub indexes: ManifestIndexes,

    /// The underlying file or folder could not be read or parsed
    pub invalid_source: bool,
}

impl ManifestSet {
    /// Empty set for a source that could not be loaded
    pub fn invalid() -> Self {
        Self {
            invalid_source: true,
            ..Self::default()
        }
    }

    /// Files a manifest, indexing it only if it is valid
    pub fn push(&mut self, manifest: ManifestRef) {
        if manifest.is_valid() {
            self.indexes.insert(&manifest);
        } else {
            self.invalid_manifests.push(ManifestRef::clone(&manifest));
        }
        self.manifests.push(manifest);
    }

    /// Appends another set's manifests and index buckets onto this one
    pub fn merge(&mut self, other: ManifestSet) {
        self.manifests.extend(other.manifests);
        self.invalid_manifests.extend(other.invalid_manifests);
        self.indexes.merge(other.indexes);
    }

    pub fn len(&self) -> usize {
        self.manifests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manifests.is_empty()
    }

    pub fn valid_len(&self) -> usize {
        self.manifests.len() - self.invalid_manifests.len()
    }

    pub fn invalid_len(&self) -> usize {
        self.invalid_manifests.len()
    }
}

/// Something that yields a [`ManifestSet`]: a single file or a folder
#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// Path this source was created with
    fn path(&self) -> &Path;

    /// Loads the source. Runs at most once; concurrent callers wait for the
    /// same load.
    async fn init(&self) -> &ManifestSet;

    /// The loaded set, or `None` before [`init`](Self::init) has completed
    fn get(&self) -> Option<&ManifestSet>;

    fn is_initialized(&self) -> bool {
        self.get().is_some()
    }

    /// The three classification indexes, loading the source first if needed
    async fn tree_sources(&self) -> &ManifestIndexes {
        &self.init().await.indexes
    }
}

/// Shared handle to a source, as held by trees
pub type SharedSource = Arc<dyn ManifestSource>;

/// Picks a folder source for directories and a file source for anything
/// else, including paths that do not exist
pub async fn open_source(path: &Path, extensions: &[String]) -> SharedSource {
    let is_dir = tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);

    if is_dir {
        return Arc::new(ManifestsFolder::with_extensions(path, extensions.iter().cloned()));
    }
    Arc::new(ManifestsFile::new(path))
}
