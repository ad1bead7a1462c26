//! Single-file manifest source
//!
//! A file may hold any number of `---`-separated YAML documents. Each one
//! becomes a [`Manifest`]; all of them share one [`LineIndex`] so positions
//! are relative to the file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_yaml::Value;
use tokio::sync::OnceCell;

use super::source::{ManifestSet, ManifestSource, SourceError};
use crate::domain::{document_offsets, LineIndex, Manifest};

/// Manifests read from one YAML file
#[derive(Debug)]
pub struct ManifestsFile {
    path: PathBuf,
    state: OnceCell<ManifestSet>,
}

impl ManifestsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: OnceCell::new(),
        }
    }

    async fn load(&self) -> ManifestSet {
        match read_manifests(&self.path).await {
            Ok(set) => {
                log::debug!(
                    "Loaded {} manifests ({} invalid) from {}",
                    set.len(),
                    set.invalid_len(),
                    self.path.display()
                );
                set
            }
            Err(e) => {
                log::warn!("{}", e);
                ManifestSet::invalid()
            }
        }
    }
}

#[async_trait]
impl ManifestSource for ManifestsFile {
    fn path(&self) -> &Path {
        &self.path
    }

    async fn init(&self) -> &ManifestSet {
        self.state.get_or_init(|| self.load()).await
    }

    fn get(&self) -> Option<&ManifestSet> {
        self.state.get()
    }
}

/// Reads and parses a manifest file
pub async fn read_manifests(path: &Path) -> Result<ManifestSet, SourceError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    parse_manifests(&content, path)
}

/// Parses every YAML document in `content`.
///
/// Any syntax error fails the whole text; documents are otherwise kept
/// whether or not they are valid manifests.
pub fn parse_manifests(content: &str, path: &Path) -> Result<ManifestSet, SourceError> {
    let documents = serde_yaml::Deserializer::from_str(content)
        .map(Value::deserialize)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| SourceError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let offsets = document_offsets(content);
    if offsets.is_empty() {
        // blank or comment-only text still parses as one null document
        return Ok(ManifestSet::default());
    }

    let lines = Arc::new(LineIndex::new(content));
    if offsets.len() != documents.len() {
        log::debug!(
            "Found {} document offsets for {} documents in {}",
            offsets.len(),
            documents.len(),
            path.display()
        );
    }

    let mut set = ManifestSet::default();
    for (i, document) in documents.into_iter().enumerate() {
        let offset = offsets.get(i).copied().flatten();
        set.push(Arc::new(Manifest::new(
            document,
            Arc::clone(&lines),
            offset,
            path,
        )));
    }

    Ok(set)
}
