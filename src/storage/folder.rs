//! Folder manifest source
//!
//! Discovers YAML files anywhere under a directory and merges their
//! manifests. Files are loaded one after another, each merged before the
//! next is read. A file that cannot be read or parsed is skipped.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::OnceCell;

use super::file::ManifestsFile;
use super::source::{ManifestSet, ManifestSource, SourceError};

/// Extensions discovered when none are configured
pub const DEFAULT_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Manifests merged from every YAML file below a directory
#[derive(Debug)]
pub struct ManifestsFolder {
    path: PathBuf,
    extensions: Vec<String>,
    state: OnceCell<ManifestSet>,
}

impl ManifestsFolder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_extensions(path, DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()))
    }

    /// Creates a folder source that discovers files with the given extensions
    pub fn with_extensions(
        path: impl Into<PathBuf>,
        extensions: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            path: path.into(),
            extensions: extensions.into_iter().collect(),
            state: OnceCell::new(),
        }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    async fn load(&self) -> ManifestSet {
        let files = match discover(&self.path, &self.extensions).await {
            Ok(files) => files,
            Err(e) => {
                log::warn!("{}", e);
                return ManifestSet::invalid();
            }
        };

        log::debug!("Found {} YAML files under {}", files.len(), self.path.display());

        let mut set = ManifestSet::default();
        for file in files {
            let source = ManifestsFile::new(&file);
            let file_set = source.init().await;
            if file_set.invalid_source {
                log::warn!("Skipping unreadable file: {}", file.display());
                continue;
            }
            set.merge(file_set.clone());
        }

        set
    }
}

#[async_trait]
impl ManifestSource for ManifestsFolder {
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

/// Lists files under `root` with one of `extensions`, sorted by path
pub async fn discover(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, SourceError> {
    let discovery_error = |reason: String| SourceError::Discovery {
        path: root.to_path_buf(),
        reason,
    };

    // Unreadable roots are an error; glob would just yield nothing
    let metadata = tokio::fs::metadata(root)
        .await
        .map_err(|e| discovery_error(e.to_string()))?;
    if !metadata.is_dir() {
        return Err(discovery_error("not a directory".to_string()));
    }
    let _entries = tokio::fs::read_dir(root)
        .await
        .map_err(|e| discovery_error(e.to_string()))?;

    let base = glob::Pattern::escape(&root.to_string_lossy());
    let patterns: Vec<String> = extensions
        .iter()
        .map(|ext| format!("{}/**/*.{}", base, glob::Pattern::escape(ext)))
        .collect();

    let files = tokio::task::spawn_blocking(move || -> Result<Vec<PathBuf>, String> {
        let mut files = Vec::new();
        for pattern in &patterns {
            let entries = glob::glob(pattern).map_err(|e| e.to_string())?;
            for entry in entries {
                match entry {
                    Ok(path) if path.is_file() => files.push(path),
                    Ok(_) => {}
                    Err(e) => log::debug!("Skipping unreadable entry: {}", e),
                }
            }
        }
        files.sort();
        files.dedup();
        Ok(files)
    })
    .await
    .map_err(|e| discovery_error(e.to_string()))?
    .map_err(discovery_error)?;

    Ok(files)
}
