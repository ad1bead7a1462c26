//! # Storage Layer
//!
//! Reads manifests from disk and loads configuration.
//!
//! ## Sources
//!
//! | Source | Backed by | Failure |
//! |--------|-----------|---------|
//! | [`ManifestsFile`] | One YAML file, any number of documents | unreadable or unparsable → `invalid_source` |
//! | [`ManifestsFolder`] | Every YAML file below a directory | unreadable root → `invalid_source`, bad files skipped |
//!
//! Both implement [`ManifestSource`]. Initialization is lazy and happens
//! once; see [`ManifestSource::init`].
//!
//! ## Configuration
//!
//! | Scope | Location |
//! |-------|----------|
//! | Project | `.mtree.toml` in the current directory or a parent |
//! | Global | `config.toml` in the platform config directory |

mod source;
mod file;
mod folder;
mod config;

pub use source::{open_source, ManifestSet, ManifestSource, SharedSource, SourceError};
pub use file::{parse_manifests, read_manifests, ManifestsFile};
pub use folder::{discover, ManifestsFolder, DEFAULT_EXTENSIONS};
pub use config::{Config, ConfigError, GlobalConfig, OutputFormat, ProjectConfig, PROJECT_CONFIG_FILE};
