//! Manifest record
//!
//! A [`Manifest`] wraps one parsed YAML document. Identity fields are read
//! from the document on access; nothing is copied out at parse time.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use super::line_index::{LineIndex, Position};

/// Shared handle to a manifest; indexes hold clones of these
pub type ManifestRef = Arc<Manifest>;

const KIND: &str = "kind";
const API_VERSION: &str = "apiVersion";
const METADATA: &str = "metadata";
const NAME: &str = "name";
const NAMESPACE: &str = "namespace";
const LABELS: &str = "labels";

/// One YAML document from a manifest file
#[derive(Debug, Clone)]
pub struct Manifest {
    document: Value,
    lines: Arc<LineIndex>,
    offset: Option<usize>,
    source_path: PathBuf,
}

impl Manifest {
    /// Creates a manifest from a parsed document.
    ///
    /// `offset` is the byte offset of the document's content in the text
    /// `lines` was built from, if the document has any content.
    pub fn new(
        document: Value,
        lines: Arc<LineIndex>,
        offset: Option<usize>,
        source_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            document,
            lines,
            offset,
            source_path: source_path.into(),
        }
    }

    /// File this manifest was read from
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// The raw parsed document
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Where the document's content starts in its file
    pub fn position(&self) -> Option<Position> {
        self.offset.map(|offset| self.lines.position(offset))
    }

    /// True when kind, apiVersion, a metadata mapping and a string name are
    /// all present
    pub fn is_valid(&self) -> bool {
        self.kind().is_some()
            && self.api_version().is_some()
            && self.metadata().is_some()
            && self.name().is_some()
    }

    pub fn kind(&self) -> Option<&str> {
        self.top_level(KIND).and_then(as_str)
    }

    pub fn api_version(&self) -> Option<&str> {
        self.top_level(API_VERSION).and_then(as_str)
    }

    /// The `metadata` block, if it is a mapping
    pub fn metadata(&self) -> Option<&Mapping> {
        self.top_level(METADATA).and_then(|v| untag(v).as_mapping())
    }

    pub fn name(&self) -> Option<&str> {
        self.from_metadata(NAME).and_then(as_str)
    }

    pub fn namespace(&self) -> Option<&str> {
        self.from_metadata(NAMESPACE).and_then(as_str)
    }

    /// `metadata.labels` as key/value pairs, if it is a mapping.
    ///
    /// Scalar keys and values are rendered as strings; entries with a
    /// sequence or mapping on either side are dropped.
    pub fn labels(&self) -> Option<BTreeMap<String, String>> {
        let labels = self.from_metadata(LABELS)?;
        let labels = untag(labels).as_mapping()?;

        Some(
            labels
                .iter()
                .filter_map(|(k, v)| Some((scalar_string(k)?, scalar_string(v)?)))
                .collect(),
        )
    }

    fn top_level(&self, key: &str) -> Option<&Value> {
        untag(&self.document).as_mapping()?.get(key)
    }

    fn from_metadata(&self, key: &str) -> Option<&Value> {
        self.metadata()?.get(key)
    }
}

/// Serializable identity of a manifest, used for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct ManifestSummary {
    pub kind: Option<String>,
    pub api_version: Option<String>,
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub labels: Option<BTreeMap<String, String>>,
    pub source_path: PathBuf,
    pub position: Option<Position>,
}

impl From<&Manifest> for ManifestSummary {
    fn from(m: &Manifest) -> Self {
        Self {
            kind: m.kind().map(str::to_string),
            api_version: m.api_version().map(str::to_string),
            name: m.name().map(str::to_string),
            namespace: m.namespace().map(str::to_string),
            labels: m.labels(),
            source_path: m.source_path().to_path_buf(),
            position: m.position(),
        }
    }
}

fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

fn as_str(value: &Value) -> Option<&str> {
    untag(value).as_str()
}

fn scalar_string(value: &Value) -> Option<String> {
    match untag(value) {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some("null".to_string()),
        _ => None,
    }
}
