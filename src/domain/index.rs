//! Classification indexes
//!
//! Three groupings over the same manifest set:
//!
//! | Axis | Shape |
//! |------|-------|
//! | kind | apiVersion → kind → manifests |
//! | labels | label key → label value → manifests |
//! | ns | namespace → manifests |
//!
//! Buckets keep insertion order. Merging two indexes appends bucket contents
//! key by key, never replacing an existing bucket.

use std::collections::BTreeMap;

use super::manifest::ManifestRef;

/// Bucket key for manifests without a namespace
pub const UNKNOWN_NS: &str = "undefinedNs";

/// Ordered manifests under one classification key
pub type Bucket = Vec<ManifestRef>;

pub type ManifestsByKind = BTreeMap<String, BTreeMap<String, Bucket>>;
pub type ManifestsByLabels = BTreeMap<String, BTreeMap<String, Bucket>>;
pub type ManifestsByNs = BTreeMap<String, Bucket>;

/// Union of two groupings: buckets are concatenated, nested maps are merged
/// key by key
pub trait BucketUnion {
    fn union_with(&mut self, other: Self);
}

impl BucketUnion for Bucket {
    fn union_with(&mut self, other: Self) {
        self.extend(other);
    }
}

impl<T: BucketUnion + Default> BucketUnion for BTreeMap<String, T> {
    fn union_with(&mut self, other: Self) {
        for (key, value) in other {
            self.entry(key).or_default().union_with(value);
        }
    }
}

/// The three classification indexes of a manifest source
#[derive(Debug, Clone, Default)]
pub struct ManifestIndexes {
    pub by_kinds: ManifestsByKind,
    pub by_labels: ManifestsByLabels,
    pub by_ns: ManifestsByNs,
}

impl ManifestIndexes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files a valid manifest under every axis.
    ///
    /// Callers must only insert manifests that pass
    /// [`Manifest::is_valid`](super::Manifest::is_valid).
    pub fn insert(&mut self, manifest: &ManifestRef) {
        if let (Some(api_version), Some(kind)) = (manifest.api_version(), manifest.kind()) {
            push_nested(&mut self.by_kinds, api_version, kind, manifest);
        }

        let ns = manifest.namespace().unwrap_or(UNKNOWN_NS);
        self.by_ns
            .entry(ns.to_string())
            .or_default()
            .push(ManifestRef::clone(manifest));

        if let Some(labels) = manifest.labels() {
            for (key, value) in &labels {
                push_nested(&mut self.by_labels, key, value, manifest);
            }
        }
    }

    /// Appends every bucket of `other` onto this index
    pub fn merge(&mut self, other: ManifestIndexes) {
        self.by_kinds.union_with(other.by_kinds);
        self.by_labels.union_with(other.by_labels);
        self.by_ns.union_with(other.by_ns);
    }

    pub fn is_empty(&self) -> bool {
        self.by_kinds.is_empty() && self.by_labels.is_empty() && self.by_ns.is_empty()
    }
}

fn push_nested(
    index: &mut BTreeMap<String, BTreeMap<String, Bucket>>,
    outer: &str,
    inner: &str,
    manifest: &ManifestRef,
) {
    index
        .entry(outer.to_string())
        .or_default()
        .entry(inner.to_string())
        .or_default()
        .push(ManifestRef::clone(manifest));
}
