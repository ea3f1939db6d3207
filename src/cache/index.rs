//! Durable path index mapping source URLs to cached image locations
//!
//! Serialized as a flat JSON object: each key is the exact source-URL
//! string, each value the pair of root-relative paths written by the
//! store. Insertion order is irrelevant; keys are unique.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Where one source URL's cached variants live, relative to the cache root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Root-relative path to the 150x150 preview, e.g. `/<uuid>/preview.png`
    pub preview: String,

    /// Root-relative path to the full-resolution original
    pub origin: String,
}

impl CacheEntry {
    /// Absolute path to the preview under `root`
    pub fn full_preview(&self, root: &Path) -> PathBuf {
        join_relative(root, &self.preview)
    }

    /// Absolute path to the original under `root`
    pub fn full_origin(&self, root: &Path) -> PathBuf {
        join_relative(root, &self.origin)
    }
}

// Stored paths carry a leading slash; `Path::join` would treat them as
// absolute and discard `root`.
fn join_relative(root: &Path, relative: &str) -> PathBuf {
    root.join(relative.trim_start_matches('/'))
}

/// In-memory view of the index file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathIndex {
    entries: HashMap<String, CacheEntry>,
}

impl PathIndex {
    /// Empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Deserialize an index from its on-disk JSON form
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the index for the on-disk file
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Record `entry` under the source-URL `key`, replacing any prior entry
    pub fn insert(&mut self, key: String, entry: CacheEntry) {
        self.entries.insert(key, entry);
    }

    /// Stored entry for `key`, if any
    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Whether `key` has a confirmed entry
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
