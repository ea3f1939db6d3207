//! On-disk cache store: directory layout, image writes, index persistence
//!
//! The store exclusively owns the cache root. Every successful
//! [`CachePolicy::store_image`] overwrites the index file, so previously
//! confirmed entries survive a crash.

use async_trait::async_trait;
use image::imageops::FilterType;
use image::ImageFormat;
use std::io::Cursor;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::cache::index::{CacheEntry, PathIndex};
use crate::error::{Error, Result};

/// Fixed filename of the index file inside the cache root
pub const INDEX_FILE: &str = "config.json";

/// Square edge of generated previews
const PREVIEW_EDGE: u32 = 150;

const PREVIEW_FILE: &str = "preview.png";
const ORIGIN_FILE: &str = "origin.png";

/// Disk caching policy
///
/// Exactly the operations the fetch orchestrator needs; tests substitute
/// an in-memory implementation.
#[async_trait]
pub trait CachePolicy: Send {
    /// Read the index file into memory. A missing or corrupt file leaves
    /// the index empty: first run and corruption recovery are identical.
    async fn load_index(&mut self);

    /// Whether `url` has a confirmed entry in the in-memory index
    fn is_cached(&self, url: &Url) -> bool;

    /// Stored entry for `url`, if any
    fn entry(&self, url: &Url) -> Option<CacheEntry>;

    /// Downsample `bytes`, persist both variants under a fresh
    /// sub-directory, record the entry under `key` and flush the index
    async fn store_image(&mut self, bytes: &[u8], key: &Url) -> Result<CacheEntry>;

    /// The cache root directory, created if absent
    async fn cache_root(&self) -> PathBuf;

    /// Drop the in-memory index and delete the entire cache root
    async fn reset(&mut self);

    /// Create an empty index file if none exists; no-op otherwise
    async fn ensure_index_file(&self);
}

/// File-backed [`CachePolicy`] rooted in the platform user-cache directory
#[derive(Debug)]
pub struct DiskCacheStore {
    root: PathBuf,
    index: PathIndex,
}

impl Default for DiskCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DiskCacheStore {
    /// Store rooted at the platform default location
    pub fn new() -> Self {
        Self::with_root(Self::default_root())
    }

    /// Store rooted at an explicit directory (tests, embedding apps)
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            root,
            index: PathIndex::new(),
        }
    }

    /// `<user-cache>/pixcache/images`
    pub fn default_root() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pixcache")
            .join("images")
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    /// Overwrite the index file with the current in-memory state.
    /// Write failures are logged and swallowed; the worst case is a
    /// re-download on the next session.
    async fn persist_index(&self) {
        let json = match self.index.to_json() {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize cache index: {}", e);
                return;
            }
        };

        let path = self.index_path();
        if let Err(e) = fs::write(&path, json).await {
            warn!("Failed to write cache index {}: {}", path.display(), e);
        }
    }
}

#[async_trait]
impl CachePolicy for DiskCacheStore {
    async fn load_index(&mut self) {
        let path = self.index_path();
        self.index = match fs::read_to_string(&path).await {
            Ok(json) => PathIndex::parse(&json).unwrap_or_else(|e| {
                debug!("Cache index {} is corrupt, starting empty: {}", path.display(), e);
                PathIndex::new()
            }),
            Err(e) => {
                debug!("No cache index at {}: {}", path.display(), e);
                PathIndex::new()
            }
        };
        debug!("Loaded cache index with {} entries", self.index.len());
    }

    fn is_cached(&self, url: &Url) -> bool {
        self.index.contains(url.as_str())
    }

    fn entry(&self, url: &Url) -> Option<CacheEntry> {
        self.index.get(url.as_str()).cloned()
    }

    async fn store_image(&mut self, bytes: &[u8], key: &Url) -> Result<CacheEntry> {
        let img = image::load_from_memory(bytes).map_err(|e| {
            debug!("Decode failed for {}: {}", key, e);
            Error::Decode {
                url: key.to_string(),
            }
        })?;
        let preview = img.resize_to_fill(PREVIEW_EDGE, PREVIEW_EDGE, FilterType::Lanczos3);

        let mut preview_png = Vec::new();
        preview
            .write_to(&mut Cursor::new(&mut preview_png), ImageFormat::Png)
            .map_err(|e| Error::Internal(format!("PNG encode failed for {}: {}", key, e)))?;
        let mut origin_png = Vec::new();
        img.write_to(&mut Cursor::new(&mut origin_png), ImageFormat::Png)
            .map_err(|e| Error::Internal(format!("PNG encode failed for {}: {}", key, e)))?;

        // Fresh sub-directory per entry; never reused across source URLs.
        let folder = Uuid::new_v4().to_string();
        let dir = self.cache_root().await.join(&folder);

        // Best-effort writes: a partial entry costs a re-download, and the
        // index flush below still protects earlier entries.
        if let Err(e) = fs::create_dir_all(&dir).await {
            warn!("Failed to create cache entry dir {}: {}", dir.display(), e);
        }
        if let Err(e) = fs::write(dir.join(PREVIEW_FILE), &preview_png).await {
            warn!("Failed to write preview for {}: {}", key, e);
        }
        if let Err(e) = fs::write(dir.join(ORIGIN_FILE), &origin_png).await {
            warn!("Failed to write original for {}: {}", key, e);
        }

        let entry = CacheEntry {
            preview: format!("/{}/{}", folder, PREVIEW_FILE),
            origin: format!("/{}/{}", folder, ORIGIN_FILE),
        };
        self.index.insert(key.as_str().to_string(), entry.clone());
        self.persist_index().await;

        Ok(entry)
    }

    async fn cache_root(&self) -> PathBuf {
        if let Err(e) = fs::create_dir_all(&self.root).await {
            warn!("Failed to create cache root {}: {}", self.root.display(), e);
        }
        self.root.clone()
    }

    async fn reset(&mut self) {
        self.index.clear();
        if let Err(e) = fs::remove_dir_all(&self.root).await {
            debug!("Cache root {} not removed: {}", self.root.display(), e);
        }
    }

    async fn ensure_index_file(&self) {
        let path = self.cache_root().await.join(INDEX_FILE);
        if fs::try_exists(&path).await.unwrap_or(false) {
            return;
        }
        if let Err(e) = fs::write(&path, "{}").await {
            warn!("Failed to create cache index {}: {}", path.display(), e);
        }
    }
}
