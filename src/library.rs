//! Consumer-facing image library
//!
//! The embedding UI calls [`ImageLibrary::load`] or
//! [`ImageLibrary::refresh`] and re-reads [`ImageLibrary::images`]
//! afterwards. A session mutex keeps at most one fetch cycle in flight at
//! a time; the cache's index file is not safe for concurrent writers.

use std::path::PathBuf;
use std::sync::RwLock;
use tokio::sync::Mutex;
use tracing::info;

use crate::cache::{CachePolicy, DiskCacheStore};
use crate::config::FetchConfig;
use crate::error::Result;
use crate::fetch::ImageFetcher;
use crate::net::{HttpTransport, ImageTransport};

/// Absolute paths for one cached image, ready to load from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    /// Full path to the 150x150 preview
    pub preview: PathBuf,

    /// Full path to the full-resolution original
    pub origin: PathBuf,
}

/// Image list shared between the fetch subsystem and the UI layer
pub struct ImageLibrary<T, C> {
    fetcher: Mutex<ImageFetcher<T, C>>,
    images: RwLock<Vec<ResolvedImage>>,
}

impl ImageLibrary<HttpTransport, DiskCacheStore> {
    /// Library wired to the real HTTP transport and the platform cache dir
    pub fn open(config: FetchConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.request_timeout)?;
        let fetcher = ImageFetcher::new(transport, DiskCacheStore::new(), config);
        Ok(Self::new(fetcher))
    }
}

impl<T: ImageTransport, C: CachePolicy> ImageLibrary<T, C> {
    /// Library over an explicitly wired fetcher
    pub fn new(fetcher: ImageFetcher<T, C>) -> Self {
        Self {
            fetcher: Mutex::new(fetcher),
            images: RwLock::new(Vec::new()),
        }
    }

    /// Fetch the manifest and publish the resolved image list, serving
    /// cached URLs from disk.
    ///
    /// On failure the error is surfaced and the previously published list
    /// is left untouched.
    pub async fn load(&self) -> Result<()> {
        let mut fetcher = self.fetcher.lock().await;

        let urls = fetcher.fetch_image_url_list().await?;
        let entries = fetcher.fetch_images(&urls).await?;
        let root = fetcher.cache().cache_root().await;

        let resolved: Vec<ResolvedImage> = entries
            .iter()
            .map(|entry| ResolvedImage {
                preview: entry.full_preview(&root),
                origin: entry.full_origin(&root),
            })
            .collect();

        info!("Loaded {} images", resolved.len());
        *self.images.write().unwrap() = resolved;
        Ok(())
    }

    /// Clear the cache and rebuild the list from scratch.
    ///
    /// Best-effort: a failure anywhere leaves an empty list, never an
    /// error.
    pub async fn refresh(&self) {
        let mut fetcher = self.fetcher.lock().await;

        let entries = fetcher.refresh_images().await;
        let root = fetcher.cache().cache_root().await;

        let resolved: Vec<ResolvedImage> = entries
            .iter()
            .map(|entry| ResolvedImage {
                preview: entry.full_preview(&root),
                origin: entry.full_origin(&root),
            })
            .collect();

        *self.images.write().unwrap() = resolved;
    }

    /// Snapshot of the currently published image list
    pub fn images(&self) -> Vec<ResolvedImage> {
        self.images.read().unwrap().clone()
    }
}
