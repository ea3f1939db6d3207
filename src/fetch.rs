//! Fetch orchestration: manifest parsing and the per-URL hit/miss cycle
//!
//! URLs are processed strictly in input order, one at a time. The cache's
//! load-mutate-persist cycle assumes a single writer, so downloads are
//! never fanned out in parallel within a session.

use tracing::{debug, info, warn};
use url::Url;

use crate::cache::{CacheEntry, CachePolicy};
use crate::config::FetchConfig;
use crate::error::Result;
use crate::net::ImageTransport;

/// Parse a manifest body: one absolute URL per line, CRLF-delimited.
///
/// Only well-formed `https` URLs are kept, in file order; every other
/// line is dropped without error.
pub fn parse_manifest(text: &str) -> Vec<Url> {
    text.split("\r\n")
        .filter_map(|line| Url::parse(line).ok())
        .filter(|url| url.scheme() == "https")
        .collect()
}

/// Downloads each image once and serves repeats from the injected cache
pub struct ImageFetcher<T, C> {
    transport: T,
    cache: C,
    config: FetchConfig,
}

impl<T: ImageTransport, C: CachePolicy> ImageFetcher<T, C> {
    /// Orchestrator over an explicit transport and cache; nothing global
    pub fn new(transport: T, cache: C, config: FetchConfig) -> Self {
        Self {
            transport,
            cache,
            config,
        }
    }

    /// Read-only access to the cache policy
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Download and parse the remote manifest
    pub async fn fetch_image_url_list(&self) -> Result<Vec<Url>> {
        let body = self.transport.fetch_bytes(&self.config.manifest_url).await?;
        let urls = parse_manifest(&String::from_utf8_lossy(&body));
        debug!("Manifest listed {} image urls", urls.len());
        Ok(urls)
    }

    /// Resolve every URL to a cache entry, downloading on misses.
    ///
    /// The index is loaded once at the start of the call. Both transport
    /// and decode failures abort the whole batch; no partial list escapes
    /// through the error path.
    pub async fn fetch_images(&mut self, urls: &[Url]) -> Result<Vec<CacheEntry>> {
        self.cache.load_index().await;

        let mut entries = Vec::with_capacity(urls.len());
        for url in urls {
            if self.cache.is_cached(url) {
                debug!("Cache hit for {}", url);
                if let Some(entry) = self.cache.entry(url) {
                    entries.push(entry);
                }
                continue;
            }

            debug!("Cache miss for {}, downloading", url);
            let bytes = self.transport.fetch_bytes(url).await?;
            let entry = self.cache.store_image(&bytes, url).await?;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Clear the cache, then re-run the manifest fetch and image fetch.
    ///
    /// Best-effort restart: any failure in the pipeline yields an empty
    /// list instead of an error.
    pub async fn refresh_images(&mut self) -> Vec<CacheEntry> {
        self.cache.reset().await;
        self.cache.ensure_index_file().await;

        let urls = match self.fetch_image_url_list().await {
            Ok(urls) => urls,
            Err(e) => {
                warn!("Refresh aborted while fetching manifest: {}", e);
                return Vec::new();
            }
        };
        match self.fetch_images(&urls).await {
            Ok(entries) => {
                info!("Refreshed cache with {} entries", entries.len());
                entries
            }
            Err(e) => {
                warn!("Refresh aborted while fetching images: {}", e);
                Vec::new()
            }
        }
    }
}
