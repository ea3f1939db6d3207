//! Fetch session configuration
//!
//! The manifest URL is injected by the embedding application; nothing is
//! hard-coded. The per-request timeout bounds both the manifest download
//! and each image download.

use std::time::Duration;
use url::Url;

/// Default per-request timeout for manifest and image downloads
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for a fetch session
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Remote plain-text manifest listing one image URL per line
    pub manifest_url: Url,

    /// Timeout applied to every outgoing request
    pub request_timeout: Duration,
}

impl FetchConfig {
    /// Create a config with the default request timeout
    pub fn new(manifest_url: Url) -> Self {
        Self {
            manifest_url,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Override the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
