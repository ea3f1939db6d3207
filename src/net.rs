//! HTTP transport for manifest and image downloads
//!
//! The orchestrator only sees the [`ImageTransport`] trait; the real
//! implementation is a `reqwest` client with a per-request timeout so no
//! download can hang a fetch session indefinitely.

use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};

/// Abstract byte transport for remote resources
#[async_trait]
pub trait ImageTransport: Send + Sync {
    /// Download the full response body at `url`
    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>>;
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageTransport for HttpTransport {
    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| Error::transport(url.as_str(), e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::transport(url.as_str(), format!("HTTP status {}", status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::transport(url.as_str(), e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
