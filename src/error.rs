//! Error types for pixcache
//!
//! All modules use `Result<T>` as their return type. Only transport and
//! decode failures abort a fetch batch; persistence failures degrade to
//! logged best-effort branches at their call sites.

use thiserror::Error;

/// Result type alias for cache and fetch operations
pub type Result<T> = std::result::Result<T, Error>;

/// All errors that can occur in pixcache
#[derive(Error, Debug)]
pub enum Error {
    // Transport errors
    #[error("Download failed for {url}: {reason}")]
    Transport { url: String, reason: String },

    // Decode errors
    #[error("Response body for {url} is not a decodable image")]
    Decode { url: String },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a transport error for a failed download
    pub fn transport(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error came from the network layer
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}
