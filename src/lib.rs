//! Pixcache - disk-backed image cache for gallery clients
//!
//! Fetches a remote manifest of image URLs, downloads each image exactly
//! once, persists a full-resolution copy plus a 150x150 preview, and
//! serves repeat requests from local storage through a durable path index.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod library;
pub mod net;

pub use cache::{CacheEntry, CachePolicy, DiskCacheStore, PathIndex};
pub use config::FetchConfig;
pub use error::{Error, Result};
pub use fetch::ImageFetcher;
pub use library::{ImageLibrary, ResolvedImage};
pub use net::{HttpTransport, ImageTransport};
