//! Blob Cache - blob storage front with a bounded in-memory cache
//!
//! Serves binary blobs from a directory store through a CLOCK cache limited
//! both by entry count and by total bytes.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;

pub use api::AppState;
pub use cache::BlobCache;
pub use config::Config;
pub use storage::BlobStorage;
