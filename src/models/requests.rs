//! Request DTOs for the blob server API
//!
//! Defines the query parameters accepted by the blob endpoints.

use serde::Deserialize;

/// Query string for `GET /blobs/*key` and `PUT /blobs/*key`
///
/// # Fields
/// - `nocache`: bypass the in-memory cache for this request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlobQuery {
    /// Skip the cache entirely
    #[serde(default)]
    pub nocache: bool,
}

impl BlobQuery {
    /// Whether the request should go through the cache
    pub fn use_cache(&self) -> bool {
        !self.nocache
    }
}
