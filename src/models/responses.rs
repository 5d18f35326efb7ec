//! Response DTOs for the blob server API
//!
//! Defines the structure of outgoing JSON response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for a blob upload (PUT /blobs/*key)
#[derive(Debug, Clone, Serialize)]
pub struct PutResponse {
    /// Success message
    pub message: String,
    /// The key that was written
    pub key: String,
    /// Number of bytes stored
    pub size: u64,
}

impl PutResponse {
    /// Creates a new PutResponse
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        let key = key.into();
        Self {
            message: format!("Blob '{}' stored successfully", key),
            key,
            size,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of evictions
    pub evictions: u64,
    /// Number of blobs too large to cache
    pub rejections: u64,
    /// Current number of cached blobs
    pub total_entries: usize,
    /// Current cached bytes
    pub mem_used: u64,
    /// Maximum number of cached blobs
    pub capacity: usize,
    /// Maximum cached bytes
    pub mem_limit: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            rejections: stats.rejections,
            total_entries: stats.total_entries,
            mem_used: stats.mem_used,
            capacity: stats.capacity,
            mem_limit: stats.mem_limit,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Seconds since the server started
    pub uptime_secs: u64,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(started_at: chrono::DateTime<chrono::Utc>) -> Self {
        let now = chrono::Utc::now();
        Self {
            status: "healthy".to_string(),
            timestamp: now.to_rfc3339(),
            uptime_secs: (now - started_at).num_seconds().max(0) as u64,
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
