//! API Handlers
//!
//! HTTP request handlers for each blob server endpoint.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{rejection::BytesRejection, Path, Query, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{BlobQuery, HealthResponse, PutResponse, StatsResponse};
use crate::storage::BlobStorage;

const X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// Application state shared across all handlers.
///
/// The storage facade owns the cache; handlers only reach it through the
/// facade.
#[derive(Clone)]
pub struct AppState {
    /// Blob storage with its in-memory cache
    pub storage: Arc<BlobStorage>,
    /// Largest accepted upload in bytes
    pub max_blob_size: usize,
    /// Server start time, for uptime reporting
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Creates a new AppState around an opened storage facade.
    pub fn new(storage: BlobStorage, max_blob_size: usize) -> Self {
        Self {
            storage: Arc::new(storage),
            max_blob_size,
            started_at: Utc::now(),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Opens the blob store and builds the cache with the configured limits.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let storage = BlobStorage::open(config).await?;
        Ok(Self::new(storage, config.max_blob_size))
    }
}

/// Handler for GET /blobs/*key
///
/// Returns the raw blob bytes. The `x-cache` header reports `HIT`, `MISS`
/// or `BYPASS` (with `?nocache=true`). The response body shares the cached
/// buffer instead of copying it.
pub async fn get_blob_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<BlobQuery>,
) -> Result<Response> {
    let key = key.trim_start_matches('/');
    let use_cache = query.use_cache();

    let blob = state
        .storage
        .get(key, use_cache)
        .await?
        .ok_or_else(|| CacheError::NotFound(key.to_string()))?;

    let cache_status = match (use_cache, blob.from_cache) {
        (false, _) => "BYPASS",
        (true, true) => "HIT",
        (true, false) => "MISS",
    };

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream"),
            (X_CACHE, cache_status),
        ],
        Body::from(Bytes::from_owner(blob.data)),
    )
        .into_response())
}

/// Handler for PUT /blobs/*key
///
/// Stores the raw request body under the key.
pub async fn put_blob_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<BlobQuery>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<PutResponse>> {
    let key = key.trim_start_matches('/');

    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            CacheError::PayloadTooLarge(format!(
                "Blob exceeds maximum size of {} bytes",
                state.max_blob_size
            ))
        } else {
            CacheError::InvalidRequest(rejection.body_text())
        }
    })?;

    let size = state
        .storage
        .put(key, body.to_vec(), query.use_cache())
        .await?;
    info!(key, size, "Blob stored");

    Ok(Json(PutResponse::new(key, size)))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.storage.stats()))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.started_at))
}
