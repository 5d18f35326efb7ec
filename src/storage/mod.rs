//! Storage Module
//!
//! Read-through / write-through facade putting the bounded [`BlobCache`] in
//! front of the authoritative blob store.

mod fs;
mod key;

use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::{Admission, BlobCache, CacheStats};
use crate::config::Config;
use crate::error::{CacheError, Result};

pub use fs::FsBlobStore;
pub use key::{validate_key, MAX_KEY_LENGTH};

// == Fetched Blob ==
/// A blob returned by [`BlobStorage::get`].
#[derive(Debug, Clone)]
pub struct FetchedBlob {
    /// The blob bytes
    pub data: Arc<[u8]>,
    /// Whether the bytes came from the in-memory cache
    pub from_cache: bool,
}

// == Blob Storage ==
/// Blob store with an in-memory cache in front of it.
#[derive(Debug)]
pub struct BlobStorage {
    store: FsBlobStore,
    cache: BlobCache,
    /// Prepended to every key before store and cache access
    prefix: String,
}

impl BlobStorage {
    /// Creates a facade from already constructed parts.
    pub fn new(store: FsBlobStore, cache: BlobCache, prefix: impl Into<String>) -> Self {
        Self {
            store,
            cache,
            prefix: prefix.into(),
        }
    }

    // == Open ==
    /// Builds the cache and opens the store described by `config`.
    ///
    /// # Errors
    /// Fails on a zero cache capacity, an unusable key prefix or a storage
    /// directory that cannot be created.
    pub async fn open(config: &Config) -> Result<Self> {
        let cache = BlobCache::new(config.cache_entries, config.cache_memory)?;

        let prefix = config.storage_prefix.trim_end_matches('/');
        if !prefix.is_empty() {
            validate_key(prefix).map_err(|e| {
                CacheError::InvalidConfig(format!("STORAGE_PREFIX is not usable: {}", e))
            })?;
        }

        let store = FsBlobStore::open(&config.storage_dir).await?;
        info!(
            capacity = config.cache_entries,
            mem_limit = config.cache_memory,
            prefix = %config.storage_prefix,
            "Blob storage ready"
        );

        Ok(Self::new(store, cache, config.storage_prefix.clone()))
    }

    // == Get ==
    /// Fetches a blob.
    ///
    /// With `use_cache` the cache is consulted first and a store read
    /// populates it; without it the cache is neither read nor filled.
    /// Returns None if the blob does not exist.
    pub async fn get(&self, key: &str, use_cache: bool) -> Result<Option<FetchedBlob>> {
        let full_key = self.full_key(key)?;

        if use_cache {
            if let Some(data) = self.cache.get(&full_key) {
                return Ok(Some(FetchedBlob {
                    data,
                    from_cache: true,
                }));
            }
        }

        let Some(data) = self.store.read(&full_key).await? else {
            return Ok(None);
        };
        let data: Arc<[u8]> = Arc::from(data);

        if use_cache {
            self.admit(full_key, Arc::clone(&data));
        }

        Ok(Some(FetchedBlob {
            data,
            from_cache: false,
        }))
    }

    // == Put ==
    /// Writes a blob to the store and, with `use_cache`, into the cache.
    ///
    /// Without `use_cache` any cached copy of the key is dropped, so later
    /// cached reads never serve the replaced bytes.
    ///
    /// Returns the number of bytes written.
    pub async fn put(&self, key: &str, data: Vec<u8>, use_cache: bool) -> Result<u64> {
        let full_key = self.full_key(key)?;
        let size = data.len() as u64;

        self.store.write(&full_key, &data).await?;

        if use_cache {
            self.admit(full_key, Arc::from(data));
        } else if self.cache.invalidate(&full_key) {
            debug!(key = %full_key, "Dropped cached copy after uncached write");
        }

        Ok(size)
    }

    /// Cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn cache(&self) -> &BlobCache {
        &self.cache
    }

    pub fn store(&self) -> &FsBlobStore {
        &self.store
    }

    fn full_key(&self, key: &str) -> Result<String> {
        validate_key(key)?;
        let full_key = format!("{}{}", self.prefix, key);
        validate_key(&full_key)?;
        Ok(full_key)
    }

    fn admit(&self, full_key: String, data: Arc<[u8]>) {
        if self.cache.set(full_key.as_str(), data) == Admission::Rejected {
            debug!(key = %full_key, "Blob served without caching");
        }
    }
}
