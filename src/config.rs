//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{CacheError, Result};

/// Server configuration parameters.
///
/// Read once at startup and immutable afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of blobs the in-memory cache can hold
    pub cache_entries: usize,
    /// Maximum total bytes held by the in-memory cache
    pub cache_memory: u64,
    /// Root directory of the blob store
    pub storage_dir: PathBuf,
    /// Prefix prepended to every blob key
    pub storage_prefix: String,
    /// Largest accepted upload in bytes
    pub max_blob_size: usize,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// Unset variables fall back to the defaults; a variable that is set but
    /// cannot be parsed is a configuration error.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum cached blobs (default: 100)
    /// - `CACHE_MEMORY` - Maximum cached bytes (default: 5242880)
    /// - `STORAGE_DIR` - Blob store root directory (default: ./data)
    /// - `STORAGE_PREFIX` - Key prefix (default: empty)
    /// - `MAX_BLOB_SIZE` - Upload limit in bytes (default: 10485760)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            cache_entries: parse_var("CACHE_MAX_ENTRIES", defaults.cache_entries)?,
            cache_memory: parse_var("CACHE_MEMORY", defaults.cache_memory)?,
            storage_dir: env::var("STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_dir),
            storage_prefix: env::var("STORAGE_PREFIX").unwrap_or(defaults.storage_prefix),
            max_blob_size: parse_var("MAX_BLOB_SIZE", defaults.max_blob_size)?,
            server_port: parse_var("SERVER_PORT", defaults.server_port)?,
        })
    }

    /// Checks limits that would make the server unusable.
    pub fn validate(&self) -> Result<()> {
        if self.cache_entries == 0 {
            return Err(CacheError::InvalidConfig(
                "CACHE_MAX_ENTRIES must be greater than 0".to_string(),
            ));
        }
        if self.max_blob_size == 0 {
            return Err(CacheError::InvalidConfig(
                "MAX_BLOB_SIZE must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_entries: 100,
            cache_memory: 5 * 1024 * 1024,
            storage_dir: PathBuf::from("./data"),
            storage_prefix: String::new(),
            max_blob_size: 10 * 1024 * 1024,
            server_port: 3000,
        }
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            CacheError::InvalidConfig(format!("{} has an invalid value: {:?}", name, raw))
        }),
        Err(_) => Ok(default),
    }
}
