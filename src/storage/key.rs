//! Blob key validation.

use crate::error::{CacheError, Result};

/// Maximum allowed key length in bytes (prefix included)
pub const MAX_KEY_LENGTH: usize = 256;

/// Checks that a key is usable both as a cache key and as a relative path.
///
/// Keys are `/`-separated segments. Segments must be non-empty and must not
/// start with `.`, which also rules out `.` and `..`. Dot-prefixed names are
/// reserved for the store's temporary upload files.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidRequest("Key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidRequest(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    if key.contains(['\\', '\0']) {
        return Err(CacheError::InvalidRequest(
            "Key contains a forbidden character".to_string(),
        ));
    }
    if key
        .split('/')
        .any(|segment| segment.is_empty() || segment.starts_with('.'))
    {
        return Err(CacheError::InvalidRequest(format!(
            "Key '{}' has an empty or dot-prefixed segment",
            key
        )));
    }
    Ok(())
}
