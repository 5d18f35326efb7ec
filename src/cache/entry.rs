//! Cache Entry Module
//!
//! Defines a single cached blob together with its CLOCK reference bit.

use std::sync::Arc;

// == Cache Entry ==
/// A cached blob stored in one ring slot.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Key the entry is indexed under
    pub key: String,
    /// The blob bytes, shared with readers
    pub value: Arc<[u8]>,
    /// Byte length of `value`
    pub size: u64,
    /// Reference bit consulted by the eviction scan
    pub referenced: bool,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry with its reference bit clear.
    ///
    /// A fresh entry has to be read again before the scan gives it a
    /// second chance.
    pub fn new(key: String, value: Arc<[u8]>) -> Self {
        let size = value.len() as u64;
        Self {
            key,
            value,
            size,
            referenced: false,
        }
    }

    // == Replace ==
    /// Swaps in a new value, marks the entry referenced and returns the
    /// previous size.
    pub fn replace(&mut self, value: Arc<[u8]>) -> u64 {
        let old_size = self.size;
        self.size = value.len() as u64;
        self.value = value;
        self.referenced = true;
        old_size
    }

    // == Touch ==
    /// Marks the entry as recently used.
    pub fn touch(&mut self) {
        self.referenced = true;
    }
}
