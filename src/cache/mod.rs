//! Cache Module
//!
//! Provides a bounded in-memory blob cache with CLOCK (second-chance)
//! eviction, limited by entry count and by total bytes.

mod entry;
mod ring;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub(crate) use entry::CacheEntry;
pub(crate) use ring::ClockRing;
pub use stats::CacheStats;
pub use store::{Admission, BlobCache};
