//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache bounds, accounting and CLOCK behavior
//! over arbitrary operation sequences.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

use crate::cache::{Admission, BlobCache};

// == Strategies ==
/// Generates keys from a small alphabet so sequences revisit keys often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-h]{1,2}"
}

/// Generates blob payloads, including empty ones
fn blob_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..64)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: Vec<u8> },
    Get { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => (key_strategy(), blob_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        2 => key_strategy().prop_map(|key| CacheOp::Get { key }),
    ]
}

fn unique(keys: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    keys.into_iter().filter(|k| seen.insert(k.clone())).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // After every operation the entry count and aggregate bytes stay within
    // their limits, and index, ring and byte counter agree.
    #[test]
    fn prop_bounds_hold_after_every_op(
        capacity in 1usize..12,
        mem_limit in 0u64..256,
        ops in prop::collection::vec(cache_op_strategy(), 1..80)
    ) {
        let cache = BlobCache::new(capacity, mem_limit).unwrap();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    let oversized = value.len() as u64 > mem_limit;
                    let admission = cache.set(key, value);
                    prop_assert_eq!(admission == Admission::Rejected, oversized);
                }
                CacheOp::Get { key } => {
                    let _ = cache.get(&key);
                }
            }

            prop_assert!(cache.len() <= capacity);
            prop_assert!(cache.mem_used() <= mem_limit);
            cache.assert_consistent();
        }
    }

    // A freshly admitted key is readable right after its insert, with the
    // exact bytes that were written.
    #[test]
    fn prop_get_after_insert(
        capacity in 1usize..8,
        ops in prop::collection::vec(cache_op_strategy(), 1..60),
        key in "[x-z]{3}",
        value in blob_strategy()
    ) {
        let cache = BlobCache::new(capacity, 128).unwrap();
        for op in ops {
            if let CacheOp::Set { key, value } = op {
                cache.set(key, value);
            }
        }

        prop_assert_eq!(cache.set(key.clone(), value.clone()), Admission::Stored);
        let cached = cache.get(&key);
        prop_assert_eq!(cached.as_deref(), Some(&value[..]));
    }

    // Keys never written are never found.
    #[test]
    fn prop_unknown_key_misses(
        ops in prop::collection::vec(cache_op_strategy(), 0..40),
        unknown in "[0-9]{1,4}"
    ) {
        let cache = BlobCache::new(8, 512).unwrap();
        for op in ops {
            if let CacheOp::Set { key, value } = op {
                cache.set(key, value);
            }
        }

        prop_assert!(cache.get(&unknown).is_none());
    }

    // Writing the same value twice does not double count.
    #[test]
    fn prop_repeated_set_is_idempotent(
        capacity in 1usize..8,
        ops in prop::collection::vec(cache_op_strategy(), 0..40),
        key in key_strategy(),
        value in blob_strategy()
    ) {
        let cache = BlobCache::new(capacity, 200).unwrap();
        for op in ops {
            if let CacheOp::Set { key, value } = op {
                cache.set(key, value);
            }
        }

        cache.set(key.clone(), value.clone());
        // An update that overshoots the byte limit may sweep out the key itself.
        prop_assume!(cache.contains(&key));
        let len = cache.len();
        let used = cache.mem_used();

        cache.set(key.clone(), value);

        prop_assert_eq!(cache.len(), len);
        prop_assert_eq!(cache.mem_used(), used);
    }

    // Replacing a value moves the byte counter by the size difference only.
    #[test]
    fn prop_update_adjusts_by_delta(
        key in key_strategy(),
        first in blob_strategy(),
        second in blob_strategy()
    ) {
        let cache = BlobCache::new(4, 1024).unwrap();
        cache.set("other", vec![0u8; 10]);

        cache.set(key.clone(), first.clone());
        let before = cache.mem_used() as i64;
        cache.set(key.clone(), second.clone());
        let after = cache.mem_used() as i64;

        prop_assert_eq!(after - before, second.len() as i64 - first.len() as i64);
    }

    // With a full cache, a key read before the next insert survives it and
    // exactly one untouched key is evicted.
    #[test]
    fn prop_referenced_key_gets_second_chance(
        keys in prop::collection::vec("[a-z]{2,6}", 2..10),
        new_key in "[A-Z]{2,6}"
    ) {
        let keys = unique(keys);
        prop_assume!(keys.len() >= 2);

        let capacity = keys.len();
        let cache = BlobCache::new(capacity, 10_000).unwrap();
        for key in &keys {
            cache.set(key.clone(), key.as_bytes().to_vec());
        }

        let first = &keys[0];
        prop_assert!(cache.get(first).is_some());

        cache.set(new_key.clone(), vec![1u8; 4]);

        prop_assert!(cache.contains(first), "referenced key '{}' was evicted", first);
        prop_assert!(cache.contains(&new_key));
        prop_assert!(!cache.contains(&keys[1]), "next key in ring order should go");
        prop_assert_eq!(cache.len(), capacity);
    }

    // Concurrent readers always see a complete value.
    #[test]
    fn prop_concurrent_reads_never_torn(
        ops in prop::collection::vec((key_strategy(), 1usize..48), 10..60)
    ) {
        let cache = Arc::new(BlobCache::new(6, 160).unwrap());

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let cache = Arc::clone(&cache);
                let ops = ops.clone();
                std::thread::spawn(move || {
                    for (i, (key, len)) in ops.into_iter().enumerate() {
                        if (i + t) % 2 == 0 {
                            cache.set(key, vec![len as u8; len]);
                        } else if let Some(value) = cache.get(&key) {
                            assert_eq!(value.len(), value[0] as usize);
                            assert!(value.iter().all(|&b| b == value[0]));
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            prop_assert!(handle.join().is_ok());
        }
        cache.assert_consistent();
    }
}
