//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the LRU against a simple reference model and the
//! read-through behaviour of groups.

use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::cache::{ByteView, LruCache};
use crate::group::{GetterFn, Group};
use crate::ring::HashRing;

// == Test Configuration ==
const TEST_MAX_BYTES: usize = 64;

// == Strategies ==
/// Generates short keys so that updates of existing keys are common
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-e]{1,3}".prop_map(|s| s)
}

/// Generates values, occasionally larger than the whole budget
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9]{0,70}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum LruOp {
    Add { key: String, value: String },
    Get { key: String },
    RemoveOldest,
}

fn lru_op_strategy() -> impl Strategy<Value = LruOp> {
    prop_oneof![
        3 => (key_strategy(), value_strategy())
            .prop_map(|(key, value)| LruOp::Add { key, value }),
        2 => key_strategy().prop_map(|key| LruOp::Get { key }),
        1 => Just(LruOp::RemoveOldest),
    ]
}

// == Reference Model ==
/// Recency list, most recent first, with the same budget rules.
#[derive(Default)]
struct Model {
    entries: Vec<(String, String)>,
}

impl Model {
    fn bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    fn add(&mut self, key: String, value: String, max_bytes: usize) {
        if max_bytes != 0 && key.len() + value.len() > max_bytes {
            return;
        }
        self.entries.retain(|(k, _)| *k != key);
        self.entries.insert(0, (key, value));
        while max_bytes != 0 && self.bytes() > max_bytes {
            self.entries.pop();
        }
    }

    fn get(&mut self, key: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        let entry = self.entries.remove(pos);
        let value = entry.1.clone();
        self.entries.insert(0, entry);
        Some(value)
    }

    fn remove_oldest(&mut self) -> Option<String> {
        self.entries.pop().map(|(k, _)| k)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any sequence of operations, the LRU agrees with the reference model
    // on every returned value, on the evicted keys, and on usage.
    #[test]
    fn prop_lru_matches_model(ops in prop::collection::vec(lru_op_strategy(), 1..80)) {
        let mut lru = LruCache::new(TEST_MAX_BYTES);
        let mut model = Model::default();

        for op in ops {
            match op {
                LruOp::Add { key, value } => {
                    lru.add(key.clone(), ByteView::from(value.as_str()));
                    model.add(key, value, TEST_MAX_BYTES);
                }
                LruOp::Get { key } => {
                    let got = lru.get(&key).map(|v| v.to_string());
                    prop_assert_eq!(got, model.get(&key));
                }
                LruOp::RemoveOldest => {
                    let evicted = lru.remove_oldest().map(|(k, _)| k);
                    prop_assert_eq!(evicted, model.remove_oldest());
                }
            }

            prop_assert!(lru.bytes_used() <= TEST_MAX_BYTES);
            prop_assert_eq!(lru.bytes_used(), model.bytes());
            prop_assert_eq!(lru.len(), model.entries.len());
        }
    }

    // Adding an entry larger than the budget leaves the cache untouched.
    #[test]
    fn prop_oversized_add_is_noop(
        seed in prop::collection::vec((key_strategy(), "[a-z]{0,8}"), 0..10),
        extra in 1usize..32,
    ) {
        let mut lru = LruCache::new(TEST_MAX_BYTES);
        for (key, value) in seed {
            lru.add(key, ByteView::from(value.as_str()));
        }
        let (len, bytes) = (lru.len(), lru.bytes_used());

        let big = "x".repeat(TEST_MAX_BYTES + extra);
        lru.add("big", ByteView::from(big.as_str()));

        prop_assert_eq!(lru.len(), len);
        prop_assert_eq!(lru.bytes_used(), bytes);
        prop_assert!(!lru.contains("big"));
    }

    // Ring size is replicas * nodes, points are sorted, lookups are stable.
    #[test]
    fn prop_ring_sizing_and_determinism(
        nodes in prop::collection::hash_set("[a-z]{3,8}", 1..6),
        replicas in 1usize..60,
        keys in prop::collection::vec("[a-zA-Z0-9]{1,12}", 1..20),
    ) {
        let mut ring = HashRing::new(replicas);
        ring.add(&nodes);

        prop_assert_eq!(ring.len(), replicas * nodes.len());
        prop_assert!(ring.points().windows(2).all(|w| w[0] <= w[1]));
        for key in keys {
            let owner = ring.get(&key);
            prop_assert!(owner.is_some_and(|o| nodes.contains(o)));
            prop_assert_eq!(ring.get(&key), owner);
        }
    }

    // With an unbounded cache, each distinct key is loaded exactly once no
    // matter how often it is requested.
    #[test]
    fn prop_read_through_loads_each_key_once(
        keys in prop::collection::vec(key_strategy(), 1..40),
    ) {
        let loads: Arc<Mutex<HashMap<String, usize>>> = Arc::default();
        let total = Arc::new(AtomicUsize::new(0));
        let (sink, counter) = (loads.clone(), total.clone());
        let group = Group::builder("prop")
            .getter(GetterFn::new(move |key| {
                *sink.lock().unwrap().entry(key.to_string()).or_default() += 1;
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(key.to_uppercase().into_bytes())
            }))
            .build()
            .unwrap();

        for key in &keys {
            let value = tokio_test::block_on(group.get(key)).unwrap();
            prop_assert_eq!(value.to_string(), key.to_uppercase());
        }

        let distinct: std::collections::HashSet<_> = keys.iter().collect();
        prop_assert_eq!(total.load(Ordering::SeqCst), distinct.len());
        prop_assert!(loads.lock().unwrap().values().all(|&n| n == 1));
        prop_assert_eq!(group.stats().cache_hits as usize, keys.len() - distinct.len());
    }
}

