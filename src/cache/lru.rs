//! LRU Cache Module
//!
//! Byte-budgeted Least Recently Used store used as each group's local cache.

use std::collections::HashMap;
use std::fmt;

use crate::cache::Weighted;

/// Callback invoked with every entry evicted by the budget.
pub type OnEvicted<V> = Box<dyn FnMut(&str, &V) + Send>;

#[derive(Debug)]
struct Node<V> {
    /// `None` while the slot sits on the free list
    entry: Option<(String, V)>,
    prev: Option<usize>,
    next: Option<usize>,
}

// == LRU Cache ==
/// A key/value store that evicts least recently used entries once the
/// combined size of keys and values exceeds `max_bytes`.
///
/// Entries live in a slot arena threaded by a doubly linked list:
/// - Head = Most recently used
/// - Tail = Least recently used
///
/// A `max_bytes` of zero means unbounded. Not synchronized; callers must
/// serialize access.
pub struct LruCache<V> {
    max_bytes: usize,
    n_bytes: usize,
    nodes: Vec<Node<V>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    index: HashMap<String, usize>,
    on_evicted: Option<OnEvicted<V>>,
}

impl<V: Weighted> LruCache<V> {
    // == Constructor ==
    /// Creates an empty cache holding at most `max_bytes` of keys and values.
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            n_bytes: 0,
            nodes: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            index: HashMap::new(),
            on_evicted: None,
        }
    }

    /// Creates an empty cache that reports every eviction to `on_evicted`.
    pub fn with_on_evicted(max_bytes: usize, on_evicted: OnEvicted<V>) -> Self {
        Self {
            on_evicted: Some(on_evicted),
            ..Self::new(max_bytes)
        }
    }

    // == Add ==
    /// Inserts or updates `key`, making it the most recently used entry.
    ///
    /// An entry larger than the whole budget is dropped without touching the
    /// cache. After the write, least recently used entries are evicted until
    /// usage fits the budget again.
    pub fn add(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        let new_weight = value.weight();
        if self.max_bytes != 0 && key.len() + new_weight > self.max_bytes {
            return;
        }

        if let Some(&idx) = self.index.get(&key) {
            self.move_to_front(idx);
            if let Some((_, slot)) = self.nodes[idx].entry.as_mut() {
                let old = std::mem::replace(slot, value);
                self.n_bytes -= old.weight();
                self.n_bytes += new_weight;
            }
        } else {
            self.n_bytes += key.len() + new_weight;
            let idx = self.alloc(key.clone(), value);
            self.attach_front(idx);
            self.index.insert(key, idx);
        }

        while self.max_bytes != 0 && self.n_bytes > self.max_bytes {
            if self.remove_oldest().is_none() {
                break;
            }
        }
    }

    // == Get ==
    /// Looks up `key` and promotes it to most recently used on a hit.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.move_to_front(idx);
        self.nodes[idx].entry.as_ref().map(|(_, value)| value)
    }

    // == Remove Oldest ==
    /// Evicts the least recently used entry and returns it.
    ///
    /// The eviction callback, if any, sees the entry before it is returned.
    pub fn remove_oldest(&mut self) -> Option<(String, V)> {
        let idx = self.tail?;
        self.detach(idx);
        let (key, value) = self.nodes[idx].entry.take()?;
        self.free.push(idx);
        self.index.remove(&key);
        self.n_bytes -= key.len() + value.weight();

        if let Some(on_evicted) = self.on_evicted.as_mut() {
            on_evicted(&key, &value);
        }
        Some((key, value))
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without touching recency.
    pub fn peek_oldest(&self) -> Option<&str> {
        let idx = self.tail?;
        self.nodes[idx].entry.as_ref().map(|(key, _)| key.as_str())
    }

    /// Checks for `key` without touching recency.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns the combined size of all keys and values.
    pub fn bytes_used(&self) -> usize {
        self.n_bytes
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    // == List Plumbing ==
    fn alloc(&mut self, key: String, value: V) -> usize {
        let node = Node {
            entry: Some((key, value)),
            prev: None,
            next: None,
        };
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head != Some(idx) {
            self.detach(idx);
            self.attach_front(idx);
        }
    }

    fn detach(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => self.tail = prev,
        }
        self.nodes[idx].prev = None;
        self.nodes[idx].next = None;
    }

    fn attach_front(&mut self, idx: usize) {
        self.nodes[idx].prev = None;
        self.nodes[idx].next = self.head;
        match self.head {
            Some(h) => self.nodes[h].prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }
}

impl<V> fmt::Debug for LruCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("max_bytes", &self.max_bytes)
            .field("n_bytes", &self.n_bytes)
            .field("len", &self.index.len())
            .finish()
    }
}
