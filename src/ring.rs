//! Consistent Hash Ring
//!
//! Maps keys to the real node owning them, using `replicas` virtual points
//! per node so that adding a node only moves a bounded share of keys.

use std::collections::HashMap;

/// Hash applied to virtual node labels and to looked-up keys.
pub type HashFn = fn(&[u8]) -> u32;

/// Default hash: CRC-32 (IEEE).
pub fn crc32_hash(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

// == Hash Ring ==
/// Append-only consistent hash ring.
///
/// Points are kept sorted ascending; each point maps to the real node that
/// created it. Membership changes are handled by building a new ring.
#[derive(Debug, Clone)]
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    points: Vec<u32>,
    owners: HashMap<u32, String>,
}

impl HashRing {
    /// Creates an empty ring with `replicas` virtual points per node.
    pub fn new(replicas: usize) -> Self {
        Self::with_hasher(replicas, crc32_hash)
    }

    pub fn with_hasher(replicas: usize, hash: HashFn) -> Self {
        Self {
            hash,
            replicas,
            points: Vec::new(),
            owners: HashMap::new(),
        }
    }

    // == Add Nodes ==
    /// Places `replicas` points for every node, hashing `"{index}{node}"`.
    ///
    /// Adding the same node twice duplicates its points; when two labels hash
    /// to the same point, the later node owns it.
    pub fn add<I, S>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for node in nodes {
            let node = node.as_ref();
            for i in 0..self.replicas {
                let point = (self.hash)(format!("{i}{node}").as_bytes());
                self.points.push(point);
                self.owners.insert(point, node.to_string());
            }
        }
        self.points.sort_unstable();
    }

    // == Lookup ==
    /// Returns the node owning the first point at or after `hash(key)`,
    /// wrapping to the smallest point. `None` only when the ring is empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.points.is_empty() {
            return None;
        }
        let hash = (self.hash)(key.as_bytes());
        let idx = self.points.partition_point(|&p| p < hash) % self.points.len();
        self.owners.get(&self.points[idx]).map(String::as_str)
    }

    /// Returns the number of virtual points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sorted virtual points.
    pub fn points(&self) -> &[u32] {
        &self.points
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    /// Parses the label as a decimal number so point positions are predictable.
    fn numeric_hash(data: &[u8]) -> u32 {
        std::str::from_utf8(data).unwrap().parse().unwrap()
    }

    #[test]
    fn test_ring_empty_lookup() {
        let ring = HashRing::new(3);
        assert!(ring.is_empty());
        assert_eq!(ring.get("anything"), None);
    }

    #[test]
    fn test_ring_sizing_and_order() {
        let mut ring = HashRing::new(50);
        ring.add(["http://a:8001", "http://b:8002", "http://c:8003"]);

        assert_eq!(ring.len(), 150);
        assert!(ring.points().windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_ring_lookup_with_known_points() {
        // Nodes "6", "4", "2" produce points 06/16/26, 04/14/24, 02/12/22
        let mut ring = HashRing::with_hasher(3, numeric_hash);
        ring.add(["6", "4", "2"]);

        assert_eq!(ring.points(), &[2, 4, 6, 12, 14, 16, 22, 24, 26]);

        let cases = [("2", "2"), ("11", "2"), ("23", "4"), ("27", "2")];
        for (key, owner) in cases {
            assert_eq!(ring.get(key), Some(owner), "key {key}");
        }

        // Adding node 8 claims 8, 18, 28
        ring.add(["8"]);
        assert_eq!(ring.get("27"), Some("8"));
        assert_eq!(ring.get("2"), Some("2"));
    }

    #[test]
    fn test_ring_wraps_past_max_point() {
        let mut ring = HashRing::with_hasher(2, numeric_hash);
        ring.add(["3", "5"]);

        // Points: 3, 5, 13, 15. 99 is past the end and wraps to 3
        assert_eq!(ring.get("99"), Some("3"));
    }

    #[test]
    fn test_ring_lookup_is_deterministic() {
        let mut ring = HashRing::new(50);
        ring.add(["http://a:8001", "http://b:8002"]);

        for key in ["Tom", "Jack", "Sam", "some/longer/key"] {
            let first = ring.get(key);
            assert!(first.is_some());
            assert_eq!(ring.get(key), first);
        }
    }

    #[test]
    fn test_ring_bounded_redistribution() {
        let mut before = HashRing::new(50);
        before.add(["http://a:8001", "http://b:8002", "http://c:8003"]);
        let mut after = before.clone();
        after.add(["http://d:8004"]);

        // Keys only ever move to the new node
        for i in 0..1000 {
            let key = format!("key-{i}");
            let (old, new) = (before.get(&key).unwrap(), after.get(&key).unwrap());
            assert!(old == new || new == "http://d:8004");
        }
    }
}
