//! Disjoint-set forest keyed by arbitrary ordered identifiers.

use std::collections::BTreeMap;

/// Union-find structure with path compression and union by rank.
///
/// Keys are registered lazily: looking up an unknown key turns it into a
/// singleton set.
#[derive(Clone, Debug)]
pub struct UnionFind<K> {
    parent: BTreeMap<K, K>,
    rank: BTreeMap<K, u32>,
}

impl<K: Copy + Ord> Default for UnionFind<K> {
    fn default() -> Self {
        Self {
            parent: BTreeMap::new(),
            rank: BTreeMap::new(),
        }
    }
}

impl<K: Copy + Ord> UnionFind<K> {
    /// Creates an empty structure.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `key` as a singleton unless it is already known.
    pub fn insert(&mut self, key: K) {
        let _ = self.parent.entry(key).or_insert(key);
        let _ = self.rank.entry(key).or_insert(0);
    }

    /// Representative of the set containing `key`.
    pub fn find(&mut self, key: K) -> K {
        let mut root = key;
        loop {
            match self.parent.get(&root) {
                Some(&parent) if parent != root => root = parent,
                Some(_) => break,
                None => {
                    self.insert(root);
                    break;
                }
            }
        }

        let mut current = key;
        while current != root {
            let next = self.parent.get(&current).copied().unwrap_or(root);
            let _ = self.parent.insert(current, root);
            current = next;
        }
        root
    }

    /// Merges the sets containing `a` and `b`.
    ///
    /// Returns `false` when both keys already shared a set.
    pub fn union(&mut self, a: K, b: K) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }

        let rank_a = self.rank.get(&root_a).copied().unwrap_or(0);
        let rank_b = self.rank.get(&root_b).copied().unwrap_or(0);
        if rank_a < rank_b {
            let _ = self.parent.insert(root_a, root_b);
        } else {
            let _ = self.parent.insert(root_b, root_a);
            if rank_a == rank_b {
                let _ = self.rank.insert(root_a, rank_a + 1);
            }
        }
        true
    }

    /// Reports whether both keys belong to the same set.
    pub fn connected(&mut self, a: K, b: K) -> bool {
        self.find(a) == self.find(b)
    }
}
