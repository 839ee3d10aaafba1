//! Disjoint set over dense vertex ids with path compression and
//! union by rank.
//!
//! Borůvka replicates one instance per rank and drives every replica with
//! the same broadcast closest-edge array, so the structure stays sequential;
//! rank-private memory needs no synchronisation.

use crate::UNSET;

/// Tracks a partition of `0..elements` into disjoint components.
///
/// A vertex whose parent slot is unset is the canonical element of its
/// component. `find` compresses paths, so tree depth stays logarithmic
/// amortised under union by rank.
#[derive(Clone, Debug)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u32>,
}

impl DisjointSet {
    /// Creates `elements` singleton components.
    #[must_use]
    pub fn new(elements: usize) -> Self {
        Self {
            parent: vec![UNSET; elements],
            rank: vec![0; elements],
        }
    }

    /// Returns the canonical element of `vertex`'s component.
    ///
    /// Two-pass iterative walk: locate the root, then re-walk the path and
    /// point every traversed vertex directly at it.
    pub fn find(&mut self, vertex: usize) -> usize {
        let mut root = vertex;
        while self.parent[root] != UNSET {
            root = self.parent[root];
        }

        let mut current = vertex;
        while current != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }

        root
    }

    /// Unifies the components containing `left` and `right`.
    ///
    /// The arguments need not be canonical. Returns `true` when two distinct
    /// components were merged, `false` when they were already one.
    pub fn union(&mut self, left: usize, right: usize) -> bool {
        let left_root = self.find(left);
        let right_root = self.find(right);

        if left_root == right_root {
            return false;
        }

        if self.rank[left_root] < self.rank[right_root] {
            self.parent[left_root] = right_root;
        } else if self.rank[left_root] > self.rank[right_root] {
            self.parent[right_root] = left_root;
        } else {
            self.parent[left_root] = right_root;
            self.rank[right_root] += 1;
        }
        true
    }
}
