//! Fibonacci min-heap with amortised `O(1)` decrease-key.
//!
//! Nodes live in an arena and reference each other through stable index
//! handles, so the cyclic sibling lists and parent back-pointers need no
//! shared ownership. Sibling lists are circular and doubly linked; the root
//! list is walked from the `minimum` handle.

use crate::UNSET;

use super::{HeapEntry, VertexQueue};

/// Handle value meaning "no node".
const NIL: usize = UNSET;

#[derive(Clone, Copy, Debug)]
struct Node {
    vertex: usize,
    via: usize,
    weight: i32,
    marked: bool,
    children: usize,
    parent: usize,
    child: usize,
    left: usize,
    right: usize,
}

/// A Fibonacci min-heap keyed by entry weight.
///
/// `positions[v]` holds the arena handle of vertex `v`'s node, or [`NIL`]
/// when absent. A non-root node is marked iff it has lost exactly one child
/// since it last became a non-root.
#[derive(Clone, Debug)]
pub struct FibonacciMinHeap {
    arena: Vec<Node>,
    free: Vec<usize>,
    positions: Vec<usize>,
    minimum: usize,
    len: usize,
}

impl FibonacciMinHeap {
    /// Creates an empty heap for vertices `0..vertices`.
    #[must_use]
    pub fn with_vertices(vertices: usize) -> Self {
        Self {
            arena: Vec::with_capacity(vertices),
            free: Vec::new(),
            positions: vec![NIL; vertices],
            minimum: NIL,
            len: 0,
        }
    }

    /// Returns the number of queued entries.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.len }

    /// Returns `true` when no entries are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts a singleton root, updating `minimum` when the new weight is
    /// strictly smaller.
    pub fn push(&mut self, vertex: usize, via: usize, weight: i32) {
        let handle = self.allocate(vertex, via, weight);
        self.positions[vertex] = handle;
        self.insert_root(handle);
        self.len += 1;
    }

    /// Removes and returns the minimum-weight entry, consolidating the root
    /// list afterwards.
    pub fn pop(&mut self) -> Option<HeapEntry> {
        if self.minimum == NIL {
            return None;
        }

        let minimum = self.minimum;
        let entry = HeapEntry {
            vertex: self.arena[minimum].vertex,
            via: self.arena[minimum].via,
            weight: self.arena[minimum].weight,
        };

        // Splice every child of the minimum into the root list. Only the
        // parent link is cleared; marks survive until the next cut.
        for _ in 0..self.arena[minimum].children {
            let child = self.arena[minimum].child;
            if self.arena[child].right == child {
                self.arena[minimum].child = NIL;
            } else {
                self.arena[minimum].child = self.arena[child].right;
                self.detach_sibling(child);
            }
            self.arena[child].parent = NIL;
            self.splice_before(child, minimum);
        }
        self.arena[minimum].children = 0;

        if self.arena[minimum].right == minimum {
            self.minimum = NIL;
        } else {
            let successor = self.arena[minimum].right;
            self.detach_sibling(minimum);
            self.minimum = successor;
        }

        self.len -= 1;
        self.positions[entry.vertex] = NIL;
        self.free.push(minimum);

        if self.len > 0 {
            self.consolidate();
        }
        Some(entry)
    }

    /// Lowers `vertex` to `(via, weight)` when present with a strictly
    /// larger weight; otherwise does nothing. Cuts the node when the new
    /// weight undercuts its parent.
    pub fn decrease(&mut self, vertex: usize, via: usize, weight: i32) {
        let handle = self.positions[vertex];
        if handle == NIL || self.arena[handle].weight <= weight {
            return;
        }

        self.arena[handle].via = via;
        self.arena[handle].weight = weight;

        let parent = self.arena[handle].parent;
        if parent == NIL {
            if weight < self.arena[self.minimum].weight {
                self.minimum = handle;
            }
        } else if weight < self.arena[parent].weight {
            self.cut(handle);
        }
    }

    /// Detaches `handle` from its parent, moves it to the root list, and
    /// cascades up through marked ancestors.
    fn cut(&mut self, handle: usize) {
        let mut node = handle;
        loop {
            let parent = self.arena[node].parent;
            self.arena[parent].children -= 1;
            if self.arena[node].right == node {
                self.arena[parent].child = NIL;
            } else {
                let successor = self.arena[node].right;
                self.detach_sibling(node);
                if self.arena[parent].child == node {
                    self.arena[parent].child = successor;
                }
            }

            self.arena[node].parent = NIL;
            self.arena[node].marked = false;
            self.insert_root(node);

            if self.arena[parent].parent == NIL {
                break;
            }
            if self.arena[parent].marked {
                node = parent;
            } else {
                self.arena[parent].marked = true;
                break;
            }
        }
    }

    /// Links roots of equal child count until all remaining roots differ,
    /// then rebuilds the root list and re-locates the minimum.
    fn consolidate(&mut self) {
        let slots = 2 * (self.len.ilog2() as usize) + 3;
        let mut by_degree = vec![NIL; slots];

        let mut current = self.minimum;
        while current != NIL {
            let next = if self.arena[current].right == current {
                NIL
            } else {
                self.arena[current].right
            };
            self.detach_sibling(current);
            self.arena[current].left = current;
            self.arena[current].right = current;

            let mut root = current;
            let mut degree = self.arena[root].children;
            while by_degree[degree] != NIL {
                let mut other = by_degree[degree];
                if self.arena[root].weight > self.arena[other].weight {
                    std::mem::swap(&mut root, &mut other);
                }
                self.link_child(root, other);
                by_degree[degree] = NIL;
                degree += 1;
            }
            by_degree[degree] = root;

            current = next;
        }

        self.minimum = NIL;
        for root in by_degree.into_iter().filter(|&slot| slot != NIL) {
            if self.minimum == NIL {
                self.minimum = root;
                self.arena[root].left = root;
                self.arena[root].right = root;
            } else {
                self.splice_before(root, self.minimum);
                if self.arena[root].weight < self.arena[self.minimum].weight {
                    self.minimum = root;
                }
            }
        }
    }

    /// Makes `child` (a detached, self-linked root) a child of `root`.
    fn link_child(&mut self, root: usize, child: usize) {
        self.arena[child].parent = root;
        let first = self.arena[root].child;
        if first == NIL {
            self.arena[root].child = child;
            self.arena[child].left = child;
            self.arena[child].right = child;
        } else {
            self.splice_before(child, first);
        }
        self.arena[root].children += 1;
        self.arena[child].marked = false;
    }

    /// Splices `handle` into the root list to the left of `minimum`,
    /// updating `minimum` when the new root's weight is strictly smaller.
    fn insert_root(&mut self, handle: usize) {
        if self.minimum == NIL {
            self.arena[handle].left = handle;
            self.arena[handle].right = handle;
            self.minimum = handle;
        } else {
            self.splice_before(handle, self.minimum);
            if self.arena[handle].weight < self.arena[self.minimum].weight {
                self.minimum = handle;
            }
        }
    }

    /// Inserts `handle` immediately to the left of `anchor` in `anchor`'s
    /// circular sibling list.
    fn splice_before(&mut self, handle: usize, anchor: usize) {
        let tail = self.arena[anchor].left;
        self.arena[handle].left = tail;
        self.arena[handle].right = anchor;
        self.arena[tail].right = handle;
        self.arena[anchor].left = handle;
    }

    /// Unlinks `handle` from its circular sibling list, leaving its own
    /// link fields stale.
    fn detach_sibling(&mut self, handle: usize) {
        let left = self.arena[handle].left;
        let right = self.arena[handle].right;
        self.arena[right].left = left;
        self.arena[left].right = right;
    }

    fn allocate(&mut self, vertex: usize, via: usize, weight: i32) -> usize {
        let node = Node {
            vertex,
            via,
            weight,
            marked: false,
            children: 0,
            parent: NIL,
            child: NIL,
            left: NIL,
            right: NIL,
        };
        if let Some(handle) = self.free.pop() {
            self.arena[handle] = node;
            handle
        } else {
            self.arena.push(node);
            self.arena.len() - 1
        }
    }

    #[cfg(test)]
    fn root_child_counts(&self) -> Vec<usize> {
        let mut counts = Vec::new();
        if self.minimum == NIL {
            return counts;
        }
        let mut current = self.minimum;
        loop {
            counts.push(self.arena[current].children);
            current = self.arena[current].right;
            if current == self.minimum {
                return counts;
            }
        }
    }
}

impl VertexQueue for FibonacciMinHeap {
    fn with_vertices(vertices: usize) -> Self {
        Self::with_vertices(vertices)
    }

    fn push(&mut self, vertex: usize, via: usize, weight: i32) {
        self.push(vertex, via, weight);
    }

    fn pop(&mut self) -> Option<HeapEntry> {
        self.pop()
    }

    fn decrease(&mut self, vertex: usize, via: usize, weight: i32) {
        self.decrease(vertex, via, weight);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{rngs::SmallRng, Rng, SeedableRng};
    use rstest::rstest;

    use crate::heap::BinaryMinHeap;

    #[test]
    fn pop_on_empty_returns_none() {
        let mut heap = FibonacciMinHeap::with_vertices(4);
        assert!(heap.pop().is_none());
    }

    #[rstest]
    #[case::ascending(&[1, 2, 3, 4, 5])]
    #[case::descending(&[9, 7, 5, 3, 1])]
    #[case::mixed(&[4, 1, 8, 2, 6, 3])]
    fn pops_in_weight_order(#[case] weights: &[i32]) {
        let mut heap = FibonacciMinHeap::with_vertices(weights.len());
        for (vertex, &weight) in weights.iter().enumerate() {
            heap.push(vertex, 0, weight);
        }

        let mut sorted = weights.to_vec();
        sorted.sort_unstable();
        let mut popped = Vec::new();
        while let Some(entry) = heap.pop() {
            popped.push(entry.weight);
        }
        assert_eq!(popped, sorted);
    }

    #[test]
    fn consolidate_leaves_distinct_root_child_counts() {
        let mut heap = FibonacciMinHeap::with_vertices(16);
        for vertex in 0..16 {
            heap.push(vertex, 0, vertex as i32);
        }
        heap.pop();

        let counts = heap.root_child_counts();
        let mut deduplicated = counts.clone();
        deduplicated.sort_unstable();
        deduplicated.dedup();
        assert_eq!(counts.len(), deduplicated.len());
    }

    #[test]
    fn decrease_updates_the_minimum() {
        let mut heap = FibonacciMinHeap::with_vertices(4);
        for (vertex, weight) in [(0, 10), (1, 20), (2, 30), (3, 40)] {
            heap.push(vertex, 0, weight);
        }
        heap.decrease(3, 2, 1);

        let entry = heap.pop().expect("heap holds entries");
        assert_eq!(entry, HeapEntry { vertex: 3, via: 2, weight: 1 });
    }

    #[test]
    fn decrease_below_parent_cuts_the_node() {
        let mut heap = FibonacciMinHeap::with_vertices(8);
        for vertex in 0..8 {
            heap.push(vertex, 0, 10 + vertex as i32);
        }
        // Consolidation builds trees, so later decreases must cut.
        assert_eq!(heap.pop().map(|entry| entry.vertex), Some(0));

        heap.decrease(7, 0, 1);
        heap.decrease(6, 0, 2);
        assert_eq!(heap.pop().map(|entry| entry.vertex), Some(7));
        assert_eq!(heap.pop().map(|entry| entry.vertex), Some(6));
        assert_eq!(heap.pop().map(|entry| entry.vertex), Some(1));
    }

    #[test]
    fn decrease_with_equal_weight_is_a_no_op() {
        let mut heap = FibonacciMinHeap::with_vertices(2);
        heap.push(0, 0, 5);
        heap.push(1, 0, 7);
        heap.decrease(1, 9, 7);

        heap.pop();
        let entry = heap.pop().expect("heap holds one entry");
        assert_eq!(entry, HeapEntry { vertex: 1, via: 0, weight: 7 });
    }

    #[test]
    fn matches_binary_heap_on_random_workloads() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        for _ in 0..50 {
            let vertices = rng.gen_range(2..40);
            let mut fibonacci = FibonacciMinHeap::with_vertices(vertices);
            let mut binary = BinaryMinHeap::with_vertices(vertices);
            for vertex in 0..vertices {
                let weight = rng.gen_range(0..1_000);
                fibonacci.push(vertex, 0, weight);
                binary.push(vertex, 0, weight);
            }

            for _ in 0..vertices * 2 {
                if rng.gen_bool(0.4) {
                    let vertex = rng.gen_range(0..vertices);
                    let weight = rng.gen_range(0..1_000);
                    fibonacci.decrease(vertex, 0, weight);
                    binary.decrease(vertex, 0, weight);
                } else {
                    assert_eq!(
                        fibonacci.pop().map(|entry| entry.weight),
                        binary.pop().map(|entry| entry.weight),
                    );
                }
            }
        }
    }
}
