//! Weighted graph storage shared by every MST kernel.
//!
//! Edges live in a flat `i32` word layout, three words per edge, so the same
//! buffer can be merge-sorted in place, scattered across ranks, and reduced
//! element-wise without re-encoding. [`Edge`] is the decoded view the kernel
//! logic works with.

use std::fmt::Write as _;

/// Words per edge in the flat layout: from, to, weight.
pub const EDGE_WORDS: usize = 3;

/// Sentinel weight marking an unset slot, e.g. in Borůvka's closest-edge
/// arrays and the initial Prim queue entries.
pub const WEIGHT_UNSET: i32 = i32::MAX;

/// An undirected edge with a 32-bit signed weight.
///
/// `(u, v, w)` and `(v, u, w)` describe the same edge; kernels never rely on
/// endpoint order except where a renderer canonicalises it locally.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Edge {
    /// First endpoint.
    pub from: usize,
    /// Second endpoint.
    pub to: usize,
    /// Edge weight.
    pub weight: i32,
}

impl Edge {
    /// Creates an edge from its endpoints and weight.
    #[must_use]
    pub const fn new(from: usize, to: usize, weight: i32) -> Self {
        Self { from, to, weight }
    }
}

/// Decodes the edge at `index` from a flat word slice.
pub(crate) fn read_edge(words: &[i32], index: usize) -> Edge {
    let slot = index * EDGE_WORDS;
    Edge {
        from: words[slot] as usize,
        to: words[slot + 1] as usize,
        weight: words[slot + 2],
    }
}

/// Encodes `edge` into the slot at `index` of a flat word slice.
pub(crate) fn write_edge(words: &mut [i32], index: usize, edge: Edge) {
    let slot = index * EDGE_WORDS;
    words[slot] = edge.from as i32;
    words[slot + 1] = edge.to as i32;
    words[slot + 2] = edge.weight;
}

/// A weighted undirected graph over dense vertex ids `0..vertices`.
///
/// The edge list is the flat word layout described at module level; the
/// invariant `edge_list.len() == EDGE_WORDS * edges` holds for the whole
/// lifetime of the value. The sort phase permutes edges in place; nothing
/// else mutates the list.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WeightedGraph {
    vertices: usize,
    edges: usize,
    edge_list: Vec<i32>,
}

impl WeightedGraph {
    /// Creates a graph with `edges` zero-filled edge slots.
    #[must_use]
    pub fn new(vertices: usize, edges: usize) -> Self {
        Self {
            vertices,
            edges,
            edge_list: vec![0; edges * EDGE_WORDS],
        }
    }

    /// Creates the empty graph used by worker ranks that hold no edges.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a graph from decoded edges.
    #[must_use]
    pub fn from_edges(vertices: usize, edges: &[Edge]) -> Self {
        let mut graph = Self::new(vertices, edges.len());
        for (index, edge) in edges.iter().enumerate() {
            graph.set_edge(index, *edge);
        }
        graph
    }

    /// Returns the vertex count.
    #[must_use]
    #[rustfmt::skip]
    pub fn vertices(&self) -> usize { self.vertices }

    /// Returns the edge count.
    #[must_use]
    #[rustfmt::skip]
    pub fn edge_count(&self) -> usize { self.edges }

    /// Decodes the edge at `index`.
    #[must_use]
    pub fn edge(&self, index: usize) -> Edge {
        read_edge(&self.edge_list, index)
    }

    /// Encodes `edge` at `index`.
    pub fn set_edge(&mut self, index: usize, edge: Edge) {
        write_edge(&mut self.edge_list, index, edge);
    }

    /// Returns the flat word layout of the edge list.
    #[must_use]
    pub fn edge_words(&self) -> &[i32] {
        &self.edge_list
    }

    /// Returns the flat word layout for in-place permutation by the sort.
    pub fn edge_words_mut(&mut self) -> &mut [i32] {
        &mut self.edge_list
    }

    /// Installs a permuted edge list, e.g. the outcome of the parallel sort.
    ///
    /// The replacement must cover the same number of edges; a mismatch is a
    /// logic error in the caller.
    pub(crate) fn replace_edge_words(&mut self, words: Vec<i32>) {
        debug_assert_eq!(words.len(), self.edges * EDGE_WORDS);
        self.edge_list = words;
    }

    /// Iterates over decoded edges in list order.
    pub fn iter_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        (0..self.edges).map(|index| self.edge(index))
    }

    /// Sums all edge weights. Synthetic self-edges carry weight zero and do
    /// not disturb the total.
    #[must_use]
    pub fn total_weight(&self) -> i64 {
        self.iter_edges().map(|edge| i64::from(edge.weight)).sum()
    }

    /// Renders the edge list as one `from\tto\tweight` line per edge.
    #[must_use]
    pub fn render_edge_list(&self) -> String {
        let mut text = String::new();
        for edge in self.iter_edges() {
            let _ = writeln!(text, "{}\t{}\t{}", edge.from, edge.to, edge.weight);
        }
        text
    }
}

/// One adjacency entry: the far endpoint and the connecting edge's weight.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Neighbour {
    /// Far endpoint of the edge.
    pub vertex: usize,
    /// Weight of the connecting edge.
    pub weight: i32,
}

/// Per-vertex adjacency built once from the edge list before Prim begins.
///
/// Every graph edge appears twice, once per direction, so the sequence
/// lengths sum to `2 * edges`.
#[derive(Clone, Debug, Default)]
pub struct AdjacencyList {
    lists: Vec<Vec<Neighbour>>,
}

impl AdjacencyList {
    const INITIAL_CAPACITY: usize = 4;

    /// Creates empty per-vertex sequences.
    #[must_use]
    pub fn new(vertices: usize) -> Self {
        Self {
            lists: (0..vertices)
                .map(|_| Vec::with_capacity(Self::INITIAL_CAPACITY))
                .collect(),
        }
    }

    /// Builds the adjacency of `graph`.
    #[must_use]
    pub fn from_graph(graph: &WeightedGraph) -> Self {
        let mut list = Self::new(graph.vertices());
        for edge in graph.iter_edges() {
            list.push(edge.from, edge.to, edge.weight);
        }
        list
    }

    /// Records the undirected edge `(from, to, weight)` in both sequences.
    pub fn push(&mut self, from: usize, to: usize, weight: i32) {
        self.lists[from].push(Neighbour { vertex: to, weight });
        self.lists[to].push(Neighbour { vertex: from, weight });
    }

    /// Returns the neighbours of `vertex` in insertion order.
    #[must_use]
    pub fn neighbours(&self, vertex: usize) -> &[Neighbour] {
        &self.lists[vertex]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn triangle() -> WeightedGraph {
        WeightedGraph::from_edges(
            3,
            &[Edge::new(0, 1, 1), Edge::new(1, 2, 2), Edge::new(0, 2, 3)],
        )
    }

    #[test]
    fn flat_layout_matches_edge_count() {
        let graph = triangle();
        assert_eq!(graph.edge_words().len(), EDGE_WORDS * graph.edge_count());
        assert_eq!(graph.edge(1), Edge::new(1, 2, 2));
    }

    #[test]
    fn total_weight_sums_all_edges() {
        assert_eq!(triangle().total_weight(), 6);
    }

    #[rstest]
    #[case::first(0, Edge::new(9, 8, 7))]
    #[case::last(2, Edge::new(1, 0, -4))]
    fn set_edge_round_trips(#[case] index: usize, #[case] edge: Edge) {
        let mut graph = WeightedGraph::new(10, 3);
        graph.set_edge(index, edge);
        assert_eq!(graph.edge(index), edge);
    }

    #[test]
    fn adjacency_records_both_directions() {
        let graph = triangle();
        let list = AdjacencyList::from_graph(&graph);
        let total: usize = (0..graph.vertices())
            .map(|vertex| list.neighbours(vertex).len())
            .sum();
        assert_eq!(total, 2 * graph.edge_count());
        assert_eq!(
            list.neighbours(1),
            &[
                Neighbour { vertex: 0, weight: 1 },
                Neighbour { vertex: 2, weight: 2 },
            ]
        );
    }

    #[test]
    fn render_edge_list_is_tab_separated() {
        let text = triangle().render_edge_list();
        assert_eq!(text, "0\t1\t1\n1\t2\t2\n0\t2\t3\n");
    }
}
