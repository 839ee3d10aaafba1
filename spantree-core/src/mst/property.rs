//! Property-based tests for the MST kernels.
//!
//! Generates random connected graphs (a random spanning-tree backbone plus
//! extra edges) and verifies that all four kernels agree on the total
//! weight and that each result is a spanning tree drawn from the input
//! edge set.

use std::num::NonZeroUsize;

use proptest::prelude::*;

use crate::{
    cluster::{Communicator, LocalCluster},
    dsu::DisjointSet,
    graph::{Edge, WeightedGraph},
    mst::{minimum_spanning_tree, Algorithm},
};

#[derive(Clone, Debug)]
struct GraphFixture {
    vertices: usize,
    edges: Vec<Edge>,
}

/// A connected graph: vertex `v > 0` first attaches to a random earlier
/// vertex, then extra random edges are layered on top.
fn connected_graph() -> impl Strategy<Value = GraphFixture> {
    (2_usize..24).prop_flat_map(|vertices| {
        let backbone = proptest::collection::vec(
            (0_usize..vertices, 0_i32..100),
            vertices - 1,
        );
        let extras = proptest::collection::vec(
            (0_usize..vertices, 0_usize..vertices, 0_i32..100),
            0..vertices * 2,
        );
        (backbone, extras).prop_map(move |(backbone, extras)| {
            let mut edges = Vec::new();
            for (vertex, (anchor, weight)) in backbone.into_iter().enumerate() {
                let vertex = vertex + 1;
                edges.push(Edge::new(anchor % vertex, vertex, weight));
            }
            for (from, to, weight) in extras {
                if from != to {
                    edges.push(Edge::new(from, to, weight));
                }
            }
            GraphFixture { vertices, edges }
        })
    })
}

fn run_kernel(fixture: &GraphFixture, algorithm: Algorithm, ranks: usize) -> WeightedGraph {
    let ranks = NonZeroUsize::new(ranks).expect("rank counts are positive");
    let mut outcomes = LocalCluster::run(ranks, |comm| {
        let mut graph = if comm.rank() == 0 {
            WeightedGraph::from_edges(fixture.vertices, &fixture.edges)
        } else {
            WeightedGraph::empty()
        };
        minimum_spanning_tree(comm, &mut graph, algorithm)
    });
    outcomes
        .swap_remove(0)
        .expect("generated graphs must solve")
}

/// Checks the structural invariants and returns the total weight.
fn spanning_tree_weight(fixture: &GraphFixture, mst: &WeightedGraph) -> i64 {
    let mut set = DisjointSet::new(fixture.vertices);
    let mut real_edges = 0;
    for edge in mst.iter_edges() {
        if edge.from == edge.to {
            assert_eq!(edge.weight, 0, "sentinel {edge:?} must be weightless");
            continue;
        }
        let canonical = (edge.from.min(edge.to), edge.from.max(edge.to), edge.weight);
        assert!(
            fixture.edges.iter().any(|input| {
                (input.from.min(input.to), input.from.max(input.to), input.weight) == canonical
            }),
            "MST edge {edge:?} is not an input edge",
        );
        assert!(set.union(edge.from, edge.to), "MST edge {edge:?} closes a cycle");
        real_edges += 1;
    }
    assert_eq!(real_edges, fixture.vertices - 1);
    mst.total_weight()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn all_kernels_agree_on_the_total_weight(fixture in connected_graph()) {
        let reference = spanning_tree_weight(
            &fixture,
            &run_kernel(&fixture, Algorithm::Kruskal, 1),
        );
        for algorithm in [
            Algorithm::PrimFibonacci,
            Algorithm::PrimBinary,
            Algorithm::Boruvka,
        ] {
            let mst = run_kernel(&fixture, algorithm, 1);
            prop_assert_eq!(spanning_tree_weight(&fixture, &mst), reference);
        }
    }

    #[test]
    fn clustered_boruvka_matches_sequential_kruskal(fixture in connected_graph()) {
        // Four ranks need roughly two edges each; smaller fixtures run solo.
        let ranks = if fixture.edges.len() >= 7 { 4 } else { 1 };
        let reference = spanning_tree_weight(
            &fixture,
            &run_kernel(&fixture, Algorithm::Kruskal, 1),
        );
        let mst = run_kernel(&fixture, Algorithm::Boruvka, ranks);
        prop_assert_eq!(spanning_tree_weight(&fixture, &mst), reference);
    }
}
