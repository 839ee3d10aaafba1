//! Kruskal: cluster-wide sort, then sequential selection on rank 0.

use tracing::debug;

use crate::{
    cluster::Communicator,
    dsu::DisjointSet,
    error::EngineError,
    graph::WeightedGraph,
    sort,
};

/// Runs Kruskal's algorithm.
///
/// All ranks participate in the parallel sort; afterwards rank 0 scans the
/// sorted list in ascending weight order and keeps every edge that joins two
/// distinct components, stopping once `vertices - 1` edges are chosen or the
/// list is exhausted.
pub(super) fn run<C: Communicator>(
    comm: &C,
    graph: &mut WeightedGraph,
) -> Result<WeightedGraph, EngineError> {
    sort::parallel_sort(comm, graph)?;

    if comm.rank() != 0 {
        return Ok(WeightedGraph::empty());
    }

    let vertices = graph.vertices();
    let mut set = DisjointSet::new(vertices);
    let mut mst = WeightedGraph::new(vertices, vertices - 1);
    let mut chosen = 0;

    for index in 0..graph.edge_count() {
        if chosen == vertices - 1 {
            break;
        }
        let edge = graph.edge(index);
        let from_root = set.find(edge.from);
        let to_root = set.find(edge.to);
        if from_root != to_root {
            mst.set_edge(chosen, edge);
            set.union(from_root, to_root);
            chosen += 1;
        }
    }

    debug!(chosen, "selection finished");
    Ok(mst)
}
