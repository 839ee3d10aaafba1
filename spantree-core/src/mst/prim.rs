//! Prim: single-rank computation over a vertex-keyed min-heap.

use crate::{
    cluster::Communicator,
    error::EngineError,
    graph::{AdjacencyList, Edge, WeightedGraph, WEIGHT_UNSET},
    heap::VertexQueue,
    UNSET,
};

/// Runs Prim's algorithm on rank 0; every other rank is a no-op.
///
/// The queue starts with every vertex at the unset weight; decreasing vertex
/// 0 to `(via = 0, weight = 0)` seeds the scan. Each pop emits the next MST
/// entry and relaxes the popped vertex's neighbours. The first pop is the
/// synthetic `(0, 0, 0)` root sentinel and lands in entry 0, so the result
/// carries `vertices` entries; the sentinel's zero weight keeps the total
/// correct.
pub(super) fn run<C: Communicator, Q: VertexQueue>(
    comm: &C,
    graph: &WeightedGraph,
) -> Result<WeightedGraph, EngineError> {
    if comm.rank() != 0 {
        return Ok(WeightedGraph::empty());
    }

    let vertices = graph.vertices();
    let list = AdjacencyList::from_graph(graph);

    let mut queue = Q::with_vertices(vertices);
    for vertex in 0..vertices {
        queue.push(vertex, UNSET, WEIGHT_UNSET);
    }
    queue.decrease(0, 0, 0);

    let mut mst = WeightedGraph::new(vertices, vertices);
    let mut index = 0;
    while let Some(entry) = queue.pop() {
        mst.set_edge(index, Edge::new(entry.vertex, entry.via, entry.weight));
        for neighbour in list.neighbours(entry.vertex) {
            queue.decrease(neighbour.vertex, entry.vertex, neighbour.weight);
        }
        index += 1;
    }

    Ok(mst)
}
