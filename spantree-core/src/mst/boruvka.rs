//! Borůvka: every rank scans its edge chunk for component-closest edges,
//! a recursive-doubling reduce combines them, and all ranks union the
//! broadcast winners in lockstep.

use tracing::debug;

use crate::{
    cluster::{scatter_edge_list, Communicator},
    dsu::DisjointSet,
    error::EngineError,
    graph::{read_edge, write_edge, WeightedGraph, EDGE_WORDS, WEIGHT_UNSET},
};

/// Runs Borůvka's algorithm across the cluster.
///
/// Rank 0 broadcasts the edge and vertex counts and scatters the edge list.
/// Each pass finds, per component, the lightest edge leaving it; ranks hold
/// replicated disjoint sets that stay identical because every rank unions
/// the same broadcast closest-edge array. Rank 0 alone records MST edges.
pub(super) fn run<C: Communicator>(
    comm: &C,
    graph: &WeightedGraph,
) -> Result<WeightedGraph, EngineError> {
    let rank = comm.rank();
    let size = comm.size();

    let mut header = if rank == 0 {
        vec![graph.edge_count() as i32, graph.vertices() as i32]
    } else {
        Vec::new()
    };
    comm.broadcast(&mut header, 0)?;
    let edges = header[0] as usize;
    let vertices = header[1] as usize;

    let part = if size == 1 {
        graph.edge_words().to_vec()
    } else {
        scatter_edge_list(comm, graph.edge_words(), edges)?
    };
    let part_edges = part.len() / EDGE_WORDS;

    let mut set = DisjointSet::new(vertices);
    let mut mst = if rank == 0 {
        WeightedGraph::new(vertices, vertices - 1)
    } else {
        WeightedGraph::empty()
    };
    let mut chosen = 0;
    let mut closest = vec![0_i32; vertices * EDGE_WORDS];

    // At most ⌈log2(vertices)⌉ passes: components at least halve each time.
    let mut pass = 1;
    while pass < vertices && chosen < vertices - 1 {
        for vertex in 0..vertices {
            closest[vertex * EDGE_WORDS + 2] = WEIGHT_UNSET;
        }

        for index in 0..part_edges {
            let edge = read_edge(&part, index);
            let roots = [set.find(edge.from), set.find(edge.to)];
            if roots[0] == roots[1] {
                continue;
            }
            for root in roots {
                let stored = closest[root * EDGE_WORDS + 2];
                if stored == WEIGHT_UNSET || edge.weight < stored {
                    write_edge(&mut closest, root, edge);
                }
            }
        }

        if size > 1 {
            reduce_closest_edges(comm, &mut closest, vertices)?;
            comm.broadcast(&mut closest, 0)?;
        }

        for vertex in 0..vertices {
            if closest[vertex * EDGE_WORDS + 2] == WEIGHT_UNSET {
                continue;
            }
            let edge = read_edge(&closest, vertex);
            // The same winning edge appears under both endpoints' roots.
            if set.find(edge.from) != set.find(edge.to) {
                if rank == 0 {
                    mst.set_edge(chosen, edge);
                }
                chosen += 1;
                set.union(edge.from, edge.to);
            }
        }

        debug!(rank, pass, chosen, "completed closest-edge pass");
        pass *= 2;
    }

    Ok(mst)
}

/// Recursive-doubling reduce of the per-rank closest-edge arrays onto
/// rank 0. The operator keeps, per vertex, the entry with the strictly
/// smaller weight; ties keep the receiver's incumbent.
fn reduce_closest_edges<C: Communicator>(
    comm: &C,
    closest: &mut [i32],
    vertices: usize,
) -> Result<(), EngineError> {
    let rank = comm.rank();
    let size = comm.size();

    let mut step = 1;
    while step < size {
        if rank % (2 * step) == 0 {
            let from = rank + step;
            if from < size {
                let received = comm.recv(from)?;
                for vertex in 0..vertices {
                    let slot = vertex * EDGE_WORDS;
                    if received[slot + 2] < closest[slot + 2] {
                        closest[slot..slot + EDGE_WORDS]
                            .copy_from_slice(&received[slot..slot + EDGE_WORDS]);
                    }
                }
            }
        } else if rank % step == 0 {
            comm.send(rank - step, closest)?;
        }
        step *= 2;
    }
    Ok(())
}
