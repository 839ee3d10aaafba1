//! Spantree core library.
//!
//! A distributed-memory minimum spanning tree engine: four interchangeable
//! MST kernels (Kruskal, Prim over a binary heap, Prim over a Fibonacci
//! heap, and Borůvka) over a weighted undirected graph, with Kruskal's sort
//! phase and Borůvka parallelised across a bulk-synchronous rank cluster
//! using scatter and recursive-doubling reduction.
//!
//! The cluster is an abstraction: kernels are generic over [`Communicator`],
//! and [`LocalCluster`] provides the in-process, thread-per-rank realisation
//! used by the CLI and the test suite.

mod cluster;
mod dsu;
mod error;
mod graph;
mod heap;
mod io;
mod maze;
mod mst;
mod sort;

pub use crate::{
    cluster::{ClusterError, Communicator, LocalCluster, RunPlan, ThreadComm, PLAN_WORDS},
    dsu::DisjointSet,
    error::{EngineError, EngineErrorCode},
    graph::{AdjacencyList, Edge, Neighbour, WeightedGraph, EDGE_WORDS, WEIGHT_UNSET},
    heap::{BinaryMinHeap, FibonacciMinHeap, HeapEntry},
    io::{read_graph_file, write_graph_file},
    maze::{generate_grid_graph, render_maze, write_maze_file, MAXIMUM_RANDOM},
    mst::{minimum_spanning_tree, Algorithm},
    sort::merge_sort,
};

/// Sentinel index meaning "no element". Shared by the disjoint set's parent
/// array, both heaps' position tables, and the Fibonacci arena links.
pub(crate) const UNSET: usize = usize::MAX;
