//! The four MST kernels and their dispatch surface.
//!
//! Kruskal and Borůvka are cluster-wide: every rank must enter the call.
//! Both Prim variants compute on rank 0 alone; other ranks return an empty
//! result immediately. The kernel to run is selected by the numeric codes
//! the command line exposes.

mod boruvka;
mod kruskal;
mod prim;

#[cfg(test)]
mod property;

use crate::{
    cluster::Communicator,
    error::EngineError,
    graph::WeightedGraph,
    heap::{BinaryMinHeap, FibonacciMinHeap},
};

/// The available MST kernels, numbered as on the command line.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Algorithm {
    /// Sequential selection over a cluster-sorted edge list.
    Kruskal,
    /// Prim on rank 0 over a Fibonacci min-heap.
    PrimFibonacci,
    /// Prim on rank 0 over a binary min-heap.
    PrimBinary,
    /// Cluster-parallel Borůvka.
    Boruvka,
}

impl Algorithm {
    /// Resolves a command-line algorithm number.
    ///
    /// # Errors
    /// Returns [`EngineError::UnknownAlgorithm`] for numbers outside `0..=3`.
    pub fn from_code(code: i32) -> Result<Self, EngineError> {
        match code {
            0 => Ok(Self::Kruskal),
            1 => Ok(Self::PrimFibonacci),
            2 => Ok(Self::PrimBinary),
            3 => Ok(Self::Boruvka),
            _ => Err(EngineError::UnknownAlgorithm { code }),
        }
    }

    /// Returns the command-line number of this kernel.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Kruskal => 0,
            Self::PrimFibonacci => 1,
            Self::PrimBinary => 2,
            Self::Boruvka => 3,
        }
    }

    /// Returns the kernel name used on logging surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kruskal => "kruskal",
            Self::PrimFibonacci => "prim-fibonacci",
            Self::PrimBinary => "prim-binary",
            Self::Boruvka => "boruvka",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computes the minimum spanning tree of `graph` with the chosen kernel.
///
/// Every rank of the cluster must make this call with the same `algorithm`.
/// Rank 0 passes the full graph and receives the MST; worker ranks pass an
/// empty graph and receive an empty result. Kruskal's sort phase permutes
/// rank 0's edge list in place.
///
/// The Prim variants return `vertices` entries whose first is the synthetic
/// `(0, 0, 0)` root sentinel; its zero weight leaves the total untouched.
/// Kruskal and Borůvka return `vertices - 1` entries.
///
/// # Errors
///
/// Returns [`EngineError::EmptyGraph`] when rank 0 holds no vertices,
/// [`EngineError::UnsupportedPartition`] when the edge list cannot be
/// scattered over the rank count, or a cluster error when a peer exited
/// mid-exchange.
pub fn minimum_spanning_tree<C: Communicator>(
    comm: &C,
    graph: &mut WeightedGraph,
    algorithm: Algorithm,
) -> Result<WeightedGraph, EngineError> {
    if comm.rank() == 0 && graph.vertices() == 0 {
        return Err(EngineError::EmptyGraph);
    }

    match algorithm {
        Algorithm::Kruskal => kruskal::run(comm, graph),
        Algorithm::PrimFibonacci => prim::run::<C, FibonacciMinHeap>(comm, graph),
        Algorithm::PrimBinary => prim::run::<C, BinaryMinHeap>(comm, graph),
        Algorithm::Boruvka => boruvka::run(comm, graph),
    }
}
