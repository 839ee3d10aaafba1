//! The bulk-synchronous message-passing layer the parallel kernels run on.
//!
//! Kernels are generic over [`Communicator`]: a fixed-size set of ranks
//! exchanging `i32`-word payloads over matched send/receive pairs, with a
//! broadcast collective layered on top. [`LocalCluster`] realises the trait
//! with one OS thread per rank inside the current process.

mod local;

use thiserror::Error;

use crate::{
    error::EngineError,
    graph::EDGE_WORDS,
    mst::Algorithm,
};

pub use local::{LocalCluster, ThreadComm};

/// Errors raised by cluster exchanges.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClusterError {
    /// A message targeted a rank outside the cluster.
    #[error("rank {peer} is outside the cluster of {size} ranks")]
    PeerOutOfRange {
        /// The rejected rank number.
        peer: usize,
        /// Number of ranks in the cluster.
        size: usize,
    },
    /// A rank addressed a message to itself.
    #[error("rank {rank} attempted to message itself")]
    SelfMessage {
        /// The offending rank.
        rank: usize,
    },
    /// The peer rank exited before the exchange completed, usually because
    /// it hit its own fatal error.
    #[error("rank {peer} closed its endpoint before the exchange completed")]
    Disconnected {
        /// The departed peer.
        peer: usize,
    },
}

/// A rank's handle onto the cluster.
///
/// Payloads are `i32` words, the engine's wire format. Sends are buffered
/// and never block; receives block until the matching send arrives. Every
/// collective must be entered by all ranks in the same order — the model is
/// bulk-synchronous and offers no tags beyond the sender's rank.
pub trait Communicator {
    /// This rank's number, in `0..size`.
    fn rank(&self) -> usize;

    /// Number of ranks in the cluster.
    fn size(&self) -> usize;

    /// Sends `payload` to rank `to`.
    ///
    /// # Errors
    /// Returns [`ClusterError`] when `to` is out of range, is this rank, or
    /// has already exited.
    fn send(&self, to: usize, payload: &[i32]) -> Result<(), ClusterError>;

    /// Receives the next payload from rank `from`.
    ///
    /// # Errors
    /// Returns [`ClusterError`] when `from` is out of range, is this rank,
    /// or exited before sending.
    fn recv(&self, from: usize) -> Result<Vec<i32>, ClusterError>;

    /// Replaces every rank's `buffer` with `root`'s copy.
    ///
    /// # Errors
    /// Propagates the underlying send/receive failures.
    fn broadcast(&self, buffer: &mut Vec<i32>, root: usize) -> Result<(), ClusterError> {
        if self.size() == 1 {
            return Ok(());
        }
        if self.rank() == root {
            for peer in 0..self.size() {
                if peer != root {
                    self.send(peer, buffer)?;
                }
            }
        } else {
            *buffer = self.recv(root)?;
        }
        Ok(())
    }
}

/// Distributes `elements` edges from rank 0's flat word list in chunks of
/// `⌈elements / size⌉`; trailing ranks receive whatever remains, which can
/// fall short of a full chunk.
///
/// Only rank 0 reads `words`; other ranks may pass an empty slice.
///
/// # Errors
///
/// Returns [`EngineError::UnsupportedPartition`] when fewer than roughly two
/// edges would land on each rank (the distribution cannot split such lists),
/// or a cluster error when a peer exited.
pub(crate) fn scatter_edge_list<C: Communicator>(
    comm: &C,
    words: &[i32],
    elements: usize,
) -> Result<Vec<i32>, EngineError> {
    let size = comm.size();
    if elements / 2 + 1 < size && elements != size {
        return Err(EngineError::UnsupportedPartition {
            edges: elements,
            ranks: size,
        });
    }

    let chunk_words = elements.div_ceil(size) * EDGE_WORDS;
    if comm.rank() == 0 {
        for peer in 1..size {
            let start = (peer * chunk_words).min(words.len());
            let end = (start + chunk_words).min(words.len());
            comm.send(peer, &words[start..end])?;
        }
        Ok(words[..chunk_words.min(words.len())].to_vec())
    } else {
        Ok(comm.recv(0)?)
    }
}

/// Number of words in the marshalled [`RunPlan`].
pub const PLAN_WORDS: usize = 6;

/// The configuration every rank needs before solving, broadcast from rank 0
/// as a fixed-format word buffer.
///
/// The graph-file path deliberately stays rank-0-private: no other rank
/// ever opens the file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RunPlan {
    /// The MST kernel to dispatch on every rank.
    pub algorithm: Algorithm,
    /// Grid rows used by maze generation and rendering.
    pub rows: usize,
    /// Grid columns used by maze generation and rendering.
    pub columns: usize,
    /// Whether rank 0 writes a fresh maze file before solving.
    pub create: bool,
    /// Whether rank 0 renders the MST as a maze afterwards.
    pub maze: bool,
    /// Whether rank 0 captures graph and MST edge listings.
    pub verbose: bool,
}

impl RunPlan {
    /// Marshals the plan into its fixed word format.
    #[must_use]
    pub fn to_words(&self) -> Vec<i32> {
        vec![
            self.algorithm.code(),
            self.rows as i32,
            self.columns as i32,
            i32::from(self.create),
            i32::from(self.maze),
            i32::from(self.verbose),
        ]
    }

    /// Unmarshals a plan received from rank 0.
    ///
    /// # Errors
    /// Returns [`EngineError::MalformedPlan`] on a wrong word count and
    /// [`EngineError::UnknownAlgorithm`] on an unknown kernel number.
    pub fn from_words(words: &[i32]) -> Result<Self, EngineError> {
        let [algorithm, rows, columns, create, maze, verbose] = words else {
            return Err(EngineError::MalformedPlan {
                words: words.len(),
                expected: PLAN_WORDS,
            });
        };
        Ok(Self {
            algorithm: Algorithm::from_code(*algorithm)?,
            rows: *rows as usize,
            columns: *columns as usize,
            create: *create != 0,
            maze: *maze != 0,
            verbose: *verbose != 0,
        })
    }
}
