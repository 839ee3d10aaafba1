//! Error types for the spantree core library.
//!
//! Defines the engine-wide error enum exposed by the public API together
//! with stable machine-readable error codes for logging surfaces.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

use crate::cluster::ClusterError;

/// Stable codes describing [`EngineError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum EngineErrorCode {
    /// The requested algorithm number is not one of the known kernels.
    UnknownAlgorithm,
    /// The caller requested an MST for an empty graph.
    EmptyGraph,
    /// The edge list cannot be distributed over the configured rank count.
    UnsupportedPartition,
    /// The configuration broadcast carried an unexpected word count.
    MalformedPlan,
    /// A graph file could not be opened, read, or written.
    GraphFile,
    /// A graph file held data that does not follow the expected format.
    GraphFormat,
    /// A cluster exchange failed.
    Cluster,
}

impl EngineErrorCode {
    /// Return the stable machine-readable representation of this error code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnknownAlgorithm => "UNKNOWN_ALGORITHM",
            Self::EmptyGraph => "EMPTY_GRAPH",
            Self::UnsupportedPartition => "UNSUPPORTED_PARTITION",
            Self::MalformedPlan => "MALFORMED_PLAN",
            Self::GraphFile => "GRAPH_FILE",
            Self::GraphFormat => "GRAPH_FORMAT",
            Self::Cluster => "CLUSTER",
        }
    }
}

impl fmt::Display for EngineErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced while configuring or running the MST engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// The requested algorithm number is not one of the known kernels.
    #[error("unknown algorithm: {code} (expected 0..=3)")]
    UnknownAlgorithm {
        /// The rejected algorithm number.
        code: i32,
    },
    /// The caller requested an MST for an empty graph.
    #[error("cannot compute an MST for an empty graph")]
    EmptyGraph,
    /// The edge list cannot be distributed over the configured rank count.
    #[error("unsupported edge/rank combination: {edges} edges over {ranks} ranks")]
    UnsupportedPartition {
        /// Number of edges to distribute.
        edges: usize,
        /// Number of ranks in the cluster.
        ranks: usize,
    },
    /// The configuration broadcast carried an unexpected word count.
    #[error("configuration broadcast carried {words} words, expected {expected}")]
    MalformedPlan {
        /// Words received.
        words: usize,
        /// Words the fixed marshalling format requires.
        expected: usize,
    },
    /// A graph file could not be opened, read, or written.
    #[error("failed to access graph file `{path}`: {source}")]
    GraphFile {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// A graph file held data that does not follow the expected format.
    #[error("malformed graph file `{path}`: {reason}")]
    GraphFormat {
        /// Path of the offending file.
        path: PathBuf,
        /// Short description of the violated rule.
        reason: &'static str,
    },
    /// A cluster exchange failed.
    #[error(transparent)]
    Cluster(#[from] ClusterError),
}

impl EngineError {
    /// Returns the stable [`EngineErrorCode`] for the variant.
    #[must_use]
    pub const fn code(&self) -> EngineErrorCode {
        match self {
            Self::UnknownAlgorithm { .. } => EngineErrorCode::UnknownAlgorithm,
            Self::EmptyGraph => EngineErrorCode::EmptyGraph,
            Self::UnsupportedPartition { .. } => EngineErrorCode::UnsupportedPartition,
            Self::MalformedPlan { .. } => EngineErrorCode::MalformedPlan,
            Self::GraphFile { .. } => EngineErrorCode::GraphFile,
            Self::GraphFormat { .. } => EngineErrorCode::GraphFormat,
            Self::Cluster(_) => EngineErrorCode::Cluster,
        }
    }
}
