//! Text formats for graphs: adjacency list and adjacency matrix.
//!
//! The adjacency-list format starts with the vertex count, then one line
//! per vertex `i: j1 j2 ... 0` where the neighbors are one-based and the
//! list is terminated by `0` (zero-based with a `-1` terminator when
//! [`ReadOptions::zero_based`] is set). A `-` prefix on a neighbor marks
//! an edge used for ordering only; it is read as a plain edge. The
//! adjacency-matrix format is the vertex count on its own line followed
//! by an N x N 0/1 matrix.
//!
//! Reading is tolerant by default: duplicate edges are silently
//! deduplicated and edges beyond the planar maximum are dropped and
//! counted, so the caller can pre-signal non-embeddability the way the
//! original tooling does. [`ReadOptions::strict`] turns both into errors.

pub mod adjlist;
pub mod adjmatrix;

use ::derive_more::From;
use planarity_core::{Graph, GraphError};

pub use adjlist::{read_adjacency_list, write_adjacency_list};
pub use adjmatrix::{read_adjacency_matrix, write_adjacency_matrix};

/// Reader configuration.
#[derive(Debug, Copy, Clone, Default)]
pub struct ReadOptions {
    /// Neighbor indices are zero-based and lists end with `-1`.
    pub zero_based: bool,
    /// Fail on duplicate edges and on exceeding the planar edge budget
    /// instead of deduplicating/dropping.
    pub strict: bool,
}

/// A graph read from text, with the number of edges dropped for exceeding
/// the planar maximum (tolerant mode only; callers treat a non-zero count
/// as a pre-signalled non-embeddable input).
#[derive(Debug)]
pub struct ReadOutcome {
    pub graph: Graph,
    pub dropped_edges: usize,
}

/// Reading failure.
#[derive(Debug, From)]
pub enum FormatError {
    /// Malformed text, with a one-based line number.
    Parse { line: usize, message: String },
    /// The edges could not be applied to the graph.
    Graph(GraphError),
}

impl core::fmt::Display for FormatError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Parse { line, message } => write!(f, "parse error at line {line}: {message}"),
            Self::Graph(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for FormatError {}
