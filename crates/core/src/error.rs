use ::derive_more::From;

/// Structural failure of a graph operation or an embed run.
///
/// Non-embeddability is deliberately *not* an error: `embed` reports it as
/// a success outcome carrying the isolated obstruction.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, From)]
pub enum GraphError {
    /// An arena is exhausted or the requested order is too large.
    OutOfMemory,
    /// Self-loop, out-of-range vertex, or a malformed caller request.
    InvalidInput,
    /// More than `3n - 6` edges offered to a strict-mode graph.
    TooManyEdges,
    /// An internal invariant did not hold. Never silently swallowed: the
    /// embedder aborts and the integrity checker reports the breakage.
    InternalInvariant(&'static str),
}

impl core::fmt::Display for GraphError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfMemory => write!(f, "graph arena exhausted"),
            Self::InvalidInput => write!(f, "invalid vertex or edge"),
            Self::TooManyEdges => write!(f, "edge count exceeds the planar maximum"),
            Self::InternalInvariant(what) => write!(f, "internal invariant violated: {what}"),
        }
    }
}
