//! The edge-addition embedder.
//!
//! The main loop processes vertices in decreasing DFI order. For each
//! vertex `v` it first Walkup-marks the pertinent bicomp chain of every
//! unembedded back edge ending at `v`, then Walkdown-processes each
//! pertinent child bicomp of `v`, embedding back edges and merging child
//! bicomps into `v`'s own. When a Walkdown is blocked in both directions
//! with pertinence unresolved, the obstruction isolator reduces the graph
//! to a Kuratowski (or outerplanarity) obstruction and the embed ends
//! `Obstructed`. Otherwise the remaining bicomps are joined, deferred
//! orientation flips are resolved, and the adjacency lists hold the
//! combinatorial embedding.

pub(crate) mod bicomp;
pub(crate) mod dfs;
pub(crate) mod walkdown;
pub(crate) mod walkup;

use crate::error::GraphError;
use crate::extend::{EmbedderHooks, NoHooks};
use crate::graph::{Graph, NIL};

/// Which problem the embedder is solving. The search modes share the
/// planar or outerplanar skeleton and differ only in how the caller
/// interprets (and possibly refines) the obstruction; see
/// [`crate::extend::search`].
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EmbedMode {
    /// Planar embedding, K5/K3,3 obstruction on failure.
    Planar,
    /// Outerplanar embedding, K2,3/K4 obstruction on failure.
    Outerplanar,
    /// Planar embedding feeding the visibility-representation drawer.
    DrawPlanar,
    /// Search for a subgraph homeomorphic to K2,3.
    SearchK23,
    /// Search for a subgraph homeomorphic to K3,3.
    SearchK33,
    /// Search for a subgraph homeomorphic to K4.
    SearchK4,
}

impl EmbedMode {
    /// Modes in which no vertex may ever leave the external face, so every
    /// vertex acts externally active.
    #[inline]
    #[must_use]
    pub const fn keeps_all_vertices_outer(self) -> bool {
        matches!(self, Self::Outerplanar | Self::SearchK23 | Self::SearchK4)
    }
}

/// Family of the isolated obstruction.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ObstructionKind {
    K5,
    K33,
    K23,
    K4,
}

/// Result of an embed run. Non-embeddability is a success outcome: the
/// graph has been reduced to the obstruction subgraph and can still be
/// serialised as the witness.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EmbedOutcome {
    /// The adjacency lists now hold a (planar or outerplanar) embedding.
    Embedded,
    /// The graph now holds only an obstruction of the given family.
    Obstructed(ObstructionKind),
}

/// Embed `g` in the given mode with the default (no-op) extension hooks.
///
/// # Errors
///
/// Structural failures only ([`GraphError`]); a non-planar input is the
/// `Ok(EmbedOutcome::Obstructed(_))` outcome, not an error.
pub fn embed(g: &mut Graph, mode: EmbedMode) -> Result<EmbedOutcome, GraphError> {
    embed_with_hooks(g, mode, &mut NoHooks)
}

/// Embed with caller-supplied extension hooks (see [`crate::extend`]).
///
/// # Errors
///
/// Structural failures only; see [`embed`].
pub fn embed_with_hooks(
    g: &mut Graph,
    mode: EmbedMode,
    hooks: &mut dyn EmbedderHooks,
) -> Result<EmbedOutcome, GraphError> {
    let n = g.vertex_count();
    if n == 0 {
        return Ok(EmbedOutcome::Embedded);
    }
    dfs::preprocess(g)?;
    tracing::debug!(n, m = g.edge_count(), ?mode, "preprocessing done, embedding");

    for v in (0..n).rev() {
        // Walkup: mark the pertinent bicomp chain of each back edge to v.
        let head = g.v[v].fwd_arc_list;
        if head != NIL {
            let mut e = head;
            loop {
                walkup::walkup(g, v, e);
                e = g.nodes[e].link[0];
                if e == head {
                    break;
                }
            }
        }

        // Walkdown each pertinent child bicomp, internally active first.
        let mut blocked = false;
        loop {
            let c = g.v[v].pertinent_bicomp_list;
            if c == NIL {
                break;
            }
            let r = g.root_copy(c);
            let done = walkdown::walkdown(g, v, r, mode, hooks)?;
            let head2 = g.v[v].pertinent_bicomp_list;
            if head2 != NIL && g.bicomp_lists.is_linked(c) {
                g.v[v].pertinent_bicomp_list = g.bicomp_lists.delete(head2, c);
            }
            if !done {
                // Both directions met externally active stoppers with
                // pertinence unresolved: non-embeddable. Stop here so the
                // isolator can read the merge stack.
                blocked = true;
                break;
            }
        }

        if blocked || g.v[v].fwd_arc_list != NIL {
            tracing::debug!(v, "walkdown failed, isolating obstruction");
            let kind = hooks.isolate(g, v, mode)?;
            return Ok(EmbedOutcome::Obstructed(kind));
        }

        hooks.after_vertex(g, v)?;
    }

    bicomp::join_bicomps(g);
    bicomp::orient_vertices(g);
    tracing::debug!("embedding complete");
    Ok(EmbedOutcome::Embedded)
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn test_outcome_roundtrip() {
        let outcome = EmbedOutcome::Obstructed(ObstructionKind::K33);
        let json = serde_json::to_string(&outcome).unwrap();
        let back: EmbedOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(outcome, back);
    }

    #[test]
    fn test_mode_roundtrip() {
        for mode in [EmbedMode::Planar, EmbedMode::Outerplanar, EmbedMode::SearchK4] {
            let json = serde_json::to_string(&mode).unwrap();
            let back: EmbedMode = serde_json::from_str(&json).unwrap();
            assert_eq!(mode, back);
        }
    }
}
