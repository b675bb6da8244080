//! Extension dispatch.
//!
//! The embedder is generic over a set of hook sites; an extension
//! implements the trait methods it cares about and leaves the rest at
//! their no-op defaults. Extensions never touch the graph arenas behind
//! the core's back: whatever per-vertex or per-arc overlay they need lives
//! inside the extension value itself, whose lifetime spans the embed call.

pub mod search;

use crate::embed::{EmbedMode, ObstructionKind};
use crate::error::GraphError;
use crate::graph::{Graph, Index};

/// Hook sites offered to extensions. All methods default to no-ops except
/// [`EmbedderHooks::isolate`], which defaults to the mode-appropriate
/// obstruction isolator.
pub trait EmbedderHooks {
    /// Called after each bicomp merge is popped off the merge stack,
    /// before the splice happens.
    fn on_merge(
        &mut self,
        g: &mut Graph,
        w: Index,
        w_in: usize,
        r: Index,
        r_out: usize,
    ) -> Result<(), GraphError> {
        let _ = (g, w, w_in, r, r_out);
        Ok(())
    }

    /// Called after a Walkdown fully resolves one pertinent child bicomp.
    fn after_walkdown(&mut self, g: &mut Graph, v: Index, root: Index) -> Result<(), GraphError> {
        let _ = (g, v, root);
        Ok(())
    }

    /// Called after all of vertex `v`'s pertinence has been embedded.
    fn after_vertex(&mut self, g: &mut Graph, v: Index) -> Result<(), GraphError> {
        let _ = (g, v);
        Ok(())
    }

    /// Reduce the graph to an obstruction witness after a Walkdown
    /// failure at `v`.
    ///
    /// # Errors
    ///
    /// Propagates [`GraphError`] from the isolator.
    fn isolate(
        &mut self,
        g: &mut Graph,
        v: Index,
        mode: EmbedMode,
    ) -> Result<ObstructionKind, GraphError> {
        crate::obstruct::isolate(g, v, mode)
    }
}

/// The default extension: every hook is a no-op.
pub struct NoHooks;

impl EmbedderHooks for NoHooks {}

/// Decision-only hooks: skip obstruction isolation entirely and report a
/// placeholder kind. Used where only the embeddable/non-embeddable answer
/// matters, e.g. the witness minimiser re-testing edge subsets.
pub(crate) struct DecisionOnly;

impl EmbedderHooks for DecisionOnly {
    fn isolate(
        &mut self,
        g: &mut Graph,
        _v: Index,
        mode: EmbedMode,
    ) -> Result<ObstructionKind, GraphError> {
        let _ = g;
        Ok(if mode.keeps_all_vertices_outer() {
            ObstructionKind::K23
        } else {
            ObstructionKind::K33
        })
    }
}
