//! Walkdown: back-edge embedding and bicomp merging.
//!
//! For the current vertex `v` and one of its pertinent child bicomp roots,
//! the Walkdown walks the external face in each of the two directions. At
//! a pertinent vertex it embeds the pending back edge (first executing the
//! merges stacked on the way down) and descends into any pertinent child
//! bicomp, choosing the entry direction that reaches an internally active
//! vertex if one exists. Inactive vertices are stepped over; an externally
//! active non-pertinent vertex stops the direction. A direction that stops
//! while the merge stack is non-empty is stuck inside a descendant bicomp
//! and the other direction cannot help, so the Walkdown returns with the
//! stack intact for the isolator to read.

use super::bicomp::{
    embed_back_edge, external_face_step, is_externally_active, is_inactive, is_pertinent,
    merge_bicomps,
};
use super::EmbedMode;
use crate::error::GraphError;
use crate::extend::EmbedderHooks;
use crate::graph::{Graph, Index, NIL};

/// First active vertex on the external face of the bicomp rooted at `r`,
/// walking in direction `d`. Returns the vertex and its entry slot.
pub(crate) fn first_active(
    g: &Graph,
    v: Index,
    r: Index,
    d: usize,
    mode: EmbedMode,
) -> (Index, usize) {
    let mut inbound = 1 - d;
    let mut z = external_face_step(g, r, &mut inbound);
    while is_inactive(g, z, v, mode) {
        z = external_face_step(g, z, &mut inbound);
    }
    (z, inbound)
}

#[inline]
fn is_internally_active(g: &Graph, w: Index, v: Index, mode: EmbedMode) -> bool {
    is_pertinent(g, w) && !is_externally_active(g, w, v, mode)
}

/// Process one pertinent child bicomp of `v`, rooted at root copy `r`.
///
/// Returns `Ok(true)` when the bicomp's pertinence was fully resolved and
/// `Ok(false)` when a direction was blocked; in the blocked case the merge
/// stack still holds the descent frames when the blockage is inside a
/// descendant bicomp.
pub(crate) fn walkdown(
    g: &mut Graph,
    v: Index,
    r: Index,
    mode: EmbedMode,
    hooks: &mut dyn EmbedderHooks,
) -> Result<bool, GraphError> {
    g.stack.clear();

    for root_side in 0..2usize {
        let mut w_in = 1 - root_side;
        let mut w = external_face_step(g, r, &mut w_in);

        while w != r {
            if g.v[w].adjacent_to != NIL {
                merge_bicomps(g, hooks)?;
                embed_back_edge(g, v, r, root_side, w, w_in)?;
            }

            if g.v[w].pertinent_bicomp_list != NIL {
                // descend into the child bicomp, entering toward an
                // internally active vertex when there is one
                let c2 = g.v[w].pertinent_bicomp_list;
                let r2 = g.root_copy(c2);
                if !g.stack.push2(w, w_in) {
                    return Err(GraphError::InternalInvariant("merge stack overflow"));
                }
                let (x, xin) = first_active(g, v, r2, 0, mode);
                let (y, yin) = first_active(g, v, r2, 1, mode);
                let (next, next_in, r2_out) = if is_internally_active(g, x, v, mode) {
                    (x, xin, 0)
                } else if is_internally_active(g, y, v, mode) {
                    (y, yin, 1)
                } else if is_pertinent(g, x) {
                    (x, xin, 0)
                } else {
                    (y, yin, 1)
                };
                if !g.stack.push2(r2, r2_out) {
                    return Err(GraphError::InternalInvariant("merge stack overflow"));
                }
                w = next;
                w_in = next_in;
            } else if is_inactive(g, w, v, mode) {
                w = external_face_step(g, w, &mut w_in);
            } else {
                // externally active, not pertinent: this direction is done
                break;
            }
        }

        if !g.stack.is_empty() {
            // stuck inside a descendant bicomp; the frames stay for the
            // isolator
            tracing::trace!(v, r, root_side, "walkdown blocked in descendant bicomp");
            return Ok(false);
        }
    }

    hooks.after_walkdown(g, v, r)?;
    Ok(true)
}
