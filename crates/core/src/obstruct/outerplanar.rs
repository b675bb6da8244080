//! Outerplanarity obstruction isolation.
//!
//! With every vertex externally active, the Walkdown failure minors
//! reduce to A (failure on a descendant bicomp), B (pertinent child
//! bicomp of `w`), and E (direct blockage). The witnesses are built from
//! the failed bicomp's boundary cycle, the tree path to the current
//! vertex, and the pending back edge; the result smooths to a K2,3 or a
//! K4 and is classified from its final shape.

use super::kuratowski::minimise_witness;
use super::{
    add_marked_unembedded_edges, classify_witness, init_context, mark_dfs_path,
    mark_ext_face_path, mark_unembedded_edge, pending_for, pending_in_subtree, IsolatorContext,
    Minor,
};
use crate::embed::bicomp::join_bicomps;
use crate::embed::{EmbedMode, ObstructionKind};
use crate::error::GraphError;
use crate::graph::{Graph, Index, NIL};

pub(crate) fn isolate_outerplanar_obstruction(
    g: &mut Graph,
    v: Index,
    mode: EmbedMode,
) -> Result<ObstructionKind, GraphError> {
    let mut ctx = init_context(g, v, mode)?;
    choose_minor(g, &mut ctx);
    tracing::debug!(minor = ?ctx.minor, r = ctx.r, w = ctx.w, "isolating outerplanar obstruction");

    match ctx.minor {
        Minor::A => {
            ctx.dw = pending_for(g, v, ctx.w)?;
            mark_ext_face_path(g, ctx.r, ctx.r, ctx.r)?;
            mark_dfs_path(g, v, ctx.r)?;
            mark_dfs_path(g, ctx.w, ctx.dw)?;
            mark_unembedded_edge(g, v, ctx.dw)?;
        }
        Minor::B => {
            let c_b = g.bicomp_lists.last(g.v[ctx.w].pertinent_bicomp_list);
            ctx.dw = pending_in_subtree(g, v, c_b)?;
            mark_ext_face_path(g, ctx.r, ctx.r, ctx.r)?;
            mark_dfs_path(g, ctx.w, ctx.dw)?;
            mark_unembedded_edge(g, v, ctx.dw)?;
        }
        _ => {
            ctx.dw = pending_for(g, v, ctx.w)?;
            mark_ext_face_path(g, ctx.r, ctx.r, ctx.r)?;
            mark_dfs_path(g, ctx.w, ctx.dw)?;
            mark_unembedded_edge(g, v, ctx.dw)?;
        }
    }

    join_bicomps(g);
    add_marked_unembedded_edges(g);
    super::delete_unmarked(g);

    match classify_witness(g) {
        Ok(kind) => Ok(kind),
        // shape with leftover attachments: reduce it to a minimal one
        Err(_) => minimise_witness(g, EmbedMode::Outerplanar),
    }
}

fn choose_minor(g: &Graph, ctx: &mut IsolatorContext) {
    if g.v[g.root_child(ctx.r)].dfs_parent != ctx.v {
        ctx.minor = Minor::A;
    } else if g.v[ctx.w].pertinent_bicomp_list != NIL {
        ctx.minor = Minor::B;
    } else {
        ctx.minor = Minor::E;
    }
}
