//! Kuratowski subgraph isolation for the planar embedder.
//!
//! The five Walkdown failure minors each map to a marking recipe built
//! from the shared primitives: boundary paths of the failed bicomp, the
//! highest x-y path, DFS tree paths, and the unembedded certificate and
//! pending back edges. Minors A-D and the symmetric minor E produce their
//! witness directly; the asymmetric minor E refinements (E1-E4) and mixed
//! x-y path attachments mark a superset of the obstruction and hand it to
//! an edge-minimisation pass whose result is a Kuratowski subdivision by
//! construction.

use alloc::vec::Vec;

use hashbrown::HashSet;

use super::{
    add_marked_unembedded_edges, classify_witness, external_certificate, init_context,
    mark_dfs_path, mark_ext_face_path, mark_face_sides, mark_highest_xy_path, mark_unembedded_edge,
    mark_z_to_r_path, pending_for, pending_in_subtree, IsolatorContext, Minor,
};
use crate::embed::bicomp::{external_face_step, is_externally_active, join_bicomps};
use crate::embed::{embed_with_hooks, EmbedMode, EmbedOutcome, ObstructionKind};
use crate::error::GraphError;
use crate::extend::DecisionOnly;
use crate::graph::store::FaceSide;
use crate::graph::{Graph, Index, NIL};

pub(crate) fn isolate_kuratowski_subgraph(
    g: &mut Graph,
    v: Index,
    mode: EmbedMode,
) -> Result<ObstructionKind, GraphError> {
    let mut ctx = init_context(g, v, mode)?;
    choose_minor(g, &mut ctx)?;
    tracing::debug!(minor = ?ctx.minor, r = ctx.r, x = ctx.x, y = ctx.y, w = ctx.w, "isolating");

    let kind = match ctx.minor {
        Minor::A => isolate_minor_a(g, &mut ctx)?,
        Minor::B => isolate_minor_b(g, &mut ctx)?,
        Minor::C => isolate_minor_c(g, &mut ctx)?,
        Minor::D => isolate_minor_d(g, &mut ctx)?,
        Minor::E => isolate_minor_e_symmetric(g, &mut ctx)?,
        Minor::E1 | Minor::E2 | Minor::E3 | Minor::E4 => isolate_by_minimisation(g, &mut ctx)?,
    };
    Ok(kind)
}

/// Classify the failure. Follows the fixed test order: A (failure on a
/// descendant bicomp), B (externally active pertinent child bicomp of
/// `w`), then the highest x-y path decides C (attachment above a
/// stopper), D (path from the x-y path interior to the root), and the
/// minor E family otherwise.
fn choose_minor(g: &mut Graph, ctx: &mut IsolatorContext) -> Result<(), GraphError> {
    let v = ctx.v;
    if g.v[g.root_child(ctx.r)].dfs_parent != v {
        ctx.minor = Minor::A;
        return Ok(());
    }
    let phead = g.v[ctx.w].pertinent_bicomp_list;
    if phead != NIL {
        let tail = g.bicomp_lists.last(phead);
        if g.v[tail].lowpoint < v {
            ctx.minor = Minor::B;
            return Ok(());
        }
    }

    mark_face_sides(g, ctx);
    mark_highest_xy_path(g, ctx)?;
    let px_high = g.v[ctx.px].face_side == FaceSide::HighRxw;
    let py_high = g.v[ctx.py].face_side == FaceSide::HighRyw;
    if px_high || py_high {
        ctx.minor = Minor::C;
        return Ok(());
    }
    mark_z_to_r_path(g, ctx)?;
    if ctx.z != NIL {
        ctx.minor = Minor::D;
        return Ok(());
    }

    // Minor E family. Gather w's external activity and scan the lower
    // face between the path attachments for other externally active
    // vertices.
    if is_externally_active(g, ctx.w, v, EmbedMode::Planar) {
        let (uz, dz) = external_certificate(g, ctx.w, v)?;
        ctx.uz = uz;
        ctx.dz = dz;
    }
    let below = externally_active_below_path(g, ctx);
    ctx.minor = if below != NIL {
        Minor::E1
    } else if ctx.uz == NIL {
        // w not externally active and nothing else below the path; the
        // symmetric K5 pattern cannot close, so fall back
        Minor::E2
    } else if ctx.uz > ctx.ux.max(ctx.uy) {
        Minor::E2
    } else if ctx.ux != ctx.uy {
        Minor::E3
    } else if ctx.px != ctx.x || ctx.py != ctx.y {
        Minor::E4
    } else {
        Minor::E
    };
    Ok(())
}

/// First externally active vertex strictly between the x-y path
/// attachments on the lower external face, other than `w`.
fn externally_active_below_path(g: &Graph, ctx: &IsolatorContext) -> Index {
    if ctx.px == NIL || ctx.py == NIL {
        return NIL;
    }
    let mut inbound = 1usize;
    let mut z = external_face_step(g, ctx.r, &mut inbound);
    while z != ctx.px {
        z = external_face_step(g, z, &mut inbound);
    }
    loop {
        z = external_face_step(g, z, &mut inbound);
        if z == ctx.py {
            return NIL;
        }
        if z != ctx.w && is_externally_active(g, z, ctx.v, EmbedMode::Planar) {
            return z;
        }
    }
}

// ---------------------------------------------------------------------------
// Direct recipes
// ---------------------------------------------------------------------------

/// Finish a recipe: materialise the marked unembedded edges, reattach all
/// bicomps, and drop everything unmarked.
fn finish(g: &mut Graph) {
    join_bicomps(g);
    add_marked_unembedded_edges(g);
    super::delete_unmarked(g);
}

/// Minor A: the Walkdown was blocked on a descendant bicomp. The witness
/// is that bicomp's boundary plus the tree spine from its cut vertex up
/// past `v` to the stoppers' ancestors, with the three unembedded edges
/// closing the K3,3.
fn isolate_minor_a(g: &mut Graph, ctx: &mut IsolatorContext) -> Result<ObstructionKind, GraphError> {
    ctx.dw = pending_for(g, ctx.v, ctx.w)?;
    mark_ext_face_path(g, ctx.r, ctx.r, ctx.r)?;
    mark_dfs_path(g, ctx.ux.min(ctx.uy), ctx.r)?;
    mark_descendant_paths(g, ctx)?;
    mark_unembedded_edge(g, ctx.ux, ctx.dx)?;
    mark_unembedded_edge(g, ctx.uy, ctx.dy)?;
    mark_unembedded_edge(g, ctx.v, ctx.dw)?;
    finish(g);
    Ok(ObstructionKind::K33)
}

/// Minor B: `w` owns an externally active pertinent child bicomp, so both
/// the pending edge and an external connection descend through it. The
/// ancestor chain between the outermost certificate endpoints forms the
/// third branch path of the K3,3.
fn isolate_minor_b(g: &mut Graph, ctx: &mut IsolatorContext) -> Result<ObstructionKind, GraphError> {
    let c_b = g.bicomp_lists.last(g.v[ctx.w].pertinent_bicomp_list);
    ctx.dw = pending_in_subtree(g, ctx.v, c_b)?;
    let (uz, dz) = external_certificate(g, c_b, ctx.v)?;
    ctx.uz = uz;
    ctx.dz = dz;

    let u_min = ctx.ux.min(ctx.uy).min(uz);
    let u_max = ctx.ux.max(ctx.uy).max(uz);
    mark_dfs_path(g, u_min, u_max)?;
    mark_ext_face_path(g, ctx.r, ctx.r, ctx.r)?;
    mark_descendant_paths(g, ctx)?;
    mark_dfs_path(g, ctx.w, ctx.dz)?;
    mark_unembedded_edge(g, ctx.ux, ctx.dx)?;
    mark_unembedded_edge(g, ctx.uy, ctx.dy)?;
    mark_unembedded_edge(g, uz, dz)?;
    mark_unembedded_edge(g, ctx.v, ctx.dw)?;
    finish(g);
    Ok(ObstructionKind::K33)
}

/// Minor C: the highest x-y path attaches above a stopper. The boundary
/// is marked from the high attachment the long way around, leaving the
/// segment behind the attachment out of the witness.
fn isolate_minor_c(g: &mut Graph, ctx: &mut IsolatorContext) -> Result<ObstructionKind, GraphError> {
    let px_high = g.v[ctx.px].face_side == FaceSide::HighRxw;
    let py_high = g.v[ctx.py].face_side == FaceSide::HighRyw;

    if px_high && (py_high || ctx.py == ctx.y) {
        let stop = if py_high { ctx.py } else { ctx.y };
        mark_ext_face_path(g, ctx.r, ctx.r, stop)?;
    } else if py_high && ctx.px == ctx.x {
        mark_ext_face_path(g, ctx.r, ctx.x, ctx.r)?;
    } else {
        // mixed attachment: the direct recipe does not smooth to a clean
        // K3,3, so minimise the superset instead
        return isolate_by_minimisation(g, ctx);
    }

    ctx.dw = pending_for(g, ctx.v, ctx.w)?;
    mark_dfs_path(g, ctx.ux.min(ctx.uy), ctx.v)?;
    mark_descendant_paths(g, ctx)?;
    mark_unembedded_edge(g, ctx.ux, ctx.dx)?;
    mark_unembedded_edge(g, ctx.uy, ctx.dy)?;
    mark_unembedded_edge(g, ctx.v, ctx.dw)?;
    finish(g);
    Ok(ObstructionKind::K33)
}

/// Minor D: an interior vertex of the x-y path connects back up to the
/// root. The witness keeps the lower boundary between the stoppers, the
/// x-y path, and that connecting path; the root's boundary corners stay
/// out.
fn isolate_minor_d(g: &mut Graph, ctx: &mut IsolatorContext) -> Result<ObstructionKind, GraphError> {
    if ctx.px != ctx.x || ctx.py != ctx.y {
        return isolate_by_minimisation(g, ctx);
    }
    ctx.dw = pending_for(g, ctx.v, ctx.w)?;
    mark_ext_face_path(g, ctx.r, ctx.x, ctx.y)?;
    mark_dfs_path(g, ctx.ux.min(ctx.uy), ctx.v)?;
    mark_descendant_paths(g, ctx)?;
    mark_unembedded_edge(g, ctx.ux, ctx.dx)?;
    mark_unembedded_edge(g, ctx.uy, ctx.dy)?;
    mark_unembedded_edge(g, ctx.v, ctx.dw)?;
    finish(g);
    Ok(ObstructionKind::K33)
}

/// Symmetric minor E: both stoppers and `w` reach the same ancestor and
/// the x-y path attaches exactly at the stoppers. The full boundary, the
/// x-y path, the three external connections and the pending edge form a
/// K5 subdivision.
fn isolate_minor_e_symmetric(
    g: &mut Graph,
    ctx: &mut IsolatorContext,
) -> Result<ObstructionKind, GraphError> {
    ctx.dw = pending_for(g, ctx.v, ctx.w)?;
    mark_ext_face_path(g, ctx.r, ctx.r, ctx.r)?;
    mark_dfs_path(g, ctx.ux, ctx.v)?;
    mark_descendant_paths(g, ctx)?;
    mark_dfs_path(g, ctx.w, ctx.dz)?;
    mark_unembedded_edge(g, ctx.ux, ctx.dx)?;
    mark_unembedded_edge(g, ctx.uy, ctx.dy)?;
    mark_unembedded_edge(g, ctx.uz, ctx.dz)?;
    mark_unembedded_edge(g, ctx.v, ctx.dw)?;
    finish(g);
    Ok(ObstructionKind::K5)
}

/// Tree paths from the stoppers and the pertinent vertex down to the
/// descendant endpoints of their back edges.
fn mark_descendant_paths(g: &mut Graph, ctx: &IsolatorContext) -> Result<(), GraphError> {
    mark_dfs_path(g, ctx.x, ctx.dx)?;
    mark_dfs_path(g, ctx.y, ctx.dy)?;
    mark_dfs_path(g, ctx.w, ctx.dw)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Superset marking + edge minimisation fallback
// ---------------------------------------------------------------------------

/// Mark every structural piece the minor E family can use, reduce the
/// graph to that superset, then delete edges one at a time while the
/// remainder stays non-embeddable. The result is edge-minimal, hence a
/// Kuratowski (or outerplanarity) obstruction subdivision.
pub(crate) fn isolate_by_minimisation(
    g: &mut Graph,
    ctx: &mut IsolatorContext,
) -> Result<ObstructionKind, GraphError> {
    mark_superset(g, ctx, EmbedMode::Planar)?;
    finish(g);
    minimise_witness(g, EmbedMode::Planar)
}

pub(crate) fn mark_superset(
    g: &mut Graph,
    ctx: &mut IsolatorContext,
    mode: EmbedMode,
) -> Result<(), GraphError> {
    let v = ctx.v;
    mark_ext_face_path(g, ctx.r, ctx.r, ctx.r)?;

    ctx.dw = pending_for(g, v, ctx.w)?;
    mark_dfs_path(g, ctx.w, ctx.dw)?;
    mark_unembedded_edge(g, v, ctx.dw)?;

    let mut u_min = v;
    if ctx.ux != NIL {
        mark_dfs_path(g, ctx.x, ctx.dx)?;
        mark_unembedded_edge(g, ctx.ux, ctx.dx)?;
        u_min = u_min.min(ctx.ux);
    }
    if ctx.uy != NIL {
        mark_dfs_path(g, ctx.y, ctx.dy)?;
        mark_unembedded_edge(g, ctx.uy, ctx.dy)?;
        u_min = u_min.min(ctx.uy);
    }
    if ctx.uz != NIL {
        mark_dfs_path(g, ctx.w, ctx.dz)?;
        mark_unembedded_edge(g, ctx.uz, ctx.dz)?;
        u_min = u_min.min(ctx.uz);
    }
    let below = externally_active_below_path(g, ctx);
    if below != NIL && !mode.keeps_all_vertices_outer() {
        let (ub, db) = external_certificate(g, below, v)?;
        mark_dfs_path(g, below, db)?;
        mark_unembedded_edge(g, ub, db)?;
        u_min = u_min.min(ub);
    }
    mark_dfs_path(g, u_min, ctx.r)?;
    Ok(())
}

/// Repeatedly try deleting each edge; keep the deletion whenever the rest
/// is still non-embeddable. Every surviving edge is then critical, so the
/// survivor smooths to exactly one obstruction of the mode's family.
pub(crate) fn minimise_witness(
    g: &mut Graph,
    skeleton: EmbedMode,
) -> Result<ObstructionKind, GraphError> {
    let n = g.vertex_count();
    let edges: Vec<(Index, Index)> = g.edges().collect();
    let mut alive: Vec<bool> = alloc::vec![true; edges.len()];

    for i in 0..edges.len() {
        let mut trial = Graph::with_capacity(n);
        trial.allow_extra_edges = true;
        for (j, &(a, b)) in edges.iter().enumerate() {
            if j != i && alive[j] {
                trial.add_edge(a, b)?;
            }
        }
        let outcome = embed_with_hooks(&mut trial, skeleton, &mut DecisionOnly)?;
        if matches!(outcome, EmbedOutcome::Obstructed(_)) {
            alive[i] = false;
        }
    }

    let keep: HashSet<(Index, Index)> = edges
        .iter()
        .zip(alive.iter())
        .filter_map(|(&e, &a)| if a { Some(e) } else { None })
        .collect();
    let current: Vec<(Index, Index)> = g.edges().collect();
    if keep.len() == current.len() {
        return classify_witness(g);
    }
    // drop the non-critical edges from the witness in place
    let base = g.arc_base();
    let mut e = base;
    while e < g.nodes.len() {
        if g.nodes[e].kind != crate::graph::store::ArcKind::Free {
            let a = g.nodes[e + 1].head;
            let b = g.nodes[e].head;
            let key = (a.min(b), a.max(b));
            if !keep.contains(&key) {
                g.delete_edge(a, e);
            }
        }
        e += 2;
    }
    classify_witness(g)
}
