//! Obstruction isolation.
//!
//! When the Walkdown fails at vertex `v`, the graph is provably
//! non-embeddable; this module reduces it to a witness subgraph
//! homeomorphic to K5 or K3,3 (planar mode) or K2,3 or K4 (outerplanar
//! mode). The failure is first classified into one of the minors A-E by
//! inspecting the failed bicomp: its root, the two externally active
//! stoppers `x` and `y`, the blocked pertinent vertex `w`, and the highest
//! x-y path. Each minor then marks the vertex and edge set of its witness
//! (external-face paths, DFS tree paths, the certificate back edges that
//! prove external activity, and the pending back edge), re-joins the
//! bicomps, materialises the marked unembedded edges, and deletes
//! everything unmarked.

pub(crate) mod kuratowski;
pub(crate) mod outerplanar;

use alloc::vec::Vec;

use crate::embed::bicomp::{external_face_step, is_externally_active, is_pertinent};
use crate::embed::{EmbedMode, ObstructionKind};
use crate::error::GraphError;
use crate::graph::store::{ArcKind, FaceSide, MARK};
use crate::graph::{Graph, Index, NIL};

/// Which Walkdown failure pattern was found.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Minor {
    A,
    B,
    C,
    D,
    E,
    E1,
    E2,
    E3,
    E4,
}

/// Everything the per-minor markers need, gathered up front.
#[derive(Debug, Clone)]
pub(crate) struct IsolatorContext {
    pub v: Index,
    pub r: Index,
    pub x: Index,
    pub y: Index,
    pub w: Index,
    /// Highest x-y path attachments.
    pub px: Index,
    pub py: Index,
    /// Minor D: interior x-y path vertex with a path to the root.
    pub z: Index,
    /// Descendant endpoints of the certificate/pending back edges.
    pub dx: Index,
    pub dy: Index,
    pub dw: Index,
    pub dz: Index,
    /// Ancestor endpoints of the certificate back edges.
    pub ux: Index,
    pub uy: Index,
    pub uz: Index,
    pub minor: Minor,
}

/// Default isolator dispatch, selected by the embed mode.
pub(crate) fn isolate(
    g: &mut Graph,
    v: Index,
    mode: EmbedMode,
) -> Result<ObstructionKind, GraphError> {
    if mode.keeps_all_vertices_outer() {
        outerplanar::isolate_outerplanar_obstruction(g, v, mode)
    } else {
        kuratowski::isolate_kuratowski_subgraph(g, v, mode)
    }
}

// ---------------------------------------------------------------------------
// Context initialization
// ---------------------------------------------------------------------------

/// Locate the bicomp the Walkdown failed on. If the merge stack still
/// holds descent frames the failure happened inside a descendant bicomp
/// and the deepest frame names its root; otherwise it happened on one of
/// `v`'s own child bicomps, found by climbing from any still-unembedded
/// back-edge target.
pub(crate) fn find_failed_root(g: &mut Graph, v: Index) -> Result<Index, GraphError> {
    if !g.stack.is_empty() {
        let (r, _r_out) = g
            .stack
            .pop2()
            .ok_or(GraphError::InternalInvariant("odd merge stack at failure"))?;
        g.stack.clear();
        return Ok(r);
    }
    let fwd = g.v[v].fwd_arc_list;
    if fwd == NIL {
        return Err(GraphError::InternalInvariant("isolator without pertinence"));
    }
    let mut c = g.nodes[fwd].head;
    while g.v[c].dfs_parent != v {
        c = g.v[c].dfs_parent;
        if c == NIL {
            return Err(GraphError::InternalInvariant("failure target above v"));
        }
    }
    Ok(g.root_copy(c))
}

/// Make the rotations within `r`'s bicomp consistent so faces can be
/// traced: walk the bicomp's internal DFS tree from the root, accumulate
/// sign products, and physically reverse every vertex carrying -1.
pub(crate) fn orient_bicomp(g: &mut Graph, r: Index) {
    let mut pending: Vec<(Index, i8)> = alloc::vec![(r, 1)];
    while let Some((z, sign)) = pending.pop() {
        if sign < 0 {
            let arcs: Vec<Index> = g.arcs_of(z).collect();
            for e in arcs {
                g.nodes[e].link.swap(0, 1);
            }
            g.nodes[z].link.swap(0, 1);
        }
        let arcs: Vec<Index> = g.arcs_of(z).collect();
        for e in arcs {
            if g.nodes[e].kind == ArcKind::TreeChild {
                let child = g.nodes[e].head;
                pending.push((child, sign * g.nodes[e].sign));
            }
        }
    }
}

/// First externally active vertex on each side of `r`'s external face.
pub(crate) fn find_active_vertices(
    g: &Graph,
    v: Index,
    r: Index,
    mode: EmbedMode,
) -> (Index, Index) {
    let mut xin = 1usize;
    let mut x = external_face_step(g, r, &mut xin);
    while !is_externally_active(g, x, v, mode) {
        x = external_face_step(g, x, &mut xin);
    }
    let mut yin = 0usize;
    let mut y = external_face_step(g, r, &mut yin);
    while !is_externally_active(g, y, v, mode) {
        y = external_face_step(g, y, &mut yin);
    }
    (x, y)
}

/// First pertinent vertex on the lower external face, walking onward from
/// `x` away from the root.
pub(crate) fn find_pertinent_vertex(g: &Graph, r: Index, x: Index) -> Index {
    // re-walk from r to x to recover the entry slot, then continue
    let mut win = 1usize;
    let mut w = external_face_step(g, r, &mut win);
    while w != x {
        w = external_face_step(g, w, &mut win);
    }
    loop {
        w = external_face_step(g, w, &mut win);
        if is_pertinent(g, w) {
            return w;
        }
        debug_assert_ne!(w, r, "no pertinent vertex on failed bicomp");
    }
}

/// Mark the external-face sides of the failed bicomp relative to the
/// stoppers: strictly-above-x/y is High, from the stopper down to (but
/// excluding) `w` is Low.
pub(crate) fn mark_face_sides(g: &mut Graph, ctx: &IsolatorContext) {
    for side in 0..2usize {
        let (stopper, high, low) = if side == 0 {
            (ctx.x, FaceSide::HighRxw, FaceSide::LowRxw)
        } else {
            (ctx.y, FaceSide::HighRyw, FaceSide::LowRyw)
        };
        let mut inbound = 1 - side;
        let mut z = external_face_step(g, ctx.r, &mut inbound);
        let mut mark = high;
        while z != ctx.w {
            if z == stopper {
                mark = low;
            }
            g.v[z].face_side = mark;
            z = external_face_step(g, z, &mut inbound);
        }
    }
    g.v[ctx.w].face_side = FaceSide::None;
}

/// Build the context common to every minor: failed root, stoppers,
/// pertinent vertex, external-activity certificates, pending edge target.
pub(crate) fn init_context(
    g: &mut Graph,
    v: Index,
    mode: EmbedMode,
) -> Result<IsolatorContext, GraphError> {
    let r = find_failed_root(g, v)?;
    orient_bicomp(g, r);
    g.fill_visited(NIL);
    for slot in 0..2 * g.vertex_count() {
        g.v[slot].face_side = FaceSide::None;
    }
    let (x, y) = find_active_vertices(g, v, r, mode);
    let w = find_pertinent_vertex(g, r, x);
    let mut ctx = IsolatorContext {
        v,
        r,
        x,
        y,
        w,
        px: NIL,
        py: NIL,
        z: NIL,
        dx: NIL,
        dy: NIL,
        dw: NIL,
        dz: NIL,
        ux: NIL,
        uy: NIL,
        uz: NIL,
        minor: Minor::E,
    };
    if !mode.keeps_all_vertices_outer() {
        let (ux, dx) = external_certificate(g, x, v)?;
        let (uy, dy) = external_certificate(g, y, v)?;
        ctx.ux = ux;
        ctx.dx = dx;
        ctx.uy = uy;
        ctx.dy = dy;
    }
    Ok(ctx)
}

// ---------------------------------------------------------------------------
// Certificates and pending edges
// ---------------------------------------------------------------------------

/// The unembedded back edge `(u, d)` with `u < v` that makes `z`
/// externally active: either a direct back edge from `z`, or one found by
/// descending the low-point chain of separated children.
pub(crate) fn external_certificate(
    g: &Graph,
    z: Index,
    v: Index,
) -> Result<(Index, Index), GraphError> {
    let mut d = z;
    loop {
        if g.v[d].least_ancestor < v {
            return Ok((g.v[d].least_ancestor, d));
        }
        let c = g.v[d].separated_dfs_child_list;
        if c == NIL || g.v[c].lowpoint >= v {
            return Err(GraphError::InternalInvariant(
                "vertex not externally active",
            ));
        }
        d = c;
    }
}

/// The pending back edge from `v` into the subtree rooted at `sub`:
/// returns its descendant endpoint.
pub(crate) fn pending_in_subtree(g: &Graph, v: Index, sub: Index) -> Result<Index, GraphError> {
    let last = g.v[sub].subtree_last;
    let head = g.v[v].fwd_arc_list;
    if head != NIL {
        let mut e = head;
        loop {
            let d = g.nodes[e].head;
            if d >= sub && d <= last {
                return Ok(d);
            }
            e = g.nodes[e].link[0];
            if e == head {
                break;
            }
        }
    }
    Err(GraphError::InternalInvariant("no pending edge in subtree"))
}

/// The pending back edge that makes `w` pertinent: `(v, w)` itself when
/// direct, otherwise one reaching into a pertinent child bicomp's subtree.
pub(crate) fn pending_for(g: &Graph, v: Index, w: Index) -> Result<Index, GraphError> {
    if g.v[w].adjacent_to != NIL {
        return Ok(w);
    }
    let c = g.v[w].pertinent_bicomp_list;
    if c == NIL {
        return Err(GraphError::InternalInvariant("w not pertinent"));
    }
    pending_in_subtree(g, v, c)
}

// ---------------------------------------------------------------------------
// Marking primitives
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn mark_vertex(g: &mut Graph, z: Index) {
    g.nodes[z].visited = MARK;
}

#[inline]
pub(crate) fn mark_arc_pair(g: &mut Graph, e: Index) {
    g.nodes[e].visited = MARK;
    let t = g.twin(e);
    g.nodes[t].visited = MARK;
}

/// Mark the external-face path from `from` to `to` on the bicomp rooted
/// at `r`, in the direction-0 boundary order (root, x side, `w`, y side,
/// root). The walk always starts at the root, since only the root's exit
/// slots are known without an entry direction; marking begins at `from`.
/// `from == to == r` marks the whole boundary cycle.
pub(crate) fn mark_ext_face_path(
    g: &mut Graph,
    r: Index,
    from: Index,
    to: Index,
) -> Result<(), GraphError> {
    let mut inbound = 1usize;
    let mut z = r;
    let mut marking = from == r;
    if marking {
        mark_vertex(g, r);
    }
    let limit = 2 * g.nodes.len();
    for _ in 0..limit {
        let arc = g.nodes[z].link[1 - inbound];
        z = external_face_step(g, z, &mut inbound);
        if marking {
            mark_arc_pair(g, arc);
        } else if z == from {
            marking = true;
        }
        if marking {
            mark_vertex(g, z);
            if z == to {
                return Ok(());
            }
        }
    }
    Err(GraphError::InternalInvariant("unterminated face walk"))
}

/// Mark the DFS tree path from `descendant` up to `ancestor`. A root copy
/// as the descendant stands for the cut vertex it will be joined into:
/// the climb starts at the root's parent copy.
pub(crate) fn mark_dfs_path(
    g: &mut Graph,
    ancestor: Index,
    descendant: Index,
) -> Result<(), GraphError> {
    let mut z = if g.is_root_copy(descendant) {
        g.v[g.root_child(descendant)].dfs_parent
    } else {
        descendant
    };
    mark_vertex(g, z);
    while z != ancestor {
        let p = g.v[z].dfs_parent;
        if p == NIL {
            return Err(GraphError::InternalInvariant("dfs path missed ancestor"));
        }
        let mut tree_arc = NIL;
        for e in g.arcs_of(z) {
            if g.nodes[e].kind == ArcKind::TreeParent {
                tree_arc = e;
                break;
            }
        }
        if tree_arc == NIL {
            return Err(GraphError::InternalInvariant("tree arc missing"));
        }
        mark_arc_pair(g, tree_arc);
        z = p;
        mark_vertex(g, z);
    }
    Ok(())
}

/// Mark the unembedded back edge `(u, d)`: locate its forward arc on
/// `u`'s forward-arc list and mark both arc slots and both endpoints.
pub(crate) fn mark_unembedded_edge(g: &mut Graph, u: Index, d: Index) -> Result<(), GraphError> {
    let head = g.v[u].fwd_arc_list;
    if head != NIL {
        let mut e = head;
        loop {
            if g.nodes[e].head == d {
                mark_arc_pair(g, e);
                mark_vertex(g, u);
                mark_vertex(g, d);
                return Ok(());
            }
            e = g.nodes[e].link[0];
            if e == head {
                break;
            }
        }
    }
    Err(GraphError::InternalInvariant("unembedded edge not found"))
}

/// Move every marked unembedded forward arc into the adjacency lists (the
/// witness needs the certificate and pending edges as real edges), then
/// discard every unmarked unembedded arc pair.
pub(crate) fn add_marked_unembedded_edges(g: &mut Graph) {
    let n = g.vertex_count();
    for u in 0..n {
        let mut head = g.v[u].fwd_arc_list;
        while head != NIL {
            let e = head;
            crate::embed::bicomp::remove_fwd_arc(g, u, e);
            let t = g.twin(e);
            if g.nodes[e].visited == MARK {
                let d = g.nodes[e].head;
                g.nodes[t].head = u;
                g.nodes[e].kind = ArcKind::Back;
                g.nodes[t].kind = ArcKind::Back;
                g.append_arc(u, e);
                g.append_arc(d, t);
            } else {
                let first = e.min(t);
                g.nodes[first].kind = ArcKind::Free;
                g.nodes[first + 1].kind = ArcKind::Free;
                g.drop_edge_slot(first);
            }
            head = g.v[u].fwd_arc_list;
        }
    }
}

/// Delete every embedded edge that was not marked. Unmarked vertices end
/// up isolated, which is how vertex deletion shows in an arena graph.
pub(crate) fn delete_unmarked(g: &mut Graph) {
    let base = g.arc_base();
    let end = g.nodes.len();
    let mut e = base;
    while e < end {
        if g.nodes[e].kind != ArcKind::Free
            && g.nodes[e].visited != MARK
            && g.nodes[e].link != [NIL, NIL]
        {
            let tail = g.nodes[e + 1].head;
            g.delete_edge(tail, e);
        }
        e += 2;
    }
}

// ---------------------------------------------------------------------------
// The highest x-y path and the z-to-r path
// ---------------------------------------------------------------------------

/// Splice arc `a` out of its list, leaving its own links intact so it can
/// be spliced back in reverse order.
fn splice_out(g: &mut Graph, a: Index) {
    let [next, prev] = g.nodes[a].link;
    g.nodes[prev].link[0] = next;
    g.nodes[next].link[1] = prev;
}

fn splice_in(g: &mut Graph, a: Index) {
    let [next, prev] = g.nodes[a].link;
    g.nodes[prev].link[0] = a;
    g.nodes[next].link[1] = a;
}

fn hide_edge(g: &mut Graph, e: Index) {
    splice_out(g, e);
    let t = g.twin(e);
    splice_out(g, t);
}

fn restore_edge(g: &mut Graph, e: Index) {
    let t = g.twin(e);
    splice_in(g, t);
    splice_in(g, e);
}

/// One step around a proper face. Entering `head(e)` via arc `e`, the
/// exit arc is the rotation neighbor of `e`'s twin (skipping the vertex
/// sentinel) in direction `h` (0 or 1). With consistent rotations one
/// direction traces every face clockwise and the other counter-clockwise.
#[inline]
fn face_step(g: &Graph, e: Index, h: usize) -> Index {
    let z = g.nodes[e].head;
    let t = g.twin(e);
    let next = g.nodes[t].link[h];
    if next == z {
        g.nodes[z].link[h]
    } else {
        next
    }
}

/// Find and mark the highest x-y path: the obstructing path connecting
/// the two sides of the external face through the interior of the failed
/// bicomp, as close to the root as possible.
///
/// Temporarily hides the root's arcs, which merges the faces incident to
/// the root into the external face; walking that merged boundary from the
/// x side, the path is the stretch between the last x-side attachment and
/// the first y-side contact. Interior path vertices are tagged
/// [`FaceSide::XyPath`]; `px`/`py` keep their side tags for the minor C
/// and E4 tests.
pub(crate) fn mark_highest_xy_path(
    g: &mut Graph,
    ctx: &mut IsolatorContext,
) -> Result<(), GraphError> {
    let r = ctx.r;
    // boundary neighbor on the x side and the slot its (about to be
    // hidden) root arc occupies; that slot tells us which rotation
    // direction continues into the merged face
    let mut s1 = 1usize;
    let z1 = external_face_step(g, r, &mut s1);
    let h = if s1 == 0 { 0 } else { 1 };

    let mut hidden: Vec<Index> = Vec::new();
    loop {
        let e = g.nodes[r].link[0];
        if e == r {
            break;
        }
        hide_edge(g, e);
        hidden.push(e);
    }

    let mut path: Vec<(Index, Index)> = alloc::vec![(z1, NIL)];
    // first exit: the arc now occupying the hidden twin's old slot
    let mut arc = g.nodes[z1].link[s1];
    let limit = 2 * g.nodes.len();
    let mut found = false;
    for _ in 0..limit {
        let z = g.nodes[arc].head;
        match g.v[z].face_side {
            FaceSide::HighRxw | FaceSide::LowRxw => {
                // still on the x side: the path must restart here
                path.clear();
                path.push((z, NIL));
            }
            FaceSide::HighRyw | FaceSide::LowRyw => {
                path.push((z, arc));
                found = true;
            }
            _ => {
                // keep the path simple: a revisit trims the detour
                if let Some(pos) = path.iter().position(|&(p, _)| p == z) {
                    path.truncate(pos + 1);
                } else {
                    path.push((z, arc));
                }
            }
        }
        if found {
            break;
        }
        arc = face_step(g, arc, h);
    }

    for e in hidden.into_iter().rev() {
        restore_edge(g, e);
    }
    if !found {
        return Err(GraphError::InternalInvariant("no highest x-y path"));
    }

    ctx.px = path.first().map_or(NIL, |&(p, _)| p);
    ctx.py = path.last().map_or(NIL, |&(p, _)| p);
    for (i, &(p, arc)) in path.iter().enumerate() {
        mark_vertex(g, p);
        if arc != NIL {
            mark_arc_pair(g, arc);
        }
        if i != 0 && i != path.len() - 1 {
            g.v[p].face_side = FaceSide::XyPath;
        }
    }
    Ok(())
}

/// After the x-y path is marked, look for a path from one of its interior
/// vertices up to the root. Every face incident to the root is traced;
/// within a face, the stretch between its last x-y path contact and the
/// root is the candidate. When the contact is an interior path vertex the
/// stretch is the minor D obstruction: it is marked and `ctx.z` is set.
pub(crate) fn mark_z_to_r_path(
    g: &mut Graph,
    ctx: &mut IsolatorContext,
) -> Result<(), GraphError> {
    let r = ctx.r;
    let starts: Vec<Index> = g.arcs_of(r).collect();
    let limit = 2 * g.nodes.len();
    for start in starts {
        let mut contact = NIL;
        let mut stretch: Vec<(Index, Index)> = Vec::new();
        let mut arc = start;
        let mut closing = NIL;
        for _ in 0..limit {
            let z = g.nodes[arc].head;
            if z == r && arc != start {
                closing = arc;
                break;
            }
            if g.v[z].face_side == FaceSide::XyPath || z == ctx.px || z == ctx.py {
                contact = z;
                stretch.clear();
            } else if z != r {
                stretch.push((z, arc));
            }
            arc = face_step(g, arc, 0);
            if arc == start {
                break;
            }
        }
        if contact != NIL && g.v[contact].face_side == FaceSide::XyPath {
            ctx.z = contact;
            mark_vertex(g, contact);
            for &(p, path_arc) in &stretch {
                mark_vertex(g, p);
                mark_arc_pair(g, path_arc);
            }
            mark_vertex(g, r);
            if closing != NIL {
                mark_arc_pair(g, closing);
            }
            return Ok(());
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Witness classification
// ---------------------------------------------------------------------------

/// Classify a finished witness by the degrees of its branch vertices
/// after smoothing degree-2 chains: 5 vertices of degree 4 is a K5, 4 of
/// degree 3 a K4, 6 of degree 3 a K3,3, and 2 of degree 3 a K2,3.
pub(crate) fn classify_witness(g: &Graph) -> Result<ObstructionKind, GraphError> {
    let n = g.vertex_count();
    let mut deg3 = 0usize;
    let mut deg4 = 0usize;
    for z in 0..n {
        match g.neighbors(z).count() {
            0..=2 => {}
            3 => deg3 += 1,
            4 => deg4 += 1,
            _ => return Err(GraphError::InternalInvariant("witness degree > 4")),
        }
    }
    match (deg3, deg4) {
        (0, 5) => Ok(ObstructionKind::K5),
        (6, 0) => Ok(ObstructionKind::K33),
        (4, 0) => Ok(ObstructionKind::K4),
        (2, 0) => Ok(ObstructionKind::K23),
        _ => Err(GraphError::InternalInvariant("unrecognised witness shape")),
    }
}
