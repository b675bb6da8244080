//! Bicomp and root-copy management.
//!
//! During the main loop the graph-in-progress is a forest of biconnected
//! components joined at cut vertices. Each bicomp hangs from a virtual
//! root copy; its external face is traced arc-to-arc through the two link
//! slots of each boundary vertex. Merging identifies a root copy with its
//! parent vertex, splicing the child's adjacency chain into the parent's
//! at the merge slot, with an O(deg) physical inversion of the root plus a
//! lazy sign toggle when the child must be mirrored; the final orientation
//! pass resolves the deferred mirrors in one sweep.

use alloc::vec::Vec;

use super::EmbedMode;
use crate::error::GraphError;
use crate::graph::store::ArcKind;
use crate::graph::{Graph, Index, NIL};

/// Advance one step around the external face.
///
/// `inbound` is the link slot of `x` by which the walk entered (0 or 1);
/// the walk exits by the complement slot. Returns the next boundary vertex
/// and updates `inbound` to the entry slot at that vertex. Degree-one
/// boundary vertices bounce the walk back, which is exactly right for the
/// trivial two-vertex bicomp.
#[inline]
pub(crate) fn external_face_step(g: &Graph, x: Index, inbound: &mut usize) -> Index {
    let e = g.nodes[x].link[1 - *inbound];
    let next = g.nodes[e].head;
    let t = g.twin(e);
    *inbound = usize::from(g.nodes[next].link[0] != t);
    next
}

/// True when `w` must stay on the external face while vertices up to DFI
/// `v` are still being processed: `w` connects above `v` either directly
/// or through a separated child bicomp.
///
/// In outerplanar mode every vertex is externally active: nothing may ever
/// be enclosed.
#[inline]
pub(crate) fn is_externally_active(g: &Graph, w: Index, v: Index, mode: EmbedMode) -> bool {
    if mode.keeps_all_vertices_outer() {
        return true;
    }
    if g.v[w].least_ancestor < v {
        return true;
    }
    let head = g.v[w].separated_dfs_child_list;
    head != NIL && g.v[head].lowpoint < v
}

/// True when `w` carries an unembedded back edge to the current vertex,
/// directly or through a pertinent child bicomp.
#[inline]
pub(crate) fn is_pertinent(g: &Graph, w: Index) -> bool {
    g.v[w].adjacent_to != NIL || g.v[w].pertinent_bicomp_list != NIL
}

/// Neither pertinent nor externally active: the walk may pass over `w`.
#[inline]
pub(crate) fn is_inactive(g: &Graph, w: Index, v: Index, mode: EmbedMode) -> bool {
    !is_pertinent(g, w) && !is_externally_active(g, w, v, mode)
}

/// Physically reverse `r`'s adjacency list (sentinel and member arcs) and
/// toggle the orientation sign on the tree arc to `r`'s child, deferring
/// the mirror of the bicomp's interior to the final orientation pass.
pub(crate) fn invert_vertex(g: &mut Graph, r: Index) {
    let arcs: Vec<Index> = g.arcs_of(r).collect();
    for e in &arcs {
        g.nodes[*e].link.swap(0, 1);
    }
    g.nodes[r].link.swap(0, 1);
    let c = g.root_child(r);
    for e in arcs {
        if g.nodes[e].kind == ArcKind::TreeChild && g.nodes[e].head == c {
            g.nodes[e].sign = -g.nodes[e].sign;
            let t = g.twin(e);
            g.nodes[t].sign = -g.nodes[t].sign;
            break;
        }
    }
}

/// Merge the bicomp rooted at root copy `r` into its parent vertex `w`.
///
/// `w_in` is the link slot by which the Walkdown entered `w`; `r_out` the
/// slot by which it left `r` into the child. When the two coincide the
/// child is mirrored first, so that the walked-out side of the child ends
/// up adjacent to the walked-in side of the parent (both become interior
/// once the pending back edge closes the face).
pub(crate) fn merge_one(g: &mut Graph, w: Index, w_in: usize, r: Index, mut r_out: usize) {
    let c = g.root_child(r);
    let head = g.v[w].separated_dfs_child_list;
    g.v[w].separated_dfs_child_list = g.child_lists.delete(head, c);
    let phead = g.v[w].pertinent_bicomp_list;
    if phead != NIL && g.bicomp_lists.is_linked(c) {
        g.v[w].pertinent_bicomp_list = g.bicomp_lists.delete(phead, c);
    }

    if w_in == r_out {
        invert_vertex(g, r);
        r_out = 1 - r_out;
    }
    debug_assert_ne!(w_in, r_out);

    // arcs of the child chain now answer to w
    let arcs: Vec<Index> = g.arcs_of(r).collect();
    for &e in &arcs {
        let t = g.twin(e);
        g.nodes[t].head = w;
    }

    let outer = g.nodes[r].link[w_in];
    let inner = g.nodes[r].link[1 - w_in];
    debug_assert_ne!(outer, r, "merged a root copy with no arcs");
    let old = g.nodes[w].link[w_in];
    if old == w {
        // parent list was empty (a DFS root before its first merge)
        g.nodes[w].link = [g.nodes[r].link[0], g.nodes[r].link[1]];
        let first = g.nodes[w].link[0];
        let last = g.nodes[w].link[1];
        g.nodes[first].link[1] = w;
        g.nodes[last].link[0] = w;
    } else {
        g.nodes[w].link[w_in] = outer;
        g.nodes[outer].link[1 - w_in] = w;
        g.nodes[inner].link[w_in] = old;
        g.nodes[old].link[1 - w_in] = inner;
    }
    g.nodes[r].link = [r, r];
}

/// Pop and execute every merge frame on the stack. Frames are pushed in
/// descent order as two pairs: `(w, w_in)` then `(r, r_out)`.
pub(crate) fn merge_bicomps(
    g: &mut Graph,
    hooks: &mut dyn crate::extend::EmbedderHooks,
) -> Result<(), GraphError> {
    while !g.stack.is_empty() {
        let (r, r_out) = g
            .stack
            .pop2()
            .ok_or(GraphError::InternalInvariant("odd merge stack"))?;
        let (w, w_in) = g
            .stack
            .pop2()
            .ok_or(GraphError::InternalInvariant("short merge stack"))?;
        hooks.on_merge(g, w, w_in, r, r_out)?;
        merge_one(g, w, w_in, r, r_out);
    }
    Ok(())
}

/// Embed the pending back edge from the bicomp root `root` (a root copy of
/// the current vertex) down to the descendant `w`.
///
/// The forward arc leaves the current vertex's forward-arc list and enters
/// `root`'s adjacency at slot `root_side`; its twin enters `w`'s adjacency
/// at slot `w_in`, with its head rewritten to `root` until the enclosing
/// merge renames it. The previously walked boundary between the two
/// becomes an interior face boundary.
pub(crate) fn embed_back_edge(
    g: &mut Graph,
    cur: Index,
    root: Index,
    root_side: usize,
    w: Index,
    w_in: usize,
) -> Result<(), GraphError> {
    let fwd = g.v[w].adjacent_to;
    if fwd == NIL {
        return Err(GraphError::InternalInvariant("no pending back edge"));
    }
    remove_fwd_arc(g, cur, fwd);
    let back = g.twin(fwd);
    g.nodes[fwd].kind = ArcKind::Back;
    g.nodes[back].kind = ArcKind::Back;
    g.nodes[back].head = root;
    g.insert_arc_at(root, root_side, fwd);
    g.insert_arc_at(w, w_in, back);
    g.v[w].adjacent_to = NIL;
    Ok(())
}

/// Unthread `fwd` from `v`'s forward-arc list.
pub(crate) fn remove_fwd_arc(g: &mut Graph, v: Index, fwd: Index) {
    let next = g.nodes[fwd].link[0];
    let prev = g.nodes[fwd].link[1];
    if next == fwd {
        g.v[v].fwd_arc_list = NIL;
    } else {
        g.nodes[prev].link[0] = next;
        g.nodes[next].link[1] = prev;
        if g.v[v].fwd_arc_list == fwd {
            g.v[v].fwd_arc_list = next;
        }
    }
    g.nodes[fwd].link = [NIL, NIL];
}

/// Merge every still-standing root copy into its parent vertex. Run after
/// the main loop succeeds (the relative orientation of never-pertinent
/// bicomps is free) and by the isolator to reattach the bicomps that carry
/// marked obstruction paths.
pub(crate) fn join_bicomps(g: &mut Graph) {
    let n = g.vertex_count();
    for c in 0..n {
        let r = g.root_copy(c);
        if g.nodes[r].link[0] == r {
            continue;
        }
        let w = g.v[c].dfs_parent;
        if w == NIL {
            continue;
        }
        merge_one(g, w, 0, r, 1);
    }
}

/// Resolve the deferred mirrors: propagate sign products down the DFS
/// tree and physically reverse the adjacency of every vertex whose product
/// is negative, leaving all rotations globally consistent.
pub(crate) fn orient_vertices(g: &mut Graph) {
    let n = g.vertex_count();
    let mut orientation = alloc::vec![1i8; n];
    // vertices are in DFI order, so parents precede children
    for v in 0..n {
        let p = g.v[v].dfs_parent;
        if p == NIL {
            continue;
        }
        let mut sign = 1i8;
        for e in g.arcs_of(v) {
            if g.nodes[e].kind == ArcKind::TreeParent && g.nodes[e].head == p {
                sign = g.nodes[e].sign;
                break;
            }
        }
        orientation[v] = orientation[p] * sign;
    }
    for v in 0..n {
        if orientation[v] < 0 {
            let arcs: Vec<Index> = g.arcs_of(v).collect();
            for e in arcs {
                g.nodes[e].link.swap(0, 1);
            }
            g.nodes[v].link.swap(0, 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::dfs::preprocess;
    use super::*;

    #[test]
    fn test_external_face_trivial_bicomp() {
        let mut g = Graph::with_capacity(2);
        g.add_edge(0, 1).unwrap();
        preprocess(&mut g).unwrap();
        let r = g.root_copy(1);
        let mut inbound = 1;
        let w = external_face_step(&g, r, &mut inbound);
        assert_eq!(w, 1);
        let back = external_face_step(&g, w, &mut inbound);
        assert_eq!(back, r);
    }

    #[test]
    fn test_activity_predicates() {
        // 0-1-2 path with back edge 2->0
        let mut g = Graph::with_capacity(3);
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 2).unwrap();
        g.add_edge(2, 0).unwrap();
        preprocess(&mut g).unwrap();
        // while processing vertex 1, vertex 2 reaches above via 2->0
        assert!(is_externally_active(&g, 2, 1, EmbedMode::Planar));
        assert!(!is_externally_active(&g, 2, 0, EmbedMode::Planar));
        assert!(is_externally_active(&g, 2, 1, EmbedMode::Outerplanar));
        assert!(!is_pertinent(&g, 2));
    }
}
