//! Depth-first preprocessing.
//!
//! One pass computes DFI numbering, tree/back arc classification,
//! least-ancestor and low-point values, then renumbers the vertex arena so
//! that index equals DFI (undone by `sort_vertices` after the embed).
//! Two follow-up passes bucket-sort each vertex's separated DFS child list
//! by child low-point and thread the unembedded forward arcs into per
//! vertex lists ordered by descendant DFI, and a final pass rebuilds the
//! adjacency lists as the forest of trivial tree-edge bicomps the main
//! loop starts from.

use alloc::vec::Vec;

use crate::error::GraphError;
use crate::graph::store::ArcKind;
use crate::graph::{Graph, Index, NIL};

/// Run the whole preprocessing pipeline. After this call the graph is
/// DFI-ordered and every tree edge `(parent, child)` is embedded as the
/// trivial bicomp `{root_copy(child), child}`.
pub(crate) fn preprocess(g: &mut Graph) -> Result<(), GraphError> {
    for slot in 0..2 * g.vertex_count() {
        g.v[slot].reset_keeping_user();
    }
    g.bicomp_lists.reset();
    g.child_lists.reset();
    g.stack.clear();
    perform_dfs(g)?;
    build_separated_child_lists(g);
    build_fwd_arc_lists(g);
    create_tree_embedding(g);
    Ok(())
}

/// DFS numbering, arc classification, least-ancestor and low-point.
///
/// Iterative (explicit stack); handles disconnected inputs by restarting
/// from every undiscovered vertex. Ends by renumbering the arena into DFI
/// order, after which `v < w` means `v` was discovered before `w` and all
/// DFI-valued fields coincide with vertex indices.
pub(crate) fn perform_dfs(g: &mut Graph) -> Result<(), GraphError> {
    let n = g.vertex_count();
    // stale classification from an earlier embed would confuse the arc
    // typing below
    for slot in g.arc_base()..g.nodes.len() {
        if g.nodes[slot].kind != ArcKind::Free {
            g.nodes[slot].kind = ArcKind::None;
        }
        g.nodes[slot].sign = 1;
        g.nodes[slot].visited = NIL;
    }
    let mut dfi_of = alloc::vec![NIL; n];
    let mut perm = alloc::vec![NIL; n];
    let mut next_dfi = 0usize;
    // (vertex, next adjacency arc to look at)
    let mut stack: Vec<(Index, Index)> = Vec::with_capacity(n);

    for root in 0..n {
        if dfi_of[root] != NIL {
            continue;
        }
        dfi_of[root] = next_dfi;
        perm[next_dfi] = root;
        next_dfi += 1;
        g.v[root].least_ancestor = NIL;
        g.v[root].lowpoint = dfi_of[root];
        stack.push((root, g.nodes[root].link[0]));

        while let Some(&(v, e)) = stack.last() {
            if e == v {
                // adjacency exhausted: fold v's low-point into its parent
                stack.pop();
                let p = g.v[v].dfs_parent;
                if p != NIL {
                    let lp = g.v[v].lowpoint;
                    if lp < g.v[p].lowpoint {
                        g.v[p].lowpoint = lp;
                    }
                }
                continue;
            }
            if let Some(top) = stack.last_mut() {
                top.1 = g.nodes[e].link[0];
            }
            let w = g.nodes[e].head;
            if dfi_of[w] == NIL {
                g.nodes[e].kind = ArcKind::TreeChild;
                let t = g.twin(e);
                g.nodes[t].kind = ArcKind::TreeParent;
                g.v[w].dfs_parent = v;
                dfi_of[w] = next_dfi;
                perm[next_dfi] = w;
                next_dfi += 1;
                g.v[w].least_ancestor = NIL;
                g.v[w].lowpoint = dfi_of[w];
                stack.push((w, g.nodes[w].link[0]));
            } else if g.nodes[e].kind == ArcKind::None && dfi_of[w] < dfi_of[v] {
                // back edge from v up to the ancestor w
                g.nodes[e].kind = ArcKind::Back;
                let t = g.twin(e);
                g.nodes[t].kind = ArcKind::Forward;
                let wa = dfi_of[w];
                // NIL is usize::MAX, so an unset least-ancestor always loses
                if wa < g.v[v].least_ancestor {
                    g.v[v].least_ancestor = wa;
                }
                if wa < g.v[v].lowpoint {
                    g.v[v].lowpoint = wa;
                }
            }
        }
    }

    for v in 0..n {
        g.v[v].dfi = dfi_of[v];
    }
    g.apply_order(&perm);
    g.dfi_ordered = true;
    // With index == DFI, a subtree is a contiguous range; compute its last
    // index bottom-up.
    for v in 0..n {
        g.v[v].subtree_last = v;
    }
    for v in (1..n).rev() {
        let p = g.v[v].dfs_parent;
        if p != NIL && g.v[v].subtree_last > g.v[p].subtree_last {
            g.v[p].subtree_last = g.v[v].subtree_last;
        }
    }
    for v in 0..n {
        if g.v[v].dfi != v {
            return Err(GraphError::InternalInvariant("DFI reorder mismatch"));
        }
    }
    Ok(())
}

/// Bucket-sort every vertex's DFS children by low-point, producing the
/// separated child lists the activity predicates read. O(n).
fn build_separated_child_lists(g: &mut Graph) {
    let n = g.vertex_count();
    let mut bucket_head = alloc::vec![NIL; n];
    let mut bucket_next = alloc::vec![NIL; n];
    // children enter their low-point's bucket; scanning children in
    // descending index keeps each bucket in ascending child order
    for c in (0..n).rev() {
        if g.v[c].dfs_parent != NIL {
            let lp = g.v[c].lowpoint;
            bucket_next[c] = bucket_head[lp];
            bucket_head[lp] = c;
        }
    }
    for lp in 0..n {
        let mut c = bucket_head[lp];
        while c != NIL {
            let p = g.v[c].dfs_parent;
            let head = g.v[p].separated_dfs_child_list;
            g.v[p].separated_dfs_child_list = g.child_lists.append(head, c);
            c = bucket_next[c];
        }
    }
}

/// Pull every forward arc out of its ancestor's adjacency list and thread
/// it onto that ancestor's forward-arc list. Scanning descendants in
/// ascending DFI order leaves each list sorted by descendant DFI, which is
/// the order the Walkup consumes them in. O(n + m).
fn build_fwd_arc_lists(g: &mut Graph) {
    let n = g.vertex_count();
    for w in 0..n {
        let arcs: Vec<Index> = g.arcs_of(w).collect();
        for e in arcs {
            if g.nodes[e].kind != ArcKind::Back {
                continue;
            }
            let u = g.nodes[e].head;
            let fwd = g.twin(e);
            g.remove_arc(u, fwd);
            let head = g.v[u].fwd_arc_list;
            if head == NIL {
                g.nodes[fwd].link = [fwd, fwd];
                g.v[u].fwd_arc_list = fwd;
            } else {
                let tail = g.nodes[head].link[1];
                g.nodes[fwd].link = [head, tail];
                g.nodes[tail].link[0] = fwd;
                g.nodes[head].link[1] = fwd;
            }
        }
    }
}

/// Re-anchor each tree edge `(parent, child)` as the trivial bicomp
/// `{root_copy(child), child}`: the down arc moves into the root copy's
/// adjacency, the up arc becomes the child's only embedded arc, and both
/// heads are rewritten to the virtual pair. Back arcs leave the adjacency
/// lists entirely; the Walkdown re-inserts them at their embedding
/// positions.
fn create_tree_embedding(g: &mut Graph) {
    let n = g.vertex_count();
    let mut up_arc = alloc::vec![NIL; n];
    for c in 0..n {
        if g.v[c].dfs_parent == NIL {
            continue;
        }
        for e in g.arcs_of(c) {
            if g.nodes[e].kind == ArcKind::TreeParent {
                up_arc[c] = e;
                break;
            }
        }
    }
    // reset every vertex and root-copy adjacency anchor
    for slot in 0..2 * n {
        g.nodes[slot].link = [slot, slot];
    }
    for c in 0..n {
        let e_up = up_arc[c];
        if e_up == NIL {
            continue;
        }
        let r = g.root_copy(c);
        let e_down = g.twin(e_up);
        g.nodes[e_up].head = r;
        g.nodes[e_down].head = c;
        g.append_arc(c, e_up);
        g.append_arc(r, e_down);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_graph(n: usize) -> Graph {
        let mut g = Graph::with_capacity(n);
        for v in 1..n {
            g.add_edge(v - 1, v).unwrap();
        }
        g
    }

    #[test]
    fn test_dfs_path() {
        let mut g = path_graph(4);
        perform_dfs(&mut g).unwrap();
        for v in 0..4 {
            assert_eq!(g.v[v].dfi, v);
            assert_eq!(g.v[v].lowpoint, v);
        }
        assert_eq!(g.v[0].dfs_parent, NIL);
        assert_eq!(g.v[3].dfs_parent, 2);
    }

    #[test]
    fn test_dfs_cycle_lowpoint() {
        let mut g = Graph::with_capacity(4);
        for (u, v) in [(0, 1), (1, 2), (2, 3), (3, 0)] {
            g.add_edge(u, v).unwrap();
        }
        perform_dfs(&mut g).unwrap();
        // every vertex on the cycle can reach the root via the back edge
        assert_eq!(g.v[1].lowpoint, 0);
        assert_eq!(g.v[2].lowpoint, 0);
        assert_eq!(g.v[3].lowpoint, 0);
        assert_eq!(g.v[3].least_ancestor, 0);
    }

    #[test]
    fn test_preprocess_builds_child_lists() {
        let mut g = path_graph(3);
        preprocess(&mut g).unwrap();
        let head = g.v[0].separated_dfs_child_list;
        assert_eq!(head, 1);
        assert_eq!(g.child_lists.get_next(head, head), NIL);
        // trivial bicomp: root copy of child 1 carries the down arc
        let r = g.root_copy(1);
        assert_eq!(g.neighbors(r).count(), 1);
        assert_eq!(g.neighbors(1).next(), Some(r));
    }

    #[test]
    fn test_fwd_arc_list_sorted() {
        // star plus chords: 0-1-2-3 path with back edges 2->0 and 3->0
        let mut g = Graph::with_capacity(4);
        for (u, v) in [(0, 1), (1, 2), (2, 3), (2, 0), (3, 0)] {
            g.add_edge(u, v).unwrap();
        }
        preprocess(&mut g).unwrap();
        let head = g.v[0].fwd_arc_list;
        assert_ne!(head, NIL);
        let first_target = g.nodes[head].head;
        let second = g.nodes[head].link[0];
        let second_target = g.nodes[second].head;
        assert!(first_target < second_target);
    }
}
