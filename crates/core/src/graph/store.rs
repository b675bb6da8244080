use alloc::vec::Vec;
use core::fmt::{self, Debug, Formatter};

use super::listcoll::ListColl;
use super::stack::IndexStack;
use super::{Index, NIL};
use crate::error::GraphError;

/// Visited stamp used by the obstruction isolator to mark the subgraph that
/// must survive deletion. Distinct from every vertex id and from `NIL`.
pub(crate) const MARK: Index = usize::MAX - 1;

/// Classification of an arc slot in the unified arena.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ArcKind {
    /// Not yet classified by the DFS (or a vertex slot).
    #[default]
    None,
    /// Tree arc pointing from a DFS parent down to its child.
    TreeChild,
    /// Tree arc pointing from a DFS child up to its parent.
    TreeParent,
    /// Embedded back-edge arc.
    Back,
    /// Unembedded forward arc from an ancestor to a descendant, parked on
    /// the ancestor's forward-arc list until the Walkdown embeds it.
    Forward,
    /// Deleted arc slot waiting on the hole freelist.
    Free,
}

/// Side marking applied to external-face vertices by the isolator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum FaceSide {
    #[default]
    None,
    /// Between the bicomp root and `x`, exclusive.
    HighRxw,
    /// Between `x` and the pertinent vertex `w`, inclusive of `x`.
    LowRxw,
    /// Between the bicomp root and `y`, exclusive.
    HighRyw,
    /// Between `y` and the pertinent vertex `w`, inclusive of `y`.
    LowRyw,
    /// Interior vertex of the marked highest x-y path.
    XyPath,
}

/// One slot of the unified arena. Slots `[0..2n)` are the vertices (real
/// vertices then root copies); slots `[2n..)` are arcs. Vertex slots act as
/// the sentinels of their own circular adjacency lists, which is what makes
/// O(1) insertion at either end and O(1) orientation flip possible.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    /// For an arc: the vertex the arc points at. For a vertex slot: itself.
    pub head: Index,
    /// Circular adjacency links. During embedding, the two links of a
    /// vertex on a bicomp's outer boundary also encode the external face.
    pub link: [Index; 2],
    /// Orientation sign, flipped lazily when a child bicomp is inverted.
    pub sign: i8,
    /// Visited stamp; holds the DFI of the vertex being processed during
    /// Walkup, or [`MARK`] during obstruction isolation.
    pub visited: Index,
    pub kind: ArcKind,
}

impl Node {
    fn vertex_slot(slot: Index) -> Self {
        Self {
            head: slot,
            link: [slot, slot],
            sign: 1,
            visited: NIL,
            kind: ArcKind::None,
        }
    }
}

/// Per-vertex algorithm state, parallel to the first `2n` arena slots.
/// Root-copy entries (`[n..2n)`) use only a subset of the fields.
#[derive(Debug, Clone)]
pub(crate) struct VertexInfo {
    pub dfs_parent: Index,
    pub least_ancestor: Index,
    pub lowpoint: Index,
    pub dfi: Index,
    /// Largest DFI in this vertex's subtree; with DFI ordering the subtree
    /// is exactly the index range `[self, subtree_last]`.
    pub subtree_last: Index,
    /// Original index before DFI reordering; used by `sort_vertices`.
    pub user_index: Index,
    /// Forward arc of the pending back edge to the current vertex, set by
    /// Walkup and consumed by Walkdown.
    pub adjacent_to: Index,
    /// Head (child id) of the pertinent child bicomp list.
    pub pertinent_bicomp_list: Index,
    /// Head (child id) of the separated DFS child list, sorted by the
    /// children's low-points.
    pub separated_dfs_child_list: Index,
    /// Head arc of the unembedded forward arcs to descendants, kept in
    /// DFI order of the descendant endpoints.
    pub fwd_arc_list: Index,
    /// External-face side marking, isolator scratch.
    pub face_side: FaceSide,
}

impl VertexInfo {
    /// Clear all algorithm state, keeping only the user-numbering link.
    pub(crate) fn reset_keeping_user(&mut self) {
        *self = Self::unset(self.user_index);
    }

    fn unset(user_index: Index) -> Self {
        Self {
            dfs_parent: NIL,
            least_ancestor: NIL,
            lowpoint: NIL,
            dfi: NIL,
            subtree_last: NIL,
            user_index,
            adjacent_to: NIL,
            pertinent_bicomp_list: NIL,
            separated_dfs_child_list: NIL,
            fwd_arc_list: NIL,
            face_side: FaceSide::None,
        }
    }
}

/// Arc-arena graph with reserved root copies.
///
/// All storage is allocated by [`Graph::with_capacity`]; no operation
/// performed during an embed allocates. Arc slots are handed out in twin
/// pairs, so the twin of arc `e` is always computable as an index flip.
#[derive(Clone)]
pub struct Graph {
    n: usize,
    m: usize,
    edge_limit: usize,
    /// When set, `add_edge` may exceed `edge_limit` while capacity lasts.
    pub allow_extra_edges: bool,
    pub(crate) nodes: Vec<Node>,
    pub(crate) v: Vec<VertexInfo>,
    free_arcs: IndexStack,
    next_arc: Index,
    pub(crate) stack: IndexStack,
    pub(crate) bicomp_lists: ListColl,
    pub(crate) child_lists: ListColl,
    /// True once `embed` has renumbered vertices by DFI.
    pub(crate) dfi_ordered: bool,
}

impl Debug for Graph {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("n", &self.n)
            .field("m", &self.m)
            .finish_non_exhaustive()
    }
}

impl Graph {
    /// Create a graph on `n` vertices, reserving room for `3n - 6` edges
    /// (the planar maximum) plus slack for the drivers that deliberately
    /// overfill by one edge.
    #[must_use]
    pub fn with_capacity(n: usize) -> Self {
        let edge_limit = if n >= 3 { 3 * n - 6 } else { n.saturating_sub(1) };
        let arc_capacity = 2 * (edge_limit + 2);
        let vertex_slots = 2 * n;
        let mut nodes = Vec::with_capacity(vertex_slots + arc_capacity);
        for slot in 0..vertex_slots {
            nodes.push(Node::vertex_slot(slot));
        }
        let v = (0..vertex_slots).map(VertexInfo::unset).collect();
        Self {
            n,
            m: 0,
            edge_limit,
            allow_extra_edges: false,
            nodes,
            v,
            free_arcs: IndexStack::new(edge_limit + 2),
            next_arc: vertex_slots,
            stack: IndexStack::new(4 * vertex_slots + 8),
            bicomp_lists: ListColl::new(n),
            child_lists: ListColl::new(n),
            dfi_ordered: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.n
    }

    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.m
    }

    /// Maximum number of edges accepted without `allow_extra_edges`.
    #[inline]
    #[must_use]
    pub const fn edge_limit(&self) -> usize {
        self.edge_limit
    }

    /// First arc slot; everything below is a vertex or root-copy slot.
    #[inline]
    #[must_use]
    pub(crate) const fn arc_base(&self) -> Index {
        2 * self.n
    }

    /// The twin of arc `e`: the other direction of the same edge.
    #[inline]
    #[must_use]
    pub(crate) const fn twin(&self, e: Index) -> Index {
        let base = 2 * self.n;
        ((e - base) ^ 1) + base
    }

    /// Root copy slot for DFS child `c`.
    #[inline]
    #[must_use]
    pub(crate) const fn root_copy(&self, c: Index) -> Index {
        self.n + c
    }

    /// The DFS child owning root copy `r`.
    #[inline]
    #[must_use]
    pub(crate) const fn root_child(&self, r: Index) -> Index {
        r - self.n
    }

    #[inline]
    #[must_use]
    pub(crate) fn is_root_copy(&self, slot: Index) -> bool {
        slot >= self.n && slot < 2 * self.n
    }

    /// Add the undirected edge `(u, v)`, appending one arc to the tail of
    /// each endpoint's adjacency list. O(1).
    ///
    /// Callers are expected to supply simple graphs; duplicate edges are
    /// deduplicated by the readers, not here.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidInput`] on self-loops or out-of-range
    /// endpoints; [`GraphError::TooManyEdges`] beyond `3n - 6` unless
    /// `allow_extra_edges` is set; [`GraphError::OutOfMemory`] when the
    /// arc arena is exhausted.
    pub fn add_edge(&mut self, u: Index, v: Index) -> Result<(), GraphError> {
        if u == v || u >= self.n || v >= self.n {
            return Err(GraphError::InvalidInput);
        }
        if self.m >= self.edge_limit && !self.allow_extra_edges {
            return Err(GraphError::TooManyEdges);
        }
        let (eu, ev) = self.alloc_arc_pair()?;
        self.nodes[eu].head = v;
        self.nodes[ev].head = u;
        self.append_arc(u, eu);
        self.append_arc(v, ev);
        self.m += 1;
        Ok(())
    }

    fn alloc_arc_pair(&mut self) -> Result<(Index, Index), GraphError> {
        if let Some(e) = self.free_arcs.pop() {
            self.nodes[e].kind = ArcKind::None;
            self.nodes[e + 1].kind = ArcKind::None;
            for slot in [e, e + 1] {
                self.nodes[slot].sign = 1;
                self.nodes[slot].visited = NIL;
                self.nodes[slot].link = [NIL, NIL];
            }
            return Ok((e, e + 1));
        }
        let e = self.next_arc;
        if self.nodes.len() + 2 > self.nodes.capacity() {
            return Err(GraphError::OutOfMemory);
        }
        self.nodes.push(Node {
            head: NIL,
            link: [NIL, NIL],
            sign: 1,
            visited: NIL,
            kind: ArcKind::None,
        });
        self.nodes.push(Node {
            head: NIL,
            link: [NIL, NIL],
            sign: 1,
            visited: NIL,
            kind: ArcKind::None,
        });
        self.next_arc += 2;
        Ok((e, e + 1))
    }

    /// Append arc `e` at the tail of `w`'s circular adjacency list.
    pub(crate) fn append_arc(&mut self, w: Index, e: Index) {
        let last = self.nodes[w].link[1];
        self.nodes[e].link = [w, last];
        if last == w {
            // empty list: the new arc is both first and last
            self.nodes[w].link = [e, e];
            self.nodes[e].link = [w, w];
        } else {
            self.nodes[last].link[0] = e;
            self.nodes[w].link[1] = e;
        }
    }

    /// Insert arc `e` at slot `side` (0 or 1) of `w`'s adjacency list.
    pub(crate) fn insert_arc_at(&mut self, w: Index, side: usize, e: Index) {
        let old = self.nodes[w].link[side];
        if old == w {
            self.nodes[e].link = [w, w];
            self.nodes[w].link = [e, e];
        } else if side == 0 {
            self.nodes[e].link = [old, w];
            self.nodes[old].link[1] = e;
            self.nodes[w].link[0] = e;
        } else {
            self.nodes[e].link = [w, old];
            self.nodes[old].link[0] = e;
            self.nodes[w].link[1] = e;
        }
    }

    /// Unlink arc `e` from the adjacency list of its tail `w`.
    pub(crate) fn remove_arc(&mut self, w: Index, e: Index) {
        let [next, prev] = self.nodes[e].link;
        if next == w && prev == w {
            self.nodes[w].link = [w, w];
        } else {
            if prev == w {
                self.nodes[w].link[0] = next;
            } else {
                self.nodes[prev].link[0] = next;
            }
            if next == w {
                self.nodes[w].link[1] = prev;
            } else {
                self.nodes[next].link[1] = prev;
            }
        }
        self.nodes[e].link = [NIL, NIL];
    }

    /// Delete the edge owning arc `e` (both arcs), returning the slot pair
    /// to the hole freelist. The caller passes the tails explicitly since
    /// root copies may stand in for the real endpoint mid-embedding.
    pub(crate) fn delete_edge(&mut self, tail: Index, e: Index) {
        let t = self.twin(e);
        let head = self.nodes[e].head;
        self.remove_arc(tail, e);
        self.remove_arc(head, t);
        let first = e.min(t);
        self.nodes[first].kind = ArcKind::Free;
        self.nodes[first + 1].kind = ArcKind::Free;
        let _ = self.free_arcs.push(first);
        self.m -= 1;
    }

    /// Return an out-of-adjacency arc pair to the hole freelist. Used for
    /// unembedded arcs, which have no lists to unlink from.
    pub(crate) fn drop_edge_slot(&mut self, first: Index) {
        let _ = self.free_arcs.push(first);
        self.m -= 1;
    }

    /// Tail vertex of arc `e`: the head of its twin.
    #[inline]
    #[must_use]
    pub(crate) fn tail(&self, e: Index) -> Index {
        self.nodes[self.twin(e)].head
    }

    /// Iterate the arcs of `w`'s adjacency list in rotation order.
    pub(crate) fn arcs_of(&self, w: Index) -> ArcIter<'_> {
        ArcIter {
            graph: self,
            vertex: w,
            cur: self.nodes[w].link[0],
        }
    }

    /// Neighbor vertices of `w` in rotation order. After a successful
    /// embed this is the combinatorial embedding's cyclic order at `w`.
    pub fn neighbors(&self, w: Index) -> impl Iterator<Item = Index> + '_ {
        self.arcs_of(w).map(|e| self.nodes[e].head)
    }

    /// All undirected edges `(u, v)` with `u < v`, in arena order.
    pub fn edges(&self) -> impl Iterator<Item = (Index, Index)> + '_ {
        let base = self.arc_base();
        (base..self.next_arc).step_by(2).filter_map(move |e| {
            if self.nodes[e].kind == ArcKind::Free {
                return None;
            }
            let u = self.nodes[e + 1].head;
            let v = self.nodes[e].head;
            Some((u.min(v), u.max(v)))
        })
    }

    /// Stamp every slot's visited field with `value`.
    pub(crate) fn fill_visited(&mut self, value: Index) {
        for node in &mut self.nodes {
            node.visited = value;
        }
    }

    /// Reset all embedding scratch state, keeping vertices and edges.
    /// Arcs return to plain adjacency (DFS classification cleared).
    pub fn reinit(&mut self) {
        for i in 0..2 * self.n {
            let user = self.v[i].user_index;
            self.v[i] = VertexInfo::unset(user);
        }
        for slot in self.arc_base()..self.next_arc {
            if self.nodes[slot].kind != ArcKind::Free {
                self.nodes[slot].kind = ArcKind::None;
            }
            self.nodes[slot].sign = 1;
            self.nodes[slot].visited = NIL;
        }
        self.bicomp_lists.reset();
        self.child_lists.reset();
        self.stack.clear();
        self.dfi_ordered = false;
    }

    /// Renumber vertices so that index equals DFI. `perm[new] = old`.
    /// Arc heads and the info arrays are rewritten; root copies move with
    /// their children. O(n + m).
    pub(crate) fn apply_order(&mut self, perm: &[Index]) {
        let n = self.n;
        let mut inverse = alloc::vec![NIL; n];
        for (new, &old) in perm.iter().enumerate() {
            inverse[old] = new;
        }
        // Remap arc heads and vertex-slot adjacency anchors.
        let mut new_nodes: Vec<Node> = self.nodes.clone();
        let remap = |slot: Index, inverse: &[Index]| -> Index {
            if slot == NIL || slot >= 2 * n {
                slot
            } else if slot < n {
                inverse[slot]
            } else {
                n + inverse[slot - n]
            }
        };
        for slot in 0..self.nodes.len() {
            if slot < 2 * n {
                let old = if slot < n { perm[slot] } else { n + perm[slot - n] };
                new_nodes[slot] = self.nodes[old].clone();
                new_nodes[slot].head = slot;
            }
            let node = &mut new_nodes[slot];
            if slot >= 2 * n {
                node.head = remap(node.head, &inverse);
            }
            node.link[0] = remap(node.link[0], &inverse);
            node.link[1] = remap(node.link[1], &inverse);
        }
        self.nodes = new_nodes;
        let mut new_v: Vec<VertexInfo> = self.v.clone();
        for new in 0..n {
            new_v[new] = self.v[perm[new]].clone();
            new_v[n + new] = self.v[n + perm[new]].clone();
        }
        for info in &mut new_v {
            info.dfs_parent = if info.dfs_parent == NIL || info.dfs_parent >= n {
                info.dfs_parent
            } else {
                inverse[info.dfs_parent]
            };
        }
        self.v = new_v;
        // List collections hold pre-permutation element ids; they are
        // scratch and are rebuilt by whichever phase runs next.
        self.bicomp_lists.reset();
        self.child_lists.reset();
    }

    /// Undo DFI reordering so external indices match the caller's
    /// numbering again. No-op when `embed` has not renumbered.
    pub fn sort_vertices(&mut self) {
        if !self.dfi_ordered {
            return;
        }
        let mut by_user = alloc::vec![NIL; self.n];
        for pos in 0..self.n {
            by_user[self.v[pos].user_index] = pos;
        }
        self.apply_order(&by_user);
        self.dfi_ordered = false;
    }

    /// Deep copy, used to keep a pristine graph for the integrity check.
    #[must_use]
    pub fn dup(&self) -> Self {
        self.clone()
    }
}

pub(crate) struct ArcIter<'a> {
    graph: &'a Graph,
    vertex: Index,
    cur: Index,
}

impl Iterator for ArcIter<'_> {
    type Item = Index;

    fn next(&mut self) -> Option<Index> {
        if self.cur == self.vertex || self.cur == NIL {
            return None;
        }
        let e = self.cur;
        self.cur = self.graph.nodes[e].link[0];
        Some(e)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn test_add_edge_twins() {
        let mut g = Graph::with_capacity(4);
        g.add_edge(0, 1).unwrap();
        g.add_edge(0, 2).unwrap();
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.neighbors(0).collect::<Vec<_>>(), alloc::vec![1, 2]);
        assert_eq!(g.neighbors(1).collect::<Vec<_>>(), alloc::vec![0]);
        let e = g.nodes[0].link[0];
        assert_eq!(g.nodes[g.twin(e)].head, 0);
        assert_eq!(g.tail(e), 0);
    }

    #[test]
    fn test_self_loop_rejected() {
        let mut g = Graph::with_capacity(4);
        assert!(matches!(g.add_edge(2, 2), Err(GraphError::InvalidInput)));
    }

    #[test]
    fn test_edge_limit() {
        // n = 4 allows 3*4-6 = 6 edges (K4 exactly).
        let mut g = Graph::with_capacity(4);
        for (u, v) in [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)] {
            g.add_edge(u, v).unwrap();
        }
        assert!(matches!(g.add_edge(0, 1), Err(GraphError::TooManyEdges)));
        g.allow_extra_edges = true;
        assert!(g.add_edge(0, 1).is_ok());
    }

    #[test]
    fn test_delete_edge_reuses_slot() {
        let mut g = Graph::with_capacity(4);
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 2).unwrap();
        let e = g.nodes[0].link[0];
        g.delete_edge(0, e);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.neighbors(0).count(), 0);
        g.add_edge(0, 3).unwrap();
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.neighbors(0).collect::<Vec<_>>(), alloc::vec![3]);
    }

    #[test]
    fn test_edges_iterator() {
        let mut g = Graph::with_capacity(5);
        g.add_edge(3, 1).unwrap();
        g.add_edge(0, 4).unwrap();
        let edges: Vec<_> = g.edges().collect();
        assert_eq!(edges, alloc::vec![(1, 3), (0, 4)]);
    }
}
