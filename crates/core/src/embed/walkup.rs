//! Walkup: pertinence marking.
//!
//! For each unembedded back edge `(v, w)` the Walkup climbs from the
//! descendant `w` toward the current vertex `v`, one bicomp at a time.
//! Within a bicomp it walks the external face from both sides at once
//! (zig and zag), so the root copy is found in at most half the boundary
//! plus one step. Each root found is recorded on its parent's pertinent
//! bicomp list; the climb then resumes from the parent. Vertices are
//! stamped with `v`, and a stamped vertex ends the climb early: the path
//! from there up to `v` was already marked by an earlier Walkup of the
//! same iteration, which is what keeps the total cost of all Walkups for
//! one vertex proportional to the boundary actually walked.

use super::bicomp::external_face_step;
use crate::graph::{Graph, Index, NIL};

/// Mark the pertinent-bicomp path for the back edge carried by forward
/// arc `fwd` (from `v` down to `nodes[fwd].head`).
pub(crate) fn walkup(g: &mut Graph, v: Index, fwd: Index) {
    let w = g.nodes[fwd].head;
    g.v[w].adjacent_to = fwd;

    let mut x = w;
    let mut xin = 1usize;
    let mut y = w;
    let mut yin = 0usize;

    while x != v {
        if g.nodes[x].visited == v || g.nodes[y].visited == v {
            break;
        }
        g.nodes[x].visited = v;
        g.nodes[y].visited = v;

        let r = if g.is_root_copy(x) {
            x
        } else if g.is_root_copy(y) {
            y
        } else {
            NIL
        };

        if r == NIL {
            x = external_face_step(g, x, &mut xin);
            y = external_face_step(g, y, &mut yin);
            continue;
        }

        let c = g.root_child(r);
        let p = g.v[c].dfs_parent;
        let head = g.v[p].pertinent_bicomp_list;
        // externally active bicomps go to the tail so the Walkdown meets
        // the internally active ones first
        g.v[p].pertinent_bicomp_list = if g.v[c].lowpoint < v {
            g.bicomp_lists.append(head, c)
        } else {
            g.bicomp_lists.prepend(head, c)
        };
        x = p;
        xin = 1;
        y = p;
        yin = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::super::dfs::preprocess;
    use super::*;

    #[test]
    fn test_walkup_marks_child_bicomp() {
        // path 0-1-2 plus back edge 2->0: processing v = 0, the back edge
        // makes the single child bicomp of 0 pertinent
        let mut g = Graph::with_capacity(3);
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 2).unwrap();
        g.add_edge(2, 0).unwrap();
        preprocess(&mut g).unwrap();

        let fwd = g.v[0].fwd_arc_list;
        assert_ne!(fwd, NIL);
        walkup(&mut g, 0, fwd);
        assert_eq!(g.v[2].adjacent_to, fwd);
        assert_eq!(g.v[0].pertinent_bicomp_list, 1);
    }
}
