//! Subgraph search for homeomorphs of K2,3, K3,3, and K4.
//!
//! The searches reuse the embedder skeletons:
//!
//! - **K3,3**: planar embedding. A K3,3 obstruction is the answer. A K5
//!   obstruction does not certify the absence of a K3,3, but any K3,3
//!   subdivision in the graph must avoid at least one edge of the K5
//!   witness (a subdivision has maximum degree 3, a K5 witness has five
//!   degree-4 vertices), so the search recurses on the graph minus each
//!   witness edge.
//! - **K2,3**: outerplanar embedding, same argument against a K4 witness
//!   (a K2,3 subdivision has two degree-3 vertices, a K4 witness four).
//! - **K4**: per-bicomp series-parallel reduction; a biconnected graph
//!   has a K4 homeomorph exactly when it is not series-parallel, and an
//!   edge-minimal non-series-parallel bicomp is a K4 subdivision.

use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};

use crate::embed::{embed_with_hooks, EmbedMode, EmbedOutcome, ObstructionKind};
use crate::error::GraphError;
use crate::extend::NoHooks;
use crate::graph::{Graph, Index, NIL};

/// What to search for.
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SearchTarget {
    K23,
    K33,
    K4,
}

/// Search result. `Found` carries the witness edge list in the caller's
/// vertex numbering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    NotFound,
    Found { edges: Vec<(Index, Index)> },
}

/// Budget for the recursion around non-target obstructions; generous,
/// since each level removes an edge and the branching witness is small.
const EMBED_BUDGET: usize = 4096;

/// Search `g` for a subgraph homeomorphic to `target`. The input is not
/// modified.
///
/// # Errors
///
/// Structural [`GraphError`]s from the underlying embedder, including
/// budget exhaustion on adversarial inputs.
pub fn search(g: &Graph, target: SearchTarget) -> Result<SearchOutcome, GraphError> {
    let edges: Vec<(Index, Index)> = g.edges().collect();
    match target {
        SearchTarget::K33 => {
            let mut budget = EMBED_BUDGET;
            search_by_embedding(
                g.vertex_count(),
                &edges,
                EmbedMode::Planar,
                ObstructionKind::K33,
                &mut budget,
            )
        }
        SearchTarget::K23 => {
            let mut budget = EMBED_BUDGET;
            search_by_embedding(
                g.vertex_count(),
                &edges,
                EmbedMode::Outerplanar,
                ObstructionKind::K23,
                &mut budget,
            )
        }
        SearchTarget::K4 => search_k4(g.vertex_count(), &edges),
    }
}

fn build(n: usize, edges: &[(Index, Index)]) -> Result<Graph, GraphError> {
    let mut g = Graph::with_capacity(n);
    g.allow_extra_edges = true;
    for &(a, b) in edges {
        g.add_edge(a, b)?;
    }
    Ok(g)
}

fn search_by_embedding(
    n: usize,
    edges: &[(Index, Index)],
    skeleton: EmbedMode,
    wanted: ObstructionKind,
    budget: &mut usize,
) -> Result<SearchOutcome, GraphError> {
    if *budget == 0 {
        return Err(GraphError::InternalInvariant("search budget exhausted"));
    }
    *budget -= 1;

    let mut trial = build(n, edges)?;
    match embed_with_hooks(&mut trial, skeleton, &mut NoHooks)? {
        EmbedOutcome::Embedded => Ok(SearchOutcome::NotFound),
        EmbedOutcome::Obstructed(kind) => {
            trial.sort_vertices();
            let witness: Vec<(Index, Index)> = trial.edges().collect();
            if kind == wanted {
                return Ok(SearchOutcome::Found { edges: witness });
            }
            // The other family was isolated. Any `wanted` subdivision
            // avoids at least one witness edge, so retry without each.
            for &cut in &witness {
                let remaining: Vec<(Index, Index)> =
                    edges.iter().copied().filter(|&e| e != cut).collect();
                if let SearchOutcome::Found { edges } =
                    search_by_embedding(n, &remaining, skeleton, wanted, budget)?
                {
                    return Ok(SearchOutcome::Found { edges });
                }
            }
            Ok(SearchOutcome::NotFound)
        }
    }
}

// ---------------------------------------------------------------------------
// K4 search: series-parallel reduction per bicomp
// ---------------------------------------------------------------------------

fn search_k4(n: usize, edges: &[(Index, Index)]) -> Result<SearchOutcome, GraphError> {
    for bicomp in biconnected_components(n, edges) {
        if bicomp.len() < 6 {
            // K4 subdivisions have at least six edges
            continue;
        }
        if !is_series_parallel(&bicomp) {
            let witness = minimise_by(&bicomp, |sub| !is_series_parallel(sub));
            return Ok(SearchOutcome::Found { edges: witness });
        }
    }
    Ok(SearchOutcome::NotFound)
}

/// Edge lists of the biconnected components (bridges come out as
/// single-edge components). Iterative Hopcroft-Tarjan over an adjacency
/// map.
fn biconnected_components(n: usize, edges: &[(Index, Index)]) -> Vec<Vec<(Index, Index)>> {
    let mut adj: Vec<Vec<(Index, usize)>> = alloc::vec![Vec::new(); n];
    for (i, &(a, b)) in edges.iter().enumerate() {
        adj[a].push((b, i));
        adj[b].push((a, i));
    }
    let mut dfn = alloc::vec![NIL; n];
    let mut low = alloc::vec![0usize; n];
    let mut counter = 0usize;
    let mut edge_stack: Vec<usize> = Vec::new();
    let mut components: Vec<Vec<(Index, Index)>> = Vec::new();
    let mut used_edge = alloc::vec![false; edges.len()];

    for root in 0..n {
        if dfn[root] != NIL {
            continue;
        }
        // (vertex, parent edge id, next adjacency position)
        let mut stack: Vec<(Index, usize, usize)> = alloc::vec![(root, usize::MAX, 0)];
        dfn[root] = counter;
        low[root] = counter;
        counter += 1;
        loop {
            let Some(&(z, pe, next)) = stack.last() else {
                break;
            };
            if next < adj[z].len() {
                if let Some(frame) = stack.last_mut() {
                    frame.2 += 1;
                }
                let (w, ei) = adj[z][next];
                if ei == pe {
                    continue;
                }
                if dfn[w] == NIL {
                    used_edge[ei] = true;
                    edge_stack.push(ei);
                    dfn[w] = counter;
                    low[w] = counter;
                    counter += 1;
                    stack.push((w, ei, 0));
                } else if dfn[w] < dfn[z] && !used_edge[ei] {
                    used_edge[ei] = true;
                    edge_stack.push(ei);
                    if dfn[w] < low[z] {
                        low[z] = dfn[w];
                    }
                }
            } else {
                stack.pop();
                if let Some(&(p, _, _)) = stack.last() {
                    if low[z] < low[p] {
                        low[p] = low[z];
                    }
                    if low[z] >= dfn[p] {
                        // p separates: everything stacked above and
                        // including the tree edge (p, z) is one bicomp
                        let mut comp = Vec::new();
                        while let Some(ei) = edge_stack.pop() {
                            comp.push(edges[ei]);
                            if ei == pe {
                                break;
                            }
                        }
                        components.push(comp);
                    }
                }
            }
        }
    }
    components
}

/// Series-parallel test by reduction: smooth degree-2 vertices, collapse
/// parallel edges, drop loops; a connected multigraph is series-parallel
/// when this terminates with a single edge.
fn is_series_parallel(edges: &[(Index, Index)]) -> bool {
    // multigraph as an edge multiset
    let mut multi: Vec<(Index, Index)> = edges.to_vec();
    loop {
        if multi.len() <= 1 {
            return true;
        }
        let mut degree: HashMap<Index, usize> = HashMap::new();
        for &(a, b) in &multi {
            *degree.entry(a).or_insert(0) += 1;
            *degree.entry(b).or_insert(0) += 1;
        }
        let mut changed = false;

        // collapse one parallel pair
        let mut seen: HashSet<(Index, Index)> = HashSet::new();
        let mut dup: Option<usize> = None;
        for (i, &(a, b)) in multi.iter().enumerate() {
            let key = (a.min(b), a.max(b));
            if !seen.insert(key) {
                dup = Some(i);
                break;
            }
        }
        if let Some(i) = dup {
            multi.swap_remove(i);
            changed = true;
        } else if let Some(z) = degree.iter().find(|&(_, &d)| d == 2).map(|(&z, _)| z) {
            // smooth one degree-2 vertex
            let incident: Vec<usize> = multi
                .iter()
                .enumerate()
                .filter(|(_, &(a, b))| a == z || b == z)
                .map(|(i, _)| i)
                .collect();
            if incident.len() == 2 {
                let (a1, b1) = multi[incident[0]];
                let (a2, b2) = multi[incident[1]];
                let u = if a1 == z { b1 } else { a1 };
                let w = if a2 == z { b2 } else { a2 };
                let (hi, lo) = (incident[1], incident[0]);
                multi.swap_remove(hi);
                multi.swap_remove(lo);
                if u != w {
                    multi.push((u, w));
                }
                changed = true;
            } else {
                // both incidences on one self-loop; drop it
                multi.swap_remove(incident[0]);
                changed = true;
            }
        }

        if !changed {
            return multi.len() <= 1;
        }
    }
}

/// Greedy edge minimisation of `edges` under `bad` (which holds for the
/// full set): delete any edge whose removal keeps the predicate true.
fn minimise_by<F>(edges: &[(Index, Index)], bad: F) -> Vec<(Index, Index)>
where
    F: Fn(&[(Index, Index)]) -> bool,
{
    let mut current: Vec<(Index, Index)> = edges.to_vec();
    let mut i = 0usize;
    while i < current.len() {
        let mut trial = current.clone();
        trial.swap_remove(i);
        if bad(&trial) {
            current = trial;
        } else {
            i += 1;
        }
    }
    current
}
