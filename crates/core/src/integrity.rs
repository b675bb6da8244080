//! Embed-result integrity checking.
//!
//! Certifies an embed outcome against a pristine duplicate of the input:
//!
//! - `Embedded`: the embedded graph carries exactly the original edge set
//!   and its rotation system satisfies the planar Euler face count
//!   `V - E + F = 1 + C`. In outerplanar mode, additionally every vertex
//!   must lie on one face of its component.
//! - `Obstructed`: the witness is a subgraph of the original, its
//!   non-isolated part is connected, and smoothing degree-2 chains leaves
//!   a K5 or K3,3 (planar) or a K2,3 or K4 (outerplanar).
//!
//! The checker is deliberately independent of the embedder's internals:
//! it reads only rotations and edge lists.

use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};

use crate::embed::{EmbedMode, EmbedOutcome, ObstructionKind};
use crate::graph::{Graph, Index};

/// Why an embed result failed certification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    /// Edge present in the original but missing from the embedding.
    MissingEdge(Index, Index),
    /// Edge in the result that the original never had.
    ExtraEdge(Index, Index),
    /// Face count inconsistent with a planar rotation system.
    EulerViolation { v: usize, e: usize, f: usize, c: usize },
    /// Some vertex of a component is on no common outer face.
    NotOuterplanar,
    /// The witness is disconnected.
    WitnessDisconnected,
    /// The witness does not smooth to an obstruction of the mode's family.
    WitnessNotHomeomorph,
    /// The witness family does not match the reported kind.
    WitnessKindMismatch,
}

impl core::fmt::Display for IntegrityError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingEdge(u, w) => write!(f, "edge ({u}, {w}) lost by the embedding"),
            Self::ExtraEdge(u, w) => write!(f, "edge ({u}, {w}) not present in the original"),
            Self::EulerViolation { v, e, f: faces, c } => {
                write!(f, "euler violation: V={v} E={e} F={faces} C={c}")
            }
            Self::NotOuterplanar => write!(f, "a vertex is enclosed in the outerplanar embedding"),
            Self::WitnessDisconnected => write!(f, "obstruction witness is disconnected"),
            Self::WitnessNotHomeomorph => write!(f, "witness is not an obstruction homeomorph"),
            Self::WitnessKindMismatch => write!(f, "witness family differs from reported kind"),
        }
    }
}

/// Certify `outcome` produced by embedding `embedded` from `original`.
/// Both graphs must be in the same (user) vertex numbering, i.e.
/// `sort_vertices` has been called on the embedded graph.
///
/// # Errors
///
/// The specific [`IntegrityError`] that invalidates the result.
pub fn check_embed_integrity(
    embedded: &Graph,
    original: &Graph,
    outcome: EmbedOutcome,
    mode: EmbedMode,
) -> Result<(), IntegrityError> {
    match outcome {
        EmbedOutcome::Embedded => check_embedding(embedded, original, mode),
        EmbedOutcome::Obstructed(kind) => check_witness(embedded, original, kind, mode),
    }
}

fn edge_set(g: &Graph) -> HashSet<(Index, Index)> {
    g.edges().collect()
}

fn check_embedding(
    embedded: &Graph,
    original: &Graph,
    mode: EmbedMode,
) -> Result<(), IntegrityError> {
    let got = edge_set(embedded);
    let want = edge_set(original);
    if let Some(&(u, w)) = want.difference(&got).next() {
        return Err(IntegrityError::MissingEdge(u, w));
    }
    if let Some(&(u, w)) = got.difference(&want).next() {
        return Err(IntegrityError::ExtraEdge(u, w));
    }

    let v = embedded.vertex_count();
    let e = embedded.edge_count();
    let c = component_count(embedded);
    let f = count_faces(embedded);
    if v + f != e + 1 + c {
        return Err(IntegrityError::EulerViolation { v, e, f, c });
    }

    if mode.keeps_all_vertices_outer() && !has_outer_face_per_component(embedded) {
        return Err(IntegrityError::NotOuterplanar);
    }
    Ok(())
}

/// Number of connected components, counting isolated vertices.
fn component_count(g: &Graph) -> usize {
    let n = g.vertex_count();
    let mut seen = alloc::vec![false; n];
    let mut count = 0usize;
    let mut stack: Vec<Index> = Vec::new();
    for s in 0..n {
        if seen[s] {
            continue;
        }
        count += 1;
        seen[s] = true;
        stack.push(s);
        while let Some(z) = stack.pop() {
            for w in g.neighbors(z) {
                if !seen[w] {
                    seen[w] = true;
                    stack.push(w);
                }
            }
        }
    }
    count
}

/// Trace every face of the rotation system once. Each directed arc lies
/// on exactly one face; the trace follows the rotation predecessor of the
/// entering arc's twin.
fn count_faces(g: &Graph) -> usize {
    let n = g.vertex_count();
    // directed arcs as (tail, position-in-rotation)
    let mut rotations: Vec<Vec<Index>> = Vec::with_capacity(n);
    let mut pos: Vec<HashMap<Index, usize>> = Vec::with_capacity(n);
    for z in 0..n {
        let rot: Vec<Index> = g.neighbors(z).collect();
        let mut map = HashMap::new();
        for (i, &w) in rot.iter().enumerate() {
            map.insert(w, i);
        }
        rotations.push(rot);
        pos.push(map);
    }
    let mut visited: HashSet<(Index, Index)> = HashSet::new();
    let mut faces = 0usize;
    for u in 0..n {
        for &w in &rotations[u] {
            if visited.contains(&(u, w)) {
                continue;
            }
            faces += 1;
            let (mut a, mut b) = (u, w);
            loop {
                if !visited.insert((a, b)) {
                    break;
                }
                // next arc: at b, the rotation predecessor of (b, a)
                let i = pos[b][&a];
                let len = rotations[b].len();
                let next = rotations[b][(i + len - 1) % len];
                a = b;
                b = next;
                if a == u && b == w {
                    break;
                }
            }
        }
    }
    faces
}

/// Outerplanarity of the rotation system: some face of each component
/// contains every vertex of that component.
fn has_outer_face_per_component(g: &Graph) -> bool {
    let n = g.vertex_count();
    let mut comp = alloc::vec![usize::MAX; n];
    let mut comp_size: Vec<usize> = Vec::new();
    let mut stack: Vec<Index> = Vec::new();
    for s in 0..n {
        if comp[s] != usize::MAX {
            continue;
        }
        let id = comp_size.len();
        comp[s] = id;
        let mut size = 1usize;
        stack.push(s);
        while let Some(z) = stack.pop() {
            for w in g.neighbors(z) {
                if comp[w] == usize::MAX {
                    comp[w] = id;
                    size += 1;
                    stack.push(w);
                }
            }
        }
        comp_size.push(size);
    }

    // retrace faces, recording the vertex set of each
    let mut rotations: Vec<Vec<Index>> = Vec::with_capacity(n);
    let mut pos: Vec<HashMap<Index, usize>> = Vec::with_capacity(n);
    for z in 0..n {
        let rot: Vec<Index> = g.neighbors(z).collect();
        let mut map = HashMap::new();
        for (i, &w) in rot.iter().enumerate() {
            map.insert(w, i);
        }
        rotations.push(rot);
        pos.push(map);
    }
    let mut visited: HashSet<(Index, Index)> = HashSet::new();
    let mut covered = alloc::vec![false; comp_size.len()];
    for u in 0..n {
        if rotations[u].is_empty() {
            covered[comp[u]] = true; // isolated vertex: trivially outer
            continue;
        }
        let rot_u = rotations[u].clone();
        for &w in &rot_u {
            if visited.contains(&(u, w)) {
                continue;
            }
            let mut face_vertices: HashSet<Index> = HashSet::new();
            let (mut a, mut b) = (u, w);
            loop {
                if !visited.insert((a, b)) {
                    break;
                }
                face_vertices.insert(a);
                let i = pos[b][&a];
                let len = rotations[b].len();
                let next = rotations[b][(i + len - 1) % len];
                a = b;
                b = next;
                if a == u && b == w {
                    break;
                }
            }
            if face_vertices.len() == comp_size[comp[u]] {
                covered[comp[u]] = true;
            }
        }
    }
    covered.iter().all(|&ok| ok)
}

fn check_witness(
    witness: &Graph,
    original: &Graph,
    kind: ObstructionKind,
    mode: EmbedMode,
) -> Result<(), IntegrityError> {
    let got = edge_set(witness);
    let want = edge_set(original);
    if let Some(&(u, w)) = got.difference(&want).next() {
        return Err(IntegrityError::ExtraEdge(u, w));
    }

    // connectivity over non-isolated vertices
    let n = witness.vertex_count();
    let active: Vec<Index> = (0..n).filter(|&z| witness.neighbors(z).next().is_some()).collect();
    if active.is_empty() {
        return Err(IntegrityError::WitnessNotHomeomorph);
    }
    let mut seen: HashSet<Index> = HashSet::new();
    let mut stack = alloc::vec![active[0]];
    seen.insert(active[0]);
    while let Some(z) = stack.pop() {
        for w in witness.neighbors(z) {
            if seen.insert(w) {
                stack.push(w);
            }
        }
    }
    if seen.len() != active.len() {
        return Err(IntegrityError::WitnessDisconnected);
    }

    let family = smooth_and_classify(witness).ok_or(IntegrityError::WitnessNotHomeomorph)?;
    let allowed: &[ObstructionKind] = if mode.keeps_all_vertices_outer() {
        &[ObstructionKind::K23, ObstructionKind::K4]
    } else {
        &[ObstructionKind::K5, ObstructionKind::K33]
    };
    if !allowed.contains(&family) {
        return Err(IntegrityError::WitnessNotHomeomorph);
    }
    if family != kind {
        return Err(IntegrityError::WitnessKindMismatch);
    }
    Ok(())
}

/// Smooth degree-2 chains and identify the branch-vertex graph. Returns
/// `None` unless it is exactly K5, K3,3, K4, or K2,3.
#[must_use]
pub fn smooth_and_classify(g: &Graph) -> Option<ObstructionKind> {
    let n = g.vertex_count();
    let degree: Vec<usize> = (0..n).map(|z| g.neighbors(z).count()).collect();
    if degree.iter().any(|&d| d == 1) {
        return None;
    }
    let branches: Vec<Index> = (0..n).filter(|&z| degree[z] >= 3).collect();

    // walk from each branch vertex through degree-2 chains
    let mut branch_adj: HashMap<Index, Vec<Index>> = HashMap::new();
    for &b in &branches {
        for first in g.neighbors(b) {
            let mut prev = b;
            let mut cur = first;
            while degree[cur] == 2 {
                let next = g.neighbors(cur).find(|&w| w != prev)?;
                prev = cur;
                cur = next;
            }
            branch_adj.entry(b).or_default().push(cur);
        }
    }

    match branches.len() {
        5 => {
            // K5: every branch degree 4, each pair connected once
            for &b in &branches {
                let adj = branch_adj.get(&b)?;
                if adj.len() != 4 {
                    return None;
                }
                let distinct: HashSet<Index> = adj.iter().copied().collect();
                if distinct.len() != 4 || distinct.contains(&b) {
                    return None;
                }
            }
            Some(ObstructionKind::K5)
        }
        6 => {
            // K3,3: bipartite 3-regular between the two classes
            let a0 = branches[0];
            let class_b: HashSet<Index> = branch_adj.get(&a0)?.iter().copied().collect();
            if class_b.len() != 3 || class_b.contains(&a0) {
                return None;
            }
            let class_a: Vec<Index> = branches
                .iter()
                .copied()
                .filter(|z| !class_b.contains(z))
                .collect();
            if class_a.len() != 3 {
                return None;
            }
            for &a in &class_a {
                let adj: HashSet<Index> = branch_adj.get(&a)?.iter().copied().collect();
                if adj != class_b || branch_adj.get(&a)?.len() != 3 {
                    return None;
                }
            }
            Some(ObstructionKind::K33)
        }
        4 => {
            for &b in &branches {
                let adj = branch_adj.get(&b)?;
                if adj.len() != 3 {
                    return None;
                }
                let distinct: HashSet<Index> = adj.iter().copied().collect();
                if distinct.len() != 3 || distinct.contains(&b) {
                    return None;
                }
            }
            Some(ObstructionKind::K4)
        }
        2 => {
            // K2,3: the two branch vertices joined by three paths, each
            // with at least one interior vertex
            let (a, b) = (branches[0], branches[1]);
            let adj_a = branch_adj.get(&a)?;
            if adj_a.len() != 3 || adj_a.iter().any(|&z| z != b) {
                return None;
            }
            if g.neighbors(a).any(|w| w == b) {
                return None;
            }
            Some(ObstructionKind::K23)
        }
        _ => None,
    }
}
