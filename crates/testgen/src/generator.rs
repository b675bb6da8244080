use core::fmt;

use chrono::{DateTime, Duration, Local};
use hashbrown::HashSet;
use rand::distr::{Distribution, Uniform};
use rand::RngExt;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

#[derive(Clone, Debug, Default, Deserialize, Serialize, TypedBuilder)]
pub struct GenParams {
    pub id: u64,
    pub n_vertices: usize,
    pub n_edges: usize,
}

/// A generated graph with its parameters and generation timing.
#[derive(Deserialize, Serialize, Debug)]
pub struct GeneratedGraph {
    params: GenParams,
    info: String,
    start: DateTime<Local>,
    end: DateTime<Local>,
    edges: Vec<(usize, usize)>,
}

impl GeneratedGraph {
    #[must_use]
    pub const fn get_id(&self) -> u64 {
        self.params.id
    }

    #[must_use]
    pub const fn get_params(&self) -> &GenParams {
        &self.params
    }

    #[must_use]
    pub const fn get_edges(&self) -> &Vec<(usize, usize)> {
        &self.edges
    }

    #[must_use]
    pub fn get_duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Counters for a test-run over many graphs. Threaded explicitly through
/// the drivers rather than living in process-wide statics.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
pub struct TestRunStats {
    pub num_graphs: u64,
    pub num_oks: u64,
    pub num_errors: u64,
}

impl TestRunStats {
    /// Non-embeddable results: every processed graph that neither
    /// embedded nor errored.
    #[must_use]
    pub const fn num_nonembeddable(&self) -> u64 {
        self.num_graphs - self.num_oks - self.num_errors
    }
}

impl fmt::Display for TestRunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} graphs, {} OKs, {} non-embeddable, {} errors",
            self.num_graphs,
            self.num_oks,
            self.num_nonembeddable(),
            self.num_errors
        )
    }
}

/// Generate a uniform random simple graph with `n` vertices and `m`
/// distinct edges (capped at the number of vertex pairs).
///
/// # Panics
///
/// Panics if `n < 2` (no pairs to sample).
#[must_use]
pub fn generate_random_graph(n: usize, m: usize) -> Vec<(usize, usize)> {
    let mut random_generator = rand::rng();
    let vertex_range = Uniform::new(0, n).unwrap();
    let max_edges = n * (n - 1) / 2;
    let target = m.min(max_edges);
    let mut chosen: HashSet<(usize, usize)> = HashSet::with_capacity(target);
    while chosen.len() < target {
        let a = vertex_range.sample(&mut random_generator);
        let b = vertex_range.sample(&mut random_generator);
        if a != b {
            chosen.insert((a.min(b), a.max(b)));
        }
    }
    chosen.into_iter().collect()
}

/// Generate a random maximal planar graph (a triangulation with exactly
/// `3n - 6` edges): starting from a triangle, each new vertex lands in a
/// uniformly random face and connects to its three corners.
///
/// # Panics
///
/// Panics if `n < 3`.
#[must_use]
pub fn generate_maximal_planar(n: usize) -> Vec<(usize, usize)> {
    assert!(n >= 3, "a triangulation needs at least three vertices");
    let mut random_generator = rand::rng();
    let mut edges: Vec<(usize, usize)> = vec![(0, 1), (1, 2), (0, 2)];
    // both sides of the starting triangle are open for insertion
    let mut faces: Vec<[usize; 3]> = vec![[0, 1, 2], [0, 2, 1]];
    for v in 3..n {
        let at = random_generator.random_range(0..faces.len());
        let [a, b, c] = faces.swap_remove(at);
        edges.push((a, v));
        edges.push((b, v));
        edges.push((c, v));
        faces.push([a, b, v]);
        faces.push([b, c, v]);
        faces.push([c, a, v]);
    }
    edges
}

/// A maximal planar graph plus one more edge, which makes it non-planar
/// for `n >= 5`. Returns `None` when every vertex pair is already
/// adjacent (n < 5).
#[must_use]
pub fn generate_nonplanar(n: usize) -> Option<Vec<(usize, usize)>> {
    let mut edges = generate_maximal_planar(n);
    let present: HashSet<(usize, usize)> = edges.iter().copied().collect();
    for a in 0..n {
        for b in (a + 1)..n {
            if !present.contains(&(a, b)) {
                edges.push((a, b));
                return Some(edges);
            }
        }
    }
    None
}

/// What kind of graphs a batch should contain.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub enum BatchKind {
    /// Uniform G(n, m).
    Random { n_edges: usize },
    /// Random triangulations.
    MaximalPlanar,
    /// Random triangulations plus one edge.
    Nonplanar,
}

/// Generate `count` graphs of order `n` in parallel.
#[must_use]
pub fn generate_batch(count: u64, n: usize, kind: BatchKind) -> Vec<GeneratedGraph> {
    (0..count)
        .into_par_iter()
        .map(|id| {
            let start_time = Local::now();
            let edges = match kind {
                BatchKind::Random { n_edges } => generate_random_graph(n, n_edges),
                BatchKind::MaximalPlanar => generate_maximal_planar(n),
                BatchKind::Nonplanar => generate_nonplanar(n).unwrap_or_else(|| {
                    // small orders are complete already; fall back to the
                    // triangulation itself
                    generate_maximal_planar(n)
                }),
            };
            let end_time = Local::now();
            GeneratedGraph {
                params: GenParams {
                    id,
                    n_vertices: n,
                    n_edges: edges.len(),
                },
                info: "generated".to_string(),
                start: start_time,
                end: end_time,
                edges,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maximal_planar_edge_count() {
        for n in [3usize, 5, 10, 40] {
            let edges = generate_maximal_planar(n);
            assert_eq!(edges.len(), 3 * n - 6);
            let distinct: HashSet<_> = edges
                .iter()
                .map(|&(a, b)| (a.min(b), a.max(b)))
                .collect();
            assert_eq!(distinct.len(), edges.len(), "duplicate edge at n={n}");
        }
    }

    #[test]
    fn test_nonplanar_has_extra_edge() {
        let edges = generate_nonplanar(8).unwrap();
        assert_eq!(edges.len(), 3 * 8 - 6 + 1);
    }

    #[test]
    fn test_random_graph_size() {
        let edges = generate_random_graph(10, 20);
        assert_eq!(edges.len(), 20);
        for &(a, b) in &edges {
            assert_ne!(a, b);
            assert!(a < 10 && b < 10);
        }
    }

    #[test]
    fn test_batch() {
        let batch = generate_batch(4, 6, BatchKind::MaximalPlanar);
        assert_eq!(batch.len(), 4);
        for g in &batch {
            assert_eq!(g.get_params().n_vertices, 6);
        }
    }
}
