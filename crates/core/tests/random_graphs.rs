//! Property-style checks over pseudo-random graphs: every embed outcome
//! must pass the integrity checker, and component counts are
//! cross-checked against petgraph as an independent oracle.

mod common;

use common::build;
use petgraph::graph::UnGraph;
use planarity_core::integrity::check_embed_integrity;
use planarity_core::{embed, EmbedMode, EmbedOutcome};

/// Small deterministic generator, so failures reproduce.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }
}

fn random_edges(seed: u64, n: usize, m: usize) -> Vec<(usize, usize)> {
    let mut rng = Lcg(seed);
    let mut edges = Vec::new();
    let mut seen = std::collections::HashSet::new();
    while edges.len() < m {
        let a = (rng.next() as usize) % n;
        let b = (rng.next() as usize) % n;
        if a != b && seen.insert((a.min(b), a.max(b))) {
            edges.push((a.min(b), a.max(b)));
        }
        if seen.len() >= n * (n - 1) / 2 {
            break;
        }
    }
    edges
}

fn petgraph_components(n: usize, edges: &[(usize, usize)]) -> usize {
    let mut pg = UnGraph::<(), ()>::new_undirected();
    let nodes: Vec<_> = (0..n).map(|_| pg.add_node(())).collect();
    for &(a, b) in edges {
        pg.add_edge(nodes[a], nodes[b], ());
    }
    petgraph::algo::connected_components(&pg)
}

#[test]
fn random_sparse_graphs_pass_integrity() {
    for seed in 0..20u64 {
        let n = 30;
        let m = 34 + (seed as usize % 20);
        let edges = random_edges(seed + 1, n, m);
        let mut g = build(n, &edges);
        let original = g.dup();
        let outcome = embed(&mut g, EmbedMode::Planar)
            .unwrap_or_else(|e| panic!("seed {seed}: embed error {e}"));
        g.sort_vertices();
        check_embed_integrity(&g, &original, outcome, EmbedMode::Planar)
            .unwrap_or_else(|e| panic!("seed {seed}: integrity failure {e} ({outcome:?})"));
    }
}

#[test]
fn random_outerplanar_runs_pass_integrity() {
    for seed in 100..115u64 {
        let n = 16;
        let m = 14 + (seed as usize % 8);
        let edges = random_edges(seed, n, m);
        let mut g = build(n, &edges);
        let original = g.dup();
        let outcome = embed(&mut g, EmbedMode::Outerplanar)
            .unwrap_or_else(|e| panic!("seed {seed}: embed error {e}"));
        g.sort_vertices();
        check_embed_integrity(&g, &original, outcome, EmbedMode::Outerplanar)
            .unwrap_or_else(|e| panic!("seed {seed}: integrity failure {e} ({outcome:?})"));
    }
}

#[test]
fn sparse_graphs_with_few_edges_are_planar() {
    // |E| <= |V| - 1 on each component forces a forest-plus-little, all
    // planar; also cross-check the component count with petgraph
    for seed in 50..60u64 {
        let n = 24;
        let edges = random_edges(seed, n, n - 4);
        let mut g = build(n, &edges);
        let outcome = embed(&mut g, EmbedMode::Planar).expect("embed");
        g.sort_vertices();

        let mut seen = vec![false; n];
        let mut components = 0usize;
        for s in 0..n {
            if seen[s] {
                continue;
            }
            components += 1;
            let mut stack = vec![s];
            seen[s] = true;
            while let Some(z) = stack.pop() {
                for w in g.neighbors(z) {
                    if !seen[w] {
                        seen[w] = true;
                        stack.push(w);
                    }
                }
            }
        }
        assert_eq!(components, petgraph_components(n, &edges), "seed {seed}");
        if edges.len() < n.saturating_sub(petgraph_components(n, &edges)) + 1 {
            assert_eq!(outcome, EmbedOutcome::Embedded, "seed {seed}");
        }
    }
}

#[test]
fn dense_random_graphs_are_rejected_with_valid_witnesses() {
    for seed in 200..208u64 {
        let n = 12;
        // close to the planar bound, usually over it structurally
        let edges = random_edges(seed, n, 3 * n - 6);
        let mut g = build(n, &edges);
        let original = g.dup();
        let outcome = embed(&mut g, EmbedMode::Planar).expect("embed");
        g.sort_vertices();
        check_embed_integrity(&g, &original, outcome, EmbedMode::Planar)
            .unwrap_or_else(|e| panic!("seed {seed}: {e} ({outcome:?})"));
    }
}
