use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use planarity_core::{embed, EmbedMode, Graph};

fn path_graph(n: usize) -> Graph {
    let mut g = Graph::with_capacity(n);
    for v in 1..n {
        g.add_edge(v - 1, v).unwrap();
    }
    g
}

/// Deterministic stacked triangulation with 3n - 6 edges; the densest
/// planar input the embedder accepts.
fn triangulation(n: usize) -> Graph {
    let mut g = Graph::with_capacity(n);
    for (a, b) in [(0, 1), (1, 2), (0, 2)] {
        g.add_edge(a, b).unwrap();
    }
    let mut faces: Vec<[usize; 3]> = vec![[0, 1, 2], [0, 2, 1]];
    for v in 3..n {
        let face = faces.swap_remove(v % faces.len());
        let [a, b, c] = face;
        g.add_edge(a, v).unwrap();
        g.add_edge(b, v).unwrap();
        g.add_edge(c, v).unwrap();
        faces.push([a, b, v]);
        faces.push([b, c, v]);
        faces.push([c, a, v]);
    }
    g
}

/// The coarse linearity sanity check: dense planar inputs should stay
/// within a small constant of tree inputs of the same order.
fn bench_embed(c: &mut Criterion) {
    let mut group = c.benchmark_group("embed_planar");
    for n in [100usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("path", n), &n, |b, &n| {
            b.iter_batched(
                || path_graph(n),
                |mut g| embed(&mut g, EmbedMode::Planar).unwrap(),
                BatchSize::SmallInput,
            );
        });
        group.bench_with_input(BenchmarkId::new("triangulation", n), &n, |b, &n| {
            b.iter_batched(
                || triangulation(n),
                |mut g| embed(&mut g, EmbedMode::Planar).unwrap(),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_embed);
criterion_main!(benches);
