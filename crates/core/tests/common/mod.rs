//! Shared builders for the embedder test suites.

use planarity_core::Graph;

pub fn build(n: usize, edges: &[(usize, usize)]) -> Graph {
    let mut g = Graph::with_capacity(n);
    g.allow_extra_edges = true;
    for &(a, b) in edges {
        g.add_edge(a, b).expect("test graph edge");
    }
    g
}

pub fn complete(n: usize) -> Graph {
    let edges: Vec<(usize, usize)> = (0..n)
        .flat_map(|a| ((a + 1)..n).map(move |b| (a, b)))
        .collect();
    build(n, &edges)
}

pub fn k33() -> Graph {
    let mut edges = Vec::new();
    for a in 0..3 {
        for b in 3..6 {
            edges.push((a, b));
        }
    }
    build(6, &edges)
}

pub fn k23() -> Graph {
    let mut edges = Vec::new();
    for a in 0..2 {
        for b in 2..5 {
            edges.push((a, b));
        }
    }
    build(5, &edges)
}

pub fn petersen() -> Graph {
    build(
        10,
        &[
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 4),
            (4, 0),
            (0, 5),
            (1, 6),
            (2, 7),
            (3, 8),
            (4, 9),
            (5, 7),
            (7, 9),
            (9, 6),
            (6, 8),
            (8, 5),
        ],
    )
}

pub fn path(n: usize) -> Graph {
    let edges: Vec<(usize, usize)> = (1..n).map(|v| (v - 1, v)).collect();
    build(n, &edges)
}

pub fn cycle(n: usize) -> Graph {
    let edges: Vec<(usize, usize)> = (0..n).map(|v| (v, (v + 1) % n)).collect();
    build(n, &edges)
}

/// Wheel: hub 0 plus a rim cycle 1..=k.
pub fn wheel(k: usize) -> Graph {
    let mut edges: Vec<(usize, usize)> = (1..=k).map(|v| (0, v)).collect();
    for v in 1..=k {
        let next = if v == k { 1 } else { v + 1 };
        edges.push((v, next));
    }
    build(k + 1, &edges)
}

/// A deterministic stacked triangulation on `n >= 3` vertices with
/// exactly `3n - 6` edges: vertex `v` lands in the face left by `v - 1`.
pub fn stacked_triangulation(n: usize) -> Graph {
    let mut edges: Vec<(usize, usize)> = vec![(0, 1), (1, 2), (0, 2)];
    let mut faces: Vec<[usize; 3]> = vec![[0, 1, 2], [0, 2, 1]];
    for v in 3..n {
        let face = faces.swap_remove(v % faces.len());
        let [a, b, c] = face;
        edges.push((a, v));
        edges.push((b, v));
        edges.push((c, v));
        faces.push([a, b, v]);
        faces.push([b, c, v]);
        faces.push([c, a, v]);
    }
    build(n, &edges)
}

/// `rows x cols` grid graph.
pub fn grid(rows: usize, cols: usize) -> Graph {
    let mut edges = Vec::new();
    let at = |r: usize, c: usize| r * cols + c;
    for r in 0..rows {
        for c in 0..cols {
            if c + 1 < cols {
                edges.push((at(r, c), at(r, c + 1)));
            }
            if r + 1 < rows {
                edges.push((at(r, c), at(r + 1, c)));
            }
        }
    }
    build(rows * cols, &edges)
}
