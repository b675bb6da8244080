mod common;

use common::{build, complete, cycle, grid, k33, path, petersen, stacked_triangulation, wheel};
use planarity_core::integrity::{check_embed_integrity, smooth_and_classify};
use planarity_core::{embed, EmbedMode, EmbedOutcome, Graph, ObstructionKind};

fn run_planar(mut g: Graph) -> (Graph, Graph, EmbedOutcome) {
    let original = g.dup();
    let outcome = embed(&mut g, EmbedMode::Planar).expect("embed");
    g.sort_vertices();
    check_embed_integrity(&g, &original, outcome, EmbedMode::Planar).expect("integrity");
    (g, original, outcome)
}

#[test]
fn k5_is_not_planar() {
    let (witness, _, outcome) = run_planar(complete(5));
    assert_eq!(outcome, EmbedOutcome::Obstructed(ObstructionKind::K5));
    // the whole K5 is the obstruction: 5 vertices of degree 4, 10 edges
    assert_eq!(witness.edges().count(), 10);
    for v in 0..5 {
        assert_eq!(witness.neighbors(v).count(), 4);
    }
    assert_eq!(smooth_and_classify(&witness), Some(ObstructionKind::K5));
}

#[test]
fn k33_is_not_planar() {
    let (witness, _, outcome) = run_planar(k33());
    assert_eq!(outcome, EmbedOutcome::Obstructed(ObstructionKind::K33));
    assert_eq!(witness.edges().count(), 9);
    assert_eq!(smooth_and_classify(&witness), Some(ObstructionKind::K33));
}

#[test]
fn petersen_yields_a_k33_homeomorph() {
    let (witness, _, outcome) = run_planar(petersen());
    assert!(matches!(outcome, EmbedOutcome::Obstructed(_)));
    assert_eq!(smooth_and_classify(&witness), Some(ObstructionKind::K33));
}

#[test]
fn k4_is_planar() {
    let (_, _, outcome) = run_planar(complete(4));
    assert_eq!(outcome, EmbedOutcome::Embedded);
}

#[test]
fn small_graphs_are_planar() {
    for g in [
        path(5),
        cycle(8),
        wheel(6),
        grid(4, 4),
        grid(6, 3),
        stacked_triangulation(8),
        stacked_triangulation(25),
    ] {
        let (_, _, outcome) = run_planar(g);
        assert_eq!(outcome, EmbedOutcome::Embedded);
    }
}

#[test]
fn disconnected_input_is_embedded_componentwise() {
    let (_, _, outcome) = run_planar(build(7, &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]));
    assert_eq!(outcome, EmbedOutcome::Embedded);
}

#[test]
fn maximal_planar_plus_one_edge_is_not_planar() {
    // stacked triangulation on 8 vertices plus an edge between a
    // non-adjacent pair
    let mut g = stacked_triangulation(8);
    let adjacent: Vec<Vec<bool>> = (0..8)
        .map(|a| {
            let mut row = vec![false; 8];
            for b in g.neighbors(a) {
                row[b] = true;
            }
            row
        })
        .collect();
    let mut added = false;
    'outer: for a in 0..8 {
        for b in (a + 1)..8 {
            if !adjacent[a][b] {
                g.allow_extra_edges = true;
                g.add_edge(a, b).unwrap();
                added = true;
                break 'outer;
            }
        }
    }
    assert!(added, "a triangulation on 8 vertices is not complete");
    let (witness, _, outcome) = run_planar(g);
    assert!(matches!(outcome, EmbedOutcome::Obstructed(_)));
    assert!(smooth_and_classify(&witness).is_some());
}

#[test]
fn embedding_is_deterministic() {
    let collect_rotations = |g: &Graph| -> Vec<Vec<usize>> {
        (0..g.vertex_count())
            .map(|v| g.neighbors(v).collect())
            .collect()
    };
    let (first, _, _) = run_planar(grid(5, 4));
    let (second, _, _) = run_planar(grid(5, 4));
    assert_eq!(collect_rotations(&first), collect_rotations(&second));
}

#[test]
fn obstruction_found_inside_larger_graphs() {
    // K3,3 with a pendant path attached: the witness is the K3,3 core
    let mut edges = Vec::new();
    for a in 0..3 {
        for b in 3..6 {
            edges.push((a, b));
        }
    }
    edges.extend([(5, 6), (6, 7), (7, 8)]);
    let (witness, _, outcome) = run_planar(build(9, &edges));
    assert!(matches!(outcome, EmbedOutcome::Obstructed(_)));
    assert_eq!(smooth_and_classify(&witness), Some(ObstructionKind::K33));

    // K5 sharing a vertex with a planar blob
    let mut edges: Vec<(usize, usize)> = (0..5)
        .flat_map(|a| ((a + 1)..5).map(move |b| (a, b)))
        .collect();
    edges.extend([(4, 5), (4, 6), (5, 6), (6, 7)]);
    let (witness, _, outcome) = run_planar(build(8, &edges));
    assert!(matches!(outcome, EmbedOutcome::Obstructed(_)));
    assert!(smooth_and_classify(&witness).is_some());
}
