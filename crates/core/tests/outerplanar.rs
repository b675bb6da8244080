mod common;

use common::{build, complete, cycle, k23, path, wheel};
use planarity_core::integrity::{check_embed_integrity, smooth_and_classify};
use planarity_core::{embed, EmbedMode, EmbedOutcome, Graph, ObstructionKind};

fn run_outerplanar(mut g: Graph) -> (Graph, EmbedOutcome) {
    let original = g.dup();
    let outcome = embed(&mut g, EmbedMode::Outerplanar).expect("embed");
    g.sort_vertices();
    check_embed_integrity(&g, &original, outcome, EmbedMode::Outerplanar).expect("integrity");
    (g, outcome)
}

#[test]
fn k4_is_not_outerplanar_and_is_its_own_witness() {
    let (witness, outcome) = run_outerplanar(complete(4));
    assert!(matches!(outcome, EmbedOutcome::Obstructed(_)));
    assert_eq!(witness.edges().count(), 6);
    assert_eq!(smooth_and_classify(&witness), Some(ObstructionKind::K4));
}

#[test]
fn k4_minus_an_edge_is_outerplanar() {
    // a triangle with one extra subdivided edge stays outerplanar until
    // the missing K4 edge arrives
    let (_, outcome) = run_outerplanar(build(4, &[(0, 1), (1, 2), (2, 0), (0, 3), (1, 3)]));
    assert_eq!(outcome, EmbedOutcome::Embedded);

    let (witness, outcome) =
        run_outerplanar(build(4, &[(0, 1), (1, 2), (2, 0), (0, 3), (1, 3), (2, 3)]));
    assert!(matches!(outcome, EmbedOutcome::Obstructed(_)));
    assert_eq!(smooth_and_classify(&witness), Some(ObstructionKind::K4));
}

#[test]
fn k23_is_not_outerplanar() {
    let (witness, outcome) = run_outerplanar(k23());
    assert!(matches!(outcome, EmbedOutcome::Obstructed(_)));
    assert_eq!(smooth_and_classify(&witness), Some(ObstructionKind::K23));
}

#[test]
fn paths_cycles_and_fans_are_outerplanar() {
    // fan: path plus a hub seeing every path vertex
    let mut fan_edges: Vec<(usize, usize)> = (1..5).map(|v| (v, v + 1)).collect();
    fan_edges.extend((1..=5).map(|v| (0, v)));
    for g in [path(6), cycle(7), build(6, &fan_edges)] {
        let (_, outcome) = run_outerplanar(g);
        assert_eq!(outcome, EmbedOutcome::Embedded);
    }
}

#[test]
fn wheel_is_planar_but_not_outerplanar() {
    let mut g = wheel(5);
    let original = g.dup();
    let planar = embed(&mut g, EmbedMode::Planar).expect("embed");
    g.sort_vertices();
    check_embed_integrity(&g, &original, planar, EmbedMode::Planar).expect("integrity");
    assert_eq!(planar, EmbedOutcome::Embedded);

    let (witness, outcome) = run_outerplanar(wheel(5));
    assert!(matches!(outcome, EmbedOutcome::Obstructed(_)));
    assert!(smooth_and_classify(&witness).is_some());
}
