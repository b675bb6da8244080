mod common;

use common::{complete, cycle, k23, k33, path, petersen, wheel};
use planarity_core::extend::search::{search, SearchOutcome, SearchTarget};
use planarity_core::integrity::smooth_and_classify;
use planarity_core::{Graph, ObstructionKind};

fn witness_kind(n: usize, outcome: &SearchOutcome) -> Option<ObstructionKind> {
    match outcome {
        SearchOutcome::NotFound => None,
        SearchOutcome::Found { edges } => {
            let mut g = Graph::with_capacity(n);
            g.allow_extra_edges = true;
            for &(a, b) in edges {
                g.add_edge(a, b).unwrap();
            }
            smooth_and_classify(&g)
        }
    }
}

#[test]
fn nothing_in_paths_and_cycles() {
    for target in [SearchTarget::K23, SearchTarget::K33, SearchTarget::K4] {
        assert_eq!(
            search(&path(5), target).unwrap(),
            SearchOutcome::NotFound,
            "{target:?} in path"
        );
        assert_eq!(
            search(&cycle(6), target).unwrap(),
            SearchOutcome::NotFound,
            "{target:?} in cycle"
        );
    }
}

#[test]
fn k4_contains_k4_but_no_k23() {
    let outcome = search(&complete(4), SearchTarget::K4).unwrap();
    assert_eq!(witness_kind(4, &outcome), Some(ObstructionKind::K4));
    assert_eq!(
        search(&complete(4), SearchTarget::K23).unwrap(),
        SearchOutcome::NotFound
    );
}

#[test]
fn k23_contains_k23_but_no_k4() {
    let outcome = search(&k23(), SearchTarget::K23).unwrap();
    assert_eq!(witness_kind(5, &outcome), Some(ObstructionKind::K23));
    assert_eq!(
        search(&k23(), SearchTarget::K4).unwrap(),
        SearchOutcome::NotFound
    );
}

#[test]
fn k5_has_k23_and_k4_but_no_k33() {
    let g = complete(5);
    assert!(matches!(
        search(&g, SearchTarget::K23).unwrap(),
        SearchOutcome::Found { .. }
    ));
    assert!(matches!(
        search(&g, SearchTarget::K4).unwrap(),
        SearchOutcome::Found { .. }
    ));
    // an unsubdivided K5 has only five vertices, too few for the six
    // branch vertices a K3,3 homeomorph needs
    assert_eq!(
        search(&g, SearchTarget::K33).unwrap(),
        SearchOutcome::NotFound
    );
}

#[test]
fn k33_is_found_by_every_search() {
    let g = k33();
    let k33_hit = search(&g, SearchTarget::K33).unwrap();
    assert_eq!(witness_kind(6, &k33_hit), Some(ObstructionKind::K33));
    assert!(matches!(
        search(&g, SearchTarget::K23).unwrap(),
        SearchOutcome::Found { .. }
    ));
    assert!(matches!(
        search(&g, SearchTarget::K4).unwrap(),
        SearchOutcome::Found { .. }
    ));
}

#[test]
fn petersen_contains_k33() {
    let outcome = search(&petersen(), SearchTarget::K33).unwrap();
    assert_eq!(witness_kind(10, &outcome), Some(ObstructionKind::K33));
}

#[test]
fn wheel_contains_k23_and_k4_but_no_k33() {
    let g = wheel(5);
    assert!(matches!(
        search(&g, SearchTarget::K23).unwrap(),
        SearchOutcome::Found { .. }
    ));
    assert!(matches!(
        search(&g, SearchTarget::K4).unwrap(),
        SearchOutcome::Found { .. }
    ));
    // the wheel is planar, so it cannot host a K3,3 homeomorph
    assert_eq!(
        search(&g, SearchTarget::K33).unwrap(),
        SearchOutcome::NotFound
    );
}

#[test]
fn search_does_not_mutate_the_input() {
    let g = petersen();
    let before: Vec<_> = g.edges().collect();
    let _ = search(&g, SearchTarget::K33).unwrap();
    let after: Vec<_> = g.edges().collect();
    assert_eq!(before, after);
}
