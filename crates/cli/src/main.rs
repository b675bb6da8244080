use std::path::Path;
use std::{fs, process};

use clap::Parser;
use planarity_cli::{App, Command, GraphArgs, InputFormat, RandomArgs, RandomBatchArgs, Task};
use planarity_core::extend::search::{search, SearchOutcome, SearchTarget};
use planarity_core::integrity::check_embed_integrity;
use planarity_core::{draw, embed, EmbedMode, EmbedOutcome, Graph};
use planarity_formats::{
    read_adjacency_list, read_adjacency_matrix, write_adjacency_list, ReadOptions, ReadOutcome,
};
use planarity_testgen::{generate_batch, BatchKind, TestRunStats};
use tracing_subscriber::EnvFilter;

const EXIT_EMBEDDABLE: i32 = 0;
const EXIT_NONEMBEDDABLE: i32 = 1;
const EXIT_ERROR: i32 = 2;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let app = App::parse();
    let quiet = app.quiet;
    let code = match &app.command {
        Command::Planar(args)
        | Command::Outerplanar(args)
        | Command::Draw(args)
        | Command::K23(args)
        | Command::K33(args)
        | Command::K4(args) => match app.command.task() {
            Some(task) => run_graph_command(quiet, task, args),
            None => unreachable!("per-file commands always resolve to a task"),
        },
        Command::Random(args) => run_random(quiet, args),
        Command::RandomBatch(args) => run_random_batch(quiet, args),
        Command::Selftest => run_selftest(quiet),
    };
    process::exit(code);
}

fn message(quiet: bool, text: &str) {
    if !quiet {
        println!("{text}");
    }
}

fn read_graph(args: &GraphArgs, quiet: bool) -> Result<ReadOutcome, i32> {
    let text = fs::read_to_string(&args.infile).map_err(|e| {
        eprintln!("Failed to read {}: {e}", args.infile.display());
        EXIT_ERROR
    })?;
    let options = ReadOptions {
        zero_based: args.zero_based,
        strict: args.strict,
    };
    let outcome = match args.format {
        InputFormat::Adjlist => read_adjacency_list(&text, options),
        InputFormat::Adjmatrix => read_adjacency_matrix(&text, options),
    }
    .map_err(|e| {
        eprintln!("Failed to read graph: {e}");
        EXIT_ERROR
    })?;
    if outcome.dropped_edges > 0 {
        message(quiet, "The graph contains too many edges.");
        message(
            quiet,
            "Some edges were removed, but the algorithm will still run correctly.",
        );
    }
    Ok(outcome)
}

fn write_file(path: &Path, content: &str) -> Result<(), i32> {
    fs::write(path, content).map_err(|e| {
        eprintln!("Failed to write {}: {e}", path.display());
        EXIT_ERROR
    })
}

fn run_graph_command(quiet: bool, task: Task, args: &GraphArgs) -> i32 {
    match read_graph(args, quiet) {
        Ok(outcome) => match task {
            Task::Embed(mode) => run_embed(quiet, mode, args, outcome.graph),
            Task::Search(target) => run_search(quiet, target, args, &outcome.graph),
        },
        Err(code) => code,
    }
}

fn run_embed(quiet: bool, mode: EmbedMode, args: &GraphArgs, mut graph: Graph) -> i32 {
    let original = graph.dup();
    let outcome = match embed(&mut graph, mode) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Embed failed: {e}");
            return EXIT_ERROR;
        }
    };
    graph.sort_vertices();

    if let Err(e) = check_embed_integrity(&graph, &original, outcome, mode) {
        eprintln!("AN ERROR HAS BEEN DETECTED: {e}");
        return EXIT_ERROR;
    }

    let adjective = if mode.keeps_all_vertices_outer() {
        "outerplanar"
    } else {
        "planar"
    };
    let embedded = outcome == EmbedOutcome::Embedded;
    message(
        quiet,
        &format!(
            "The graph is{} {adjective}.",
            if embedded { "" } else { " not" }
        ),
    );

    // primary output: the embedding, skipped when there is none
    if embedded {
        if let Some(path) = &args.outfile {
            if write_file(path, &write_adjacency_list(&graph)).is_err() {
                return EXIT_ERROR;
            }
        }
    }
    // secondary output: the obstruction, or the drawing
    if let Some(path) = &args.outfile2 {
        if embedded && mode == EmbedMode::DrawPlanar {
            if write_file(path, &draw::render(&graph)).is_err() {
                return EXIT_ERROR;
            }
        } else if !embedded {
            if write_file(path, &write_adjacency_list(&graph)).is_err() {
                return EXIT_ERROR;
            }
        }
    }

    if embedded {
        EXIT_EMBEDDABLE
    } else {
        EXIT_NONEMBEDDABLE
    }
}

fn target_name(target: SearchTarget) -> &'static str {
    match target {
        SearchTarget::K23 => "K_{2,3}",
        SearchTarget::K33 => "K_{3,3}",
        SearchTarget::K4 => "K_4",
    }
}

fn run_search(quiet: bool, target: SearchTarget, args: &GraphArgs, graph: &Graph) -> i32 {
    match search(graph, target) {
        Ok(SearchOutcome::NotFound) => {
            message(
                quiet,
                &format!(
                    "The graph does not contain a subgraph homeomorphic to {}.",
                    target_name(target)
                ),
            );
            EXIT_EMBEDDABLE
        }
        Ok(SearchOutcome::Found { edges }) => {
            message(
                quiet,
                &format!(
                    "The graph contains a subgraph homeomorphic to {}.",
                    target_name(target)
                ),
            );
            if let Some(path) = &args.outfile {
                let mut witness = Graph::with_capacity(graph.vertex_count());
                witness.allow_extra_edges = true;
                for (a, b) in edges {
                    if witness.add_edge(a, b).is_err() {
                        eprintln!("AN ERROR HAS BEEN DETECTED: witness rebuild failed");
                        return EXIT_ERROR;
                    }
                }
                if write_file(path, &write_adjacency_list(&witness)).is_err() {
                    return EXIT_ERROR;
                }
            }
            EXIT_NONEMBEDDABLE
        }
        Err(e) => {
            eprintln!("Search failed: {e}");
            EXIT_ERROR
        }
    }
}

fn graph_from_edges(n: usize, edges: &[(usize, usize)], allow_extra: bool) -> Option<Graph> {
    let mut g = Graph::with_capacity(n);
    g.allow_extra_edges = allow_extra;
    for &(a, b) in edges {
        if g.add_edge(a, b).is_err() {
            return None;
        }
    }
    Some(g)
}

fn run_random(quiet: bool, args: &RandomArgs) -> i32 {
    let edges = if args.nonplanar {
        match planarity_testgen::generate_nonplanar(args.n) {
            Some(edges) => edges,
            None => {
                eprintln!("Order {} is too small for a nonplanar graph", args.n);
                return EXIT_ERROR;
            }
        }
    } else {
        planarity_testgen::generate_maximal_planar(args.n)
    };

    let Some(mut graph) = graph_from_edges(args.n, &edges, true) else {
        eprintln!("Failed to build the generated graph");
        return EXIT_ERROR;
    };
    if let Some(path) = &args.outfile2 {
        if write_file(path, &write_adjacency_list(&graph)).is_err() {
            return EXIT_ERROR;
        }
    }

    let original = graph.dup();
    let outcome = match embed(&mut graph, EmbedMode::Planar) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Embed failed: {e}");
            return EXIT_ERROR;
        }
    };
    graph.sort_vertices();
    if let Err(e) = check_embed_integrity(&graph, &original, outcome, EmbedMode::Planar) {
        eprintln!("AN ERROR HAS BEEN DETECTED: {e}");
        return EXIT_ERROR;
    }
    let embedded = outcome == EmbedOutcome::Embedded;
    message(
        quiet,
        &format!("The graph is{} planar.", if embedded { "" } else { " not" }),
    );
    if let Some(path) = &args.outfile {
        if write_file(path, &write_adjacency_list(&graph)).is_err() {
            return EXIT_ERROR;
        }
    }
    if embedded {
        EXIT_EMBEDDABLE
    } else {
        EXIT_NONEMBEDDABLE
    }
}

fn run_random_batch(quiet: bool, args: &RandomBatchArgs) -> i32 {
    let kind = args.edges.map_or(
        BatchKind::Random {
            n_edges: 3 * args.n,
        },
        |n_edges| BatchKind::Random { n_edges },
    );
    let batch = generate_batch(args.count, args.n, kind);
    let mut stats = TestRunStats::default();

    for item in &batch {
        stats.num_graphs += 1;
        let Some(mut graph) = graph_from_edges(args.n, item.get_edges(), true) else {
            stats.num_errors += 1;
            continue;
        };
        let original = graph.dup();
        match embed(&mut graph, EmbedMode::Planar) {
            Ok(outcome) => {
                graph.sort_vertices();
                if check_embed_integrity(&graph, &original, outcome, EmbedMode::Planar).is_err() {
                    stats.num_errors += 1;
                } else if outcome == EmbedOutcome::Embedded {
                    stats.num_oks += 1;
                }
            }
            Err(_) => stats.num_errors += 1,
        }
        if args.json {
            let record = serde_json::json!({
                "id": item.get_id(),
                "n": item.get_params().n_vertices,
                "m": item.get_params().n_edges,
            });
            println!("{record}");
        }
    }

    message(quiet, &format!("{stats}"));
    if stats.num_errors > 0 {
        EXIT_ERROR
    } else {
        EXIT_EMBEDDABLE
    }
}

/// The regression corpus: named graphs with known behaviour in every
/// mode.
fn corpus() -> Vec<(&'static str, usize, Vec<(usize, usize)>)> {
    let k5 = (0..5)
        .flat_map(|a| ((a + 1)..5).map(move |b| (a, b)))
        .collect();
    let k33 = vec![
        (0, 3),
        (0, 4),
        (0, 5),
        (1, 3),
        (1, 4),
        (1, 5),
        (2, 3),
        (2, 4),
        (2, 5),
    ];
    let k4 = vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];
    let petersen = vec![
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
    ];
    let path5 = vec![(0, 1), (1, 2), (2, 3), (3, 4)];
    let triangle = vec![(0, 1), (1, 2), (2, 0)];
    let wheel5 = vec![
        (0, 1),
        (0, 2),
        (0, 3),
        (0, 4),
        (0, 5),
        (1, 2),
        (2, 3),
        (3, 4),
        (4, 5),
        (5, 1),
    ];
    vec![
        ("K5", 5, k5),
        ("K33", 6, k33),
        ("K4", 4, k4),
        ("Petersen", 10, petersen),
        ("Path5", 5, path5),
        ("Triangle", 3, triangle),
        ("Wheel5", 6, wheel5),
    ]
}

fn run_selftest(quiet: bool) -> i32 {
    let corpus = corpus();
    // (label, expected number of non-embeddable / found results)
    let expectations: [(&str, u64); 5] = [
        ("p", 3),
        ("o", 5),
        ("2", 4),
        ("3", 2),
        ("4", 5),
    ];
    let mut failed = false;

    for (label, expected) in expectations {
        let mut hits = 0u64;
        for (name, n, edges) in &corpus {
            let Some(mut graph) = graph_from_edges(*n, edges, true) else {
                eprintln!("{name}: corpus graph rebuild failed");
                failed = true;
                continue;
            };
            let hit = match label {
                "p" | "o" => {
                    let mode = if label == "p" {
                        EmbedMode::Planar
                    } else {
                        EmbedMode::Outerplanar
                    };
                    let original = graph.dup();
                    match embed(&mut graph, mode) {
                        Ok(outcome) => {
                            graph.sort_vertices();
                            if let Err(e) =
                                check_embed_integrity(&graph, &original, outcome, mode)
                            {
                                eprintln!("{name} ({label}): integrity failure: {e}");
                                failed = true;
                            }
                            outcome != EmbedOutcome::Embedded
                        }
                        Err(e) => {
                            eprintln!("{name} ({label}): embed failed: {e}");
                            failed = true;
                            false
                        }
                    }
                }
                _ => {
                    let target = match label {
                        "2" => SearchTarget::K23,
                        "3" => SearchTarget::K33,
                        _ => SearchTarget::K4,
                    };
                    match search(&graph, target) {
                        Ok(SearchOutcome::Found { .. }) => true,
                        Ok(SearchOutcome::NotFound) => false,
                        Err(e) => {
                            eprintln!("{name} ({label}): search failed: {e}");
                            failed = true;
                            false
                        }
                    }
                }
            };
            if hit {
                hits += 1;
            }
        }
        message(quiet, &format!("N({label}) = {hits}"));
        if hits != expected {
            eprintln!("Expected N({label}) = {expected}, got {hits}");
            failed = true;
        }
    }

    if failed {
        EXIT_ERROR
    } else {
        message(quiet, "NO ERRORS");
        EXIT_EMBEDDABLE
    }
}
