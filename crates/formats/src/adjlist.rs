//! Adjacency-list reader and writer.
//!
//! Grammar:
//! ```text
//! file    = header NEWLINE (row NEWLINE?)*
//! header  = "N=" INTEGER | INTEGER
//! row     = INTEGER ":" (neighbor)* terminator
//! neighbor = "-"? INTEGER          -- "-" marks an ordering-only edge
//! terminator = "0" (one-based) | "-1" (zero-based)
//! ```

use hashbrown::HashSet;
use planarity_core::{Graph, GraphError};
use winnow::ascii::{dec_uint, space0, space1};
use winnow::combinator::{opt, preceded, separated};
use winnow::prelude::*;
use winnow::token::literal;
use winnow::ModalResult;

use crate::{FormatError, ReadOptions, ReadOutcome};

fn header(input: &mut &str) -> ModalResult<usize> {
    preceded((space0, opt(literal("N=")), space0), dec_uint).parse_next(input)
}

/// One neighbor token: an optional ordering-only dash and the index.
fn neighbor(input: &mut &str) -> ModalResult<(bool, usize)> {
    (opt(literal("-")), dec_uint)
        .map(|(dash, idx): (Option<&str>, usize)| (dash.is_some(), idx))
        .parse_next(input)
}

fn row(input: &mut &str) -> ModalResult<(usize, Vec<(bool, usize)>)> {
    let vertex: usize = preceded(space0, dec_uint).parse_next(input)?;
    let _ = (space0, literal(":"), space0).parse_next(input)?;
    let neighbors: Vec<(bool, usize)> = separated(0.., neighbor, space1).parse_next(input)?;
    let _ = space0.parse_next(input)?;
    Ok((vertex, neighbors))
}

/// Parse adjacency-list text into a graph.
///
/// # Errors
///
/// [`FormatError::Parse`] for malformed text, [`FormatError::Graph`] when
/// the edges cannot be applied (strict mode duplicates, bad indices).
pub fn read_adjacency_list(input: &str, options: ReadOptions) -> Result<ReadOutcome, FormatError> {
    let mut lines = input.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());

    let (line_no, first) = lines.next().ok_or(FormatError::Parse {
        line: 1,
        message: "empty input".into(),
    })?;
    let mut rest = first;
    let n = header(&mut rest).map_err(|_| FormatError::Parse {
        line: line_no + 1,
        message: "expected vertex count".into(),
    })?;

    let mut graph = Graph::with_capacity(n);
    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    let mut directed: HashSet<(usize, usize)> = HashSet::new();
    let mut dropped = 0usize;

    for (line_no, line) in lines {
        let mut cursor = line;
        let (vertex, neighbors) = row(&mut cursor).map_err(|_| FormatError::Parse {
            line: line_no + 1,
            message: "malformed adjacency row".into(),
        })?;
        if vertex >= n {
            return Err(FormatError::Parse {
                line: line_no + 1,
                message: format!("vertex {vertex} out of range"),
            });
        }

        let mut terminated = false;
        for (dash, raw) in neighbors {
            if terminated {
                return Err(FormatError::Parse {
                    line: line_no + 1,
                    message: "tokens after terminator".into(),
                });
            }
            // terminator: 0 in one-based mode; in zero-based mode the
            // dash+1 pair ("-1") plays that role
            if !options.zero_based && raw == 0 && !dash {
                terminated = true;
                continue;
            }
            if options.zero_based && dash && raw == 1 {
                terminated = true;
                continue;
            }
            let target = if options.zero_based {
                raw
            } else {
                if raw == 0 {
                    return Err(FormatError::Parse {
                        line: line_no + 1,
                        message: "neighbor 0 in one-based mode".into(),
                    });
                }
                raw - 1
            };
            if target >= n {
                return Err(FormatError::Parse {
                    line: line_no + 1,
                    message: format!("neighbor {target} out of range"),
                });
            }
            // each edge legitimately appears on both endpoint rows; a
            // repeat of the same directed pair is a true duplicate
            if !directed.insert((vertex, target)) {
                if options.strict {
                    return Err(GraphError::InvalidInput.into());
                }
                continue;
            }
            let key = (vertex.min(target), vertex.max(target));
            if !seen.insert(key) {
                continue;
            }
            match graph.add_edge(key.0, key.1) {
                Ok(()) => {}
                Err(GraphError::TooManyEdges) if !options.strict => dropped += 1,
                Err(e) => return Err(e.into()),
            }
        }
        if !terminated {
            return Err(FormatError::Parse {
                line: line_no + 1,
                message: "missing terminator".into(),
            });
        }
    }

    Ok(ReadOutcome {
        graph,
        dropped_edges: dropped,
    })
}

/// Write a graph as one-based adjacency-list text; neighbor order is the
/// graph's rotation order, so a written embedding round-trips.
#[must_use]
pub fn write_adjacency_list(g: &Graph) -> String {
    let n = g.vertex_count();
    let mut out = format!("N={n}\n");
    for v in 0..n {
        out.push_str(&format!("{v}:"));
        for w in g.neighbors(v) {
            out.push_str(&format!(" {}", w + 1));
        }
        out.push_str(" 0\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_one_based() {
        let text = "N=3\n0: 2 3 0\n1: 1 3 0\n2: 1 2 0\n";
        let outcome = read_adjacency_list(text, ReadOptions::default()).unwrap();
        assert_eq!(outcome.graph.vertex_count(), 3);
        assert_eq!(outcome.graph.edge_count(), 3);
        assert_eq!(outcome.dropped_edges, 0);
    }

    #[test]
    fn test_read_zero_based() {
        let text = "3\n0: 1 2 -1\n1: 0 -1\n2: 0 -1\n";
        let outcome = read_adjacency_list(
            text,
            ReadOptions {
                zero_based: true,
                strict: false,
            },
        )
        .unwrap();
        assert_eq!(outcome.graph.edge_count(), 2);
    }

    #[test]
    fn test_roundtrip() {
        let mut g = Graph::with_capacity(4);
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 2).unwrap();
        g.add_edge(2, 3).unwrap();
        let text = write_adjacency_list(&g);
        let back = read_adjacency_list(&text, ReadOptions::default()).unwrap();
        let a: Vec<_> = g.edges().collect();
        let b: Vec<_> = back.graph.edges().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_terminator() {
        let text = "N=2\n0: 2\n1: 1 0\n";
        assert!(matches!(
            read_adjacency_list(text, ReadOptions::default()),
            Err(FormatError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_tolerant_drop_beyond_limit() {
        // K5 has 10 edges but 3n-6 = 9 for n = 5
        let mut text = String::from("N=5\n");
        for v in 0..5u32 {
            text.push_str(&format!("{v}:"));
            for w in 0..5u32 {
                if w != v {
                    text.push_str(&format!(" {}", w + 1));
                }
            }
            text.push_str(" 0\n");
        }
        let outcome = read_adjacency_list(&text, ReadOptions::default()).unwrap();
        assert_eq!(outcome.graph.edge_count(), 9);
        assert_eq!(outcome.dropped_edges, 1);
    }
}
