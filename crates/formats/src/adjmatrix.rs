//! Adjacency-matrix reader and writer: the vertex count on its own line,
//! then N rows of N whitespace-separated 0/1 entries.

use planarity_core::{Graph, GraphError};
use winnow::ascii::{dec_uint, space0};
use winnow::combinator::preceded;
use winnow::prelude::*;

use crate::{FormatError, ReadOptions, ReadOutcome};

/// Parse adjacency-matrix text into a graph. Asymmetric entries are an
/// error in strict mode and are unioned otherwise.
///
/// # Errors
///
/// [`FormatError::Parse`] for malformed text or a non-square matrix,
/// [`FormatError::Graph`] for structural failures.
pub fn read_adjacency_matrix(
    input: &str,
    options: ReadOptions,
) -> Result<ReadOutcome, FormatError> {
    let mut lines = input.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());
    let (line_no, first) = lines.next().ok_or(FormatError::Parse {
        line: 1,
        message: "empty input".into(),
    })?;
    let mut cursor = first;
    let n: usize = preceded(space0, dec_uint)
        .parse_next(&mut cursor)
        .map_err(|_: winnow::error::ErrMode<winnow::error::ContextError>| FormatError::Parse {
            line: line_no + 1,
            message: "expected vertex count".into(),
        })?;

    let mut rows: Vec<Vec<u8>> = Vec::with_capacity(n);
    for (line_no, line) in lines.take(n) {
        let mut row = Vec::with_capacity(n);
        for token in line.split_whitespace() {
            match token {
                "0" => row.push(0),
                "1" => row.push(1),
                other => {
                    return Err(FormatError::Parse {
                        line: line_no + 1,
                        message: format!("expected 0 or 1, found {other:?}"),
                    })
                }
            }
        }
        if row.len() != n {
            return Err(FormatError::Parse {
                line: line_no + 1,
                message: format!("expected {n} entries, found {}", row.len()),
            });
        }
        rows.push(row);
    }
    if rows.len() != n {
        return Err(FormatError::Parse {
            line: 0,
            message: format!("expected {n} matrix rows, found {}", rows.len()),
        });
    }

    let mut graph = Graph::with_capacity(n);
    let mut dropped = 0usize;
    for i in 0..n {
        for j in (i + 1)..n {
            let here = rows[i][j] == 1;
            let there = rows[j][i] == 1;
            if options.strict && here != there {
                return Err(FormatError::Parse {
                    line: 0,
                    message: format!("asymmetric entry at ({i}, {j})"),
                });
            }
            if here || there {
                match graph.add_edge(i, j) {
                    Ok(()) => {}
                    Err(GraphError::TooManyEdges) if !options.strict => dropped += 1,
                    Err(e) => return Err(e.into()),
                }
            }
        }
    }
    Ok(ReadOutcome {
        graph,
        dropped_edges: dropped,
    })
}

/// Write a graph as adjacency-matrix text.
#[must_use]
pub fn write_adjacency_matrix(g: &Graph) -> String {
    let n = g.vertex_count();
    let mut matrix = vec![vec![0u8; n]; n];
    for (u, v) in g.edges() {
        matrix[u][v] = 1;
        matrix[v][u] = 1;
    }
    let mut out = format!("{n}\n");
    for row in matrix {
        let cells: Vec<String> = row.iter().map(|b| format!("{b}")).collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let mut g = Graph::with_capacity(3);
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 2).unwrap();
        let text = write_adjacency_matrix(&g);
        let back = read_adjacency_matrix(&text, ReadOptions::default()).unwrap();
        let a: Vec<_> = g.edges().collect();
        let mut b: Vec<_> = back.graph.edges().collect();
        b.sort_unstable();
        let mut a_sorted = a;
        a_sorted.sort_unstable();
        assert_eq!(a_sorted, b);
    }

    #[test]
    fn test_rejects_garbage() {
        let text = "2\n0 x\n1 0\n";
        assert!(read_adjacency_matrix(text, ReadOptions::default()).is_err());
    }

    #[test]
    fn test_asymmetric_strict() {
        let text = "2\n0 1\n0 0\n";
        let tolerant = read_adjacency_matrix(text, ReadOptions::default()).unwrap();
        assert_eq!(tolerant.graph.edge_count(), 1);
        let strict = read_adjacency_matrix(
            text,
            ReadOptions {
                zero_based: false,
                strict: true,
            },
        );
        assert!(strict.is_err());
    }
}
