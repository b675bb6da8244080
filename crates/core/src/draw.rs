//! Visibility-style rendering of a planar embedding.
//!
//! Each vertex becomes a horizontal bar on its own row and each edge a
//! vertical column connecting the rows of its endpoints. Rows follow a
//! DFS order of the embedding and columns are handed out in rotation
//! order at the earlier endpoint, so edges incident to a vertex occupy a
//! contiguous span and the rendition follows the combinatorial embedding.
//! The output is the character art the drawing command writes next to an
//! embedding: `-` for vertex bars and `|` for edge columns.

use alloc::string::String;
use alloc::vec::Vec;

use crate::graph::{Graph, Index, NIL};

/// A vertex's horizontal segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexBar {
    pub vertex: Index,
    pub row: usize,
    pub col_min: usize,
    pub col_max: usize,
}

/// An edge's vertical segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeColumn {
    pub upper: Index,
    pub lower: Index,
    pub col: usize,
    pub row_min: usize,
    pub row_max: usize,
}

/// The computed representation; rows and columns index into a grid of
/// `height` text lines and `width` characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityRep {
    pub bars: Vec<VertexBar>,
    pub columns: Vec<EdgeColumn>,
    pub width: usize,
    pub height: usize,
}

/// Compute the bar/column layout for an embedded graph.
#[must_use]
pub fn visibility_representation(g: &Graph) -> VisibilityRep {
    let n = g.vertex_count();
    // rows: DFS discovery order over the embedding's rotations
    let mut row_of = alloc::vec![NIL; n];
    let mut order: Vec<Index> = Vec::with_capacity(n);
    let mut stack: Vec<Index> = Vec::new();
    for s in 0..n {
        if row_of[s] != NIL {
            continue;
        }
        row_of[s] = order.len();
        order.push(s);
        stack.push(s);
        while let Some(z) = stack.pop() {
            for w in g.neighbors(z) {
                if row_of[w] == NIL {
                    row_of[w] = order.len();
                    order.push(w);
                    stack.push(w);
                }
            }
        }
    }

    // columns: rotation order at the higher (earlier-row) endpoint
    let mut next_col = 0usize;
    let mut col_span = alloc::vec![(usize::MAX, 0usize); n];
    let mut columns: Vec<EdgeColumn> = Vec::new();
    for &u in &order {
        for w in g.neighbors(u) {
            if row_of[w] < row_of[u] || (row_of[w] == row_of[u] && w <= u) {
                continue;
            }
            let col = next_col;
            next_col += 1;
            for z in [u, w] {
                let (lo, hi) = col_span[z];
                col_span[z] = (lo.min(col), hi.max(col));
            }
            columns.push(EdgeColumn {
                upper: u,
                lower: w,
                col,
                row_min: row_of[u],
                row_max: row_of[w],
            });
        }
    }

    let mut bars: Vec<VertexBar> = Vec::with_capacity(n);
    for z in 0..n {
        let (lo, hi) = col_span[z];
        let (col_min, col_max) = if lo == usize::MAX {
            // isolated vertex: give it its own column
            let col = next_col;
            next_col += 1;
            (col, col)
        } else {
            (lo, hi)
        };
        bars.push(VertexBar {
            vertex: z,
            row: row_of[z],
            col_min,
            col_max,
        });
    }

    VisibilityRep {
        bars,
        columns,
        width: next_col.max(1),
        height: n,
    }
}

/// Render the representation as character art. Vertex rows are labelled
/// with the vertex number followed by its bar; edge columns run between
/// their endpoint rows.
#[must_use]
pub fn render(g: &Graph) -> String {
    let rep = visibility_representation(g);
    let label_pad = 4usize;
    let cell = 2usize; // one column per edge plus breathing space
    let width = label_pad + rep.width * cell + 1;
    let height = if rep.height == 0 { 0 } else { 2 * rep.height - 1 };
    let mut grid = alloc::vec![alloc::vec![b' '; width]; height];

    for bar in &rep.bars {
        let line = 2 * bar.row;
        let from = label_pad + bar.col_min * cell;
        let to = label_pad + bar.col_max * cell;
        for x in from..=to {
            grid[line][x] = b'-';
        }
        let label = alloc::format!("{}", bar.vertex);
        for (i, ch) in label.bytes().enumerate() {
            if i < label_pad - 1 {
                grid[line][i] = ch;
            }
        }
    }
    for colm in &rep.columns {
        let x = label_pad + colm.col * cell;
        let from = 2 * colm.row_min + 1;
        let to = 2 * colm.row_max;
        for line in from..to {
            if grid[line][x] == b' ' {
                grid[line][x] = b'|';
            }
        }
    }

    let mut out = String::new();
    for line in grid {
        let trimmed = {
            let mut end = line.len();
            while end > 0 && line[end - 1] == b' ' {
                end -= 1;
            }
            &line[..end]
        };
        out.push_str(core::str::from_utf8(trimmed).unwrap_or(""));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_layout() {
        let mut g = Graph::with_capacity(3);
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 2).unwrap();
        let rep = visibility_representation(&g);
        assert_eq!(rep.height, 3);
        assert_eq!(rep.columns.len(), 2);
        let art = render(&g);
        assert!(art.contains('-'));
        assert!(art.contains('|'));
    }

    #[test]
    fn test_isolated_vertex_gets_a_bar() {
        let g = Graph::with_capacity(2);
        let rep = visibility_representation(&g);
        assert_eq!(rep.bars.len(), 2);
        assert_ne!(rep.bars[0].col_min, rep.bars[1].col_min);
    }
}
