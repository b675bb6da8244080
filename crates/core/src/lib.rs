//! Linear-time planarity testing, embedding, and obstruction isolation.
//!
//! `planarity_core` implements the Boyer–Myrvold edge-addition method.
//! Given an undirected simple graph it either constructs a combinatorial
//! planar embedding (a circular adjacency ordering around every vertex that
//! corresponds to some planar drawing) or isolates a subgraph homeomorphic
//! to K5 or K3,3 proving the input non-planar. The same machinery,
//! re-parameterised through the [`extend`] hooks, solves the companion
//! problems:
//!
//! 1. **Planar** -- embedding or Kuratowski obstruction (K5 / K3,3).
//! 2. **Outerplanar** -- embedding with every vertex on the outer face, or
//!    an obstruction homeomorphic to K2,3 / K4.
//! 3. **Subgraph search** -- homeomorphs of K2,3, K3,3, or K4.
//! 4. **Drawing** -- a visibility representation of a planar embedding,
//!    rendered as character art.
//!
//! The embedder runs in O(n) time and space: one depth-first preprocessing
//! pass computes low-points and sorted child lists, then the main loop adds
//! back edges one ancestor at a time, maintaining biconnected components as
//! circular arc lists whose two per-vertex link slots double as the
//! external face (Walkup marks pertinence, Walkdown embeds and merges).
//! No allocation happens after a graph is initialized.
//!
//! # Entry point
//!
//! The main entry point is [`embed()`], which takes a [`Graph`] and an
//! [`EmbedMode`] and returns an [`EmbedOutcome`]: either `Embedded` (the
//! graph now holds the adjacency orderings) or `Obstructed` (the graph has
//! been reduced to the obstruction subgraph).
//!
//! ```rust,ignore
//! use planarity_core::{embed, EmbedMode, EmbedOutcome, Graph};
//!
//! let mut g = Graph::with_capacity(5);
//! for (u, v) in [(0, 1), (1, 2), (2, 0), (0, 3), (3, 4)] {
//!     g.add_edge(u, v)?;
//! }
//! match embed(&mut g, EmbedMode::Planar)? {
//!     EmbedOutcome::Embedded => println!("planar"),
//!     EmbedOutcome::Obstructed(kind) => println!("not planar: {kind:?}"),
//! }
//! ```
//!
//! # Crate features
//!
//! - **`serde`** -- enables `Serialize`/`Deserialize` derives on the public
//!   result types (`EmbedMode`, `EmbedOutcome`, `ObstructionKind`,
//!   `GraphError`).
//!
//! This crate is `no_std` compatible (requires `alloc`). The ADJLIST and
//! ADJMATRIX readers live in the separate `planarity_formats` crate.

#![cfg_attr(not(test), no_std)]
extern crate alloc;

pub mod draw;
pub mod embed;
pub mod error;
pub mod extend;
pub mod graph;
pub mod integrity;
pub mod obstruct;

pub use embed::{embed, EmbedMode, EmbedOutcome, ObstructionKind};
pub use error::GraphError;
pub use graph::Graph;
