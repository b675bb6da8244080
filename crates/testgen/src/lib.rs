//! Random graph generation for the planarity drivers.

pub mod generator;

pub use generator::{
    generate_batch, generate_maximal_planar, generate_nonplanar, generate_random_graph,
    BatchKind, GenParams, GeneratedGraph, TestRunStats,
};
