//! planarity CLI -- embed, search, draw, and exercise random graphs.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use planarity_core::extend::search::SearchTarget;
use planarity_core::EmbedMode;

#[derive(Debug, Parser)]
#[command(
    name = "planarity",
    about = "Linear-time planarity testing, embedding, and obstruction isolation"
)]
pub struct App {
    /// Suppress informational messages
    #[arg(short, long, global = true)]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Planar embedding and Kuratowski subgraph isolation
    Planar(GraphArgs),
    /// Outerplanar embedding and obstruction isolation
    Outerplanar(GraphArgs),
    /// Planar embedding plus a visibility drawing
    Draw(GraphArgs),
    /// Search for a subgraph homeomorphic to K2,3
    K23(GraphArgs),
    /// Search for a subgraph homeomorphic to K3,3
    K33(GraphArgs),
    /// Search for a subgraph homeomorphic to K4
    K4(GraphArgs),
    /// Generate one random graph and test it
    Random(RandomArgs),
    /// Generate and test a batch of random graphs
    RandomBatch(RandomBatchArgs),
    /// Run the built-in regression corpus through every mode
    Selftest,
}

#[derive(Debug, Parser)]
pub struct GraphArgs {
    /// Input graph file
    pub infile: PathBuf,
    /// Primary output file (embedding, or the found subgraph for searches)
    pub outfile: Option<PathBuf>,
    /// Secondary output file (obstruction, or the drawing for `draw`)
    pub outfile2: Option<PathBuf>,
    /// Input format
    #[arg(long, value_enum, default_value = "adjlist")]
    pub format: InputFormat,
    /// Neighbor indices in the input are zero-based
    #[arg(long)]
    pub zero_based: bool,
    /// Reject duplicate edges and over-full graphs instead of tolerating them
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum InputFormat {
    Adjlist,
    Adjmatrix,
}

#[derive(Debug, Parser)]
pub struct RandomArgs {
    /// Number of vertices
    #[arg(long, default_value_t = 12)]
    pub n: usize,
    /// Add one edge beyond the planar maximum
    #[arg(long)]
    pub nonplanar: bool,
    /// Where to write the embedding or obstruction
    pub outfile: Option<PathBuf>,
    /// Where to write the generated graph itself
    pub outfile2: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct RandomBatchArgs {
    /// Number of graphs
    #[arg(long, default_value_t = 100)]
    pub count: u64,
    /// Number of vertices per graph
    #[arg(long, default_value_t = 12)]
    pub n: usize,
    /// Number of edges per graph (defaults to 3n, past the planar bound)
    #[arg(long)]
    pub edges: Option<usize>,
    /// Emit one JSON object per graph instead of text
    #[arg(long)]
    pub json: bool,
}

/// The work a per-file command resolves to.
#[derive(Debug, Copy, Clone)]
pub enum Task {
    Embed(EmbedMode),
    Search(SearchTarget),
}

impl Command {
    #[must_use]
    pub const fn task(&self) -> Option<Task> {
        match self {
            Self::Planar(_) => Some(Task::Embed(EmbedMode::Planar)),
            Self::Outerplanar(_) => Some(Task::Embed(EmbedMode::Outerplanar)),
            Self::Draw(_) => Some(Task::Embed(EmbedMode::DrawPlanar)),
            Self::K23(_) => Some(Task::Search(SearchTarget::K23)),
            Self::K33(_) => Some(Task::Search(SearchTarget::K33)),
            Self::K4(_) => Some(Task::Search(SearchTarget::K4)),
            _ => None,
        }
    }
}
