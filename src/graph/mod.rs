//! Graph workbench engine.
//!
//! Holds a user-built graph in memory and answers structural questions
//! about it: connected components, bridges, bipartiteness, degrees, the
//! adjacency matrix and its spectrum, and weighted shortest paths.
//!
//! ## Architecture
//!
//! ```text
//! shell / script line ──► commands::parse_line ──► Command
//!                                                     │
//!                                         GraphEngine::execute
//!                                          │                 │
//!                              store (StableDiGraph)    EigenSolver
//!                                          │
//!                                     algorithms
//!                                          │
//!                                  Outcome (text / JSON)
//! ```
//!
//! ## Modules
//!
//! - [`models`]: Data structures (Node, Edge, Component, ShortestPath, GraphReport, SpectrumConfig)
//! - [`error`]: `GraphError` taxonomy
//! - [`store`]: `GraphStore`, the mutable node/edge container
//! - [`algorithms`]: Components, bipartiteness, bridges, Dijkstra, degrees, adjacency matrix
//! - [`spectrum`]: `EigenSolver` trait and the Jacobi implementation
//! - [`engine`]: `GraphEngine`, one interactive session
//! - [`commands`]: Line grammar, `Command` dispatch and `Outcome` rendering
//! - [`mock`]: `MockEigenSolver` for testing (cfg(test) only)

pub mod algorithms;
pub mod commands;
pub mod engine;
pub mod error;
pub mod models;
pub mod spectrum;
pub mod store;

#[cfg(test)]
pub mod mock;

// Re-export primary types for convenience
pub use commands::{help_text, parse_line, Command, Outcome, ParsedLine, Toggle};
pub use engine::GraphEngine;
pub use error::{GraphError, GraphResult};
pub use models::{
    AdjacencyMatrix, Component, DegreeEntry, Edge, EdgeId, EigenDecomposition, GraphMode,
    GraphReport, GraphSummary, Node, NodeId, PathStep, Position, ShortestPath, SpectrumConfig,
    DEFAULT_EDGE_WEIGHT,
};
pub use spectrum::{EigenSolver, JacobiEigenSolver};
pub use store::GraphStore;
