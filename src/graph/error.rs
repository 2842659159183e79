//! Engine error taxonomy.
//!
//! Every variant is detected before any state is touched, so a rejected
//! operation never leaves the store half-mutated.

use super::models::{EdgeId, NodeId};

/// Errors surfaced to the caller of a store, algorithm, or engine operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("node {0} already exists")]
    DuplicateId(NodeId),

    #[error("edge endpoint {0} does not exist")]
    UnknownEndpoint(NodeId),

    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    #[error("edge {0} does not exist")]
    UnknownEdge(EdgeId),

    #[error("there is no path from node {from} to node {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("eigen-decomposition did not converge within {sweeps} sweeps")]
    NumericFailure { sweeps: usize },
}

pub type GraphResult<T> = Result<T, GraphError>;
