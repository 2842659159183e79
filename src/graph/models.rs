//! Graph workbench data models.
//!
//! Defines the complete type system for the engine:
//!
//! ## Input types (store)
//! - [`NodeId`] / [`Node`] / [`Position`]: user-created vertices
//! - [`EdgeId`] / [`Edge`]: user-created connections (weighted, possibly parallel or looping)
//! - [`GraphMode`]: traversal flags owned by the engine
//!
//! ## Output types (analysis)
//! - [`Component`]: a connected component (undirected)
//! - [`DegreeEntry`]: incident edge count for one node
//! - [`AdjacencyMatrix`]: symmetric 0/1 matrix in store node order
//! - [`EigenDecomposition`]: spectrum of the adjacency matrix
//! - [`PathStep`] / [`ShortestPath`]: a resolved shortest route
//! - [`GraphSummary`]: the counters refreshed after every mutation
//! - [`GraphReport`]: aggregated result of a full analysis run
//!
//! ## Configuration
//! - [`SpectrumConfig`]: tuning parameters for the eigen solver

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Weight assigned to edges created without an explicit weight.
pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

// ============================================================================
// Input types: Graph structure (store → algorithms)
// ============================================================================

/// Unique, user-assignable node identifier.
///
/// Numeric identifiers are stored in their decimal form, so `NodeId::from(7u64)`
/// and `NodeId::from("7")` are the same node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// Edge identifier, assigned monotonically by the store and never reused
/// within a session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EdgeId(pub u64);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canvas position. Carried for the rendering collaborator, ignored by every algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A vertex created by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier
    pub id: NodeId,
    /// Display label (defaults to the id)
    pub label: String,
    /// Canvas position
    pub position: Position,
    /// Fill color as `#rrggbb`, `None` for the default style
    pub color: Option<String>,
}

/// A connection between two nodes.
///
/// `from`/`to` give the direction used in directed mode; undirected
/// algorithms treat the pair as unordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    /// Positive, finite weight (default: 1.0)
    pub weight: f64,
}

impl Edge {
    /// Whether `node` is one of the two endpoints.
    pub fn touches(&self, node: &NodeId) -> bool {
        &self.from == node || &self.to == node
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

/// Traversal flags. Owned by a [`GraphEngine`](super::engine::GraphEngine)
/// instance, so independent engines never share modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphMode {
    /// Whether edges are traversed one-way (affects shortest paths and bipartiteness)
    pub directed: bool,
    /// Whether the renderer runs its physics simulation (no algorithmic effect)
    pub physics_enabled: bool,
}

impl Default for GraphMode {
    fn default() -> Self {
        Self {
            directed: false,
            physics_enabled: true,
        }
    }
}

impl fmt::Display for GraphMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = if self.directed { "directed" } else { "undirected" };
        let physics = if self.physics_enabled { "on" } else { "off" };
        write!(f, "{}, physics {}", direction, physics)
    }
}

// ============================================================================
// Output types: Analysis results
// ============================================================================

/// A maximal set of nodes mutually reachable when edge direction is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Component identifier (0 = largest)
    pub id: u32,
    /// Number of nodes in this component
    pub size: usize,
    /// Node IDs belonging to this component, in traversal order
    pub members: Vec<NodeId>,
    /// Whether this is the largest (main) component
    pub is_main: bool,
}

impl Component {
    pub fn contains(&self, node: &NodeId) -> bool {
        self.members.iter().any(|m| m == node)
    }

    /// Members as an ordered set, for order-insensitive comparisons.
    pub fn member_set(&self) -> BTreeSet<NodeId> {
        self.members.iter().cloned().collect()
    }
}

/// Incident edge count for a single node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreeEntry {
    pub node: NodeId,
    pub degree: usize,
}

/// Symmetric 0/1 adjacency matrix.
///
/// Row/column `i` corresponds to `nodes[i]`, which follows the store's node order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjacencyMatrix {
    pub nodes: Vec<NodeId>,
    pub cells: Vec<Vec<u8>>,
}

impl AdjacencyMatrix {
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Matrix as floating-point rows, the shape numeric routines consume.
    pub fn to_f64_rows(&self) -> Vec<Vec<f64>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|&c| f64::from(c)).collect())
            .collect()
    }
}

/// Eigenvalues (ascending) and their unit eigenvectors, one vector per value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EigenDecomposition {
    pub values: Vec<f64>,
    pub vectors: Vec<Vec<f64>>,
}

impl EigenDecomposition {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One hop of a shortest path, in traversal direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStep {
    /// The store edge used for this hop
    pub edge: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    pub weight: f64,
}

/// A resolved shortest route between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortestPath {
    pub source: NodeId,
    pub target: NodeId,
    /// Hops from `source` to `target` (empty when they coincide)
    pub steps: Vec<PathStep>,
    pub total_weight: f64,
}

impl ShortestPath {
    /// Edge ids in traversal order, for highlighting.
    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.steps.iter().map(|s| s.edge).collect()
    }

    /// Visited nodes from source to target, inclusive.
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut nodes = vec![self.source.clone()];
        nodes.extend(self.steps.iter().map(|s| s.to.clone()));
        nodes
    }
}

/// Counters refreshed after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub component_count: usize,
    pub is_bipartite: bool,
    pub directed: bool,
}

/// Complete result of an analysis run over the current graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphReport {
    pub summary: GraphSummary,
    /// Components, largest first
    pub components: Vec<Component>,
    /// Bridge edge ids, ascending
    pub bridges: Vec<EdgeId>,
    /// Degrees in store node order
    pub degrees: Vec<DegreeEntry>,
    pub matrix: AdjacencyMatrix,
    pub spectrum: EigenDecomposition,
    /// When the report was computed
    pub computed_at: DateTime<Utc>,
    /// Computation time in milliseconds
    pub computation_ms: u64,
}

// ============================================================================
// Configuration
// ============================================================================

/// Tuning parameters for the eigen solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrumConfig {
    /// Off-diagonal norm below which the matrix counts as diagonal (default: 1e-10)
    pub tolerance: f64,
    /// Maximum number of full Jacobi sweeps (default: 100)
    pub max_sweeps: usize,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_sweeps: 100,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
