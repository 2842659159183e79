//! Graph engine: owns one graph session.
//!
//! `GraphEngine` is the single entry point for interactive consumers (the
//! shell, scripts, tests). It bundles:
//!
//! 1. **State**: the [`GraphStore`] and the current [`GraphMode`]
//! 2. **Analysis**: structural queries from [`algorithms`](super::algorithms)
//! 3. **Spectrum**: an injected [`EigenSolver`], so tests can swap the
//!    numeric collaborator for a mock
//!
//! All queries recompute from the current store. Mutations need `&mut self`,
//! so a query can never observe a half-applied change.

use chrono::Utc;
use std::collections::{BTreeSet, HashMap};
use std::time::Instant;

use super::algorithms;
use super::error::{GraphError, GraphResult};
use super::models::{
    AdjacencyMatrix, Component, DegreeEntry, Edge, EdgeId, EigenDecomposition, GraphMode,
    GraphReport, GraphSummary, Node, NodeId, Position, ShortestPath, SpectrumConfig,
};
use super::spectrum::{EigenSolver, JacobiEigenSolver};
use super::store::GraphStore;

/// One interactive graph session.
pub struct GraphEngine {
    store: GraphStore,
    mode: GraphMode,
    solver: Box<dyn EigenSolver>,
}

impl GraphEngine {
    /// Create an empty engine using the Jacobi solver.
    pub fn new(mode: GraphMode, spectrum: &SpectrumConfig) -> Self {
        Self::with_solver(mode, Box::new(JacobiEigenSolver::new(spectrum)))
    }

    /// Create an empty engine with a custom eigen solver.
    pub fn with_solver(mode: GraphMode, solver: Box<dyn EigenSolver>) -> Self {
        Self {
            store: GraphStore::new(),
            mode,
            solver,
        }
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn mode(&self) -> GraphMode {
        self.mode
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Add a node. Without an id, the next free numeric id is used; without
    /// a label, the id doubles as the label.
    pub fn add_node(
        &mut self,
        id: Option<NodeId>,
        label: Option<String>,
        position: Position,
    ) -> GraphResult<Node> {
        let id = match id {
            Some(id) if id.as_str().trim().is_empty() => {
                return Err(GraphError::InvalidInput("node id must not be empty".into()))
            }
            Some(id) => id,
            None => self.store.next_node_id(),
        };
        let label = label.unwrap_or_else(|| id.to_string());
        let node = self.store.add_node(id, label, position)?.clone();
        tracing::debug!(node = %node.id, "Added node");
        Ok(node)
    }

    /// Remove a node and every edge touching it. Returns the node and the
    /// removed edges.
    pub fn remove_node(&mut self, id: &NodeId) -> GraphResult<(Node, Vec<Edge>)> {
        let (node, edges) = self.store.remove_node(id)?;
        tracing::debug!(node = %node.id, cascaded = edges.len(), "Removed node");
        Ok((node, edges))
    }

    pub fn add_edge(
        &mut self,
        from: &NodeId,
        to: &NodeId,
        weight: Option<f64>,
    ) -> GraphResult<Edge> {
        let edge = self.store.add_edge(from, to, weight)?.clone();
        tracing::debug!(edge = %edge.id, from = %edge.from, to = %edge.to, "Added edge");
        Ok(edge)
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> GraphResult<Edge> {
        let edge = self.store.remove_edge(id)?;
        tracing::debug!(edge = %edge.id, "Removed edge");
        Ok(edge)
    }

    /// Set or reset (`None`) a node's fill color.
    pub fn set_node_color(&mut self, id: &NodeId, color: Option<String>) -> GraphResult<Node> {
        let node = self.store.set_node_color(id, color)?.clone();
        tracing::debug!(node = %node.id, color = ?node.color, "Colored node");
        Ok(node)
    }

    /// Drop every node and edge and restart id numbering. The mode is kept.
    pub fn clear(&mut self) {
        self.store.clear();
        tracing::debug!("Cleared graph");
    }

    pub fn set_directed(&mut self, directed: bool) -> GraphMode {
        self.mode.directed = directed;
        tracing::debug!(mode = %self.mode, "Mode changed");
        self.mode
    }

    pub fn toggle_directed(&mut self) -> GraphMode {
        self.set_directed(!self.mode.directed)
    }

    /// Physics only affects rendering; it is tracked so front ends can
    /// read it back.
    pub fn set_physics(&mut self, enabled: bool) -> GraphMode {
        self.mode.physics_enabled = enabled;
        tracing::debug!(mode = %self.mode, "Mode changed");
        self.mode
    }

    pub fn toggle_physics(&mut self) -> GraphMode {
        self.set_physics(!self.mode.physics_enabled)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn summary(&self) -> GraphSummary {
        algorithms::compute_summary(&self.store, &self.mode)
    }

    pub fn components(&self) -> Vec<Component> {
        algorithms::connected_components(&self.store)
    }

    pub fn bridges(&self) -> BTreeSet<EdgeId> {
        algorithms::find_bridges(&self.store)
    }

    /// Bipartiteness under the current mode.
    pub fn is_bipartite(&self) -> bool {
        let components = self.components();
        algorithms::is_bipartite(&self.store, &components, self.mode.directed)
    }

    pub fn degrees(&self) -> HashMap<NodeId, usize> {
        algorithms::degree_of(&self.store)
    }

    pub fn degree_table(&self) -> Vec<DegreeEntry> {
        algorithms::degree_table(&self.store)
    }

    pub fn adjacency_matrix(&self) -> AdjacencyMatrix {
        algorithms::adjacency_matrix(&self.store)
    }

    /// Eigenvalues and eigenvectors of the adjacency matrix.
    pub fn spectrum(&self) -> GraphResult<EigenDecomposition> {
        self.solver.decompose(&self.adjacency_matrix().to_f64_rows())
    }

    /// Shortest path; `directed` overrides the engine mode when given.
    pub fn shortest_path(
        &self,
        from: &NodeId,
        to: &NodeId,
        directed: Option<bool>,
    ) -> GraphResult<ShortestPath> {
        let directed = directed.unwrap_or(self.mode.directed);
        algorithms::shortest_path(&self.store, from, to, directed)
    }

    /// Run every analysis on the current graph.
    pub fn report(&self) -> GraphResult<GraphReport> {
        let start = Instant::now();

        let components = self.components();
        let summary = GraphSummary {
            node_count: self.store.node_count(),
            edge_count: self.store.edge_count(),
            component_count: components.len(),
            is_bipartite: algorithms::is_bipartite(&self.store, &components, self.mode.directed),
            directed: self.mode.directed,
        };
        let matrix = self.adjacency_matrix();
        let spectrum = self.solver.decompose(&matrix.to_f64_rows())?;

        let report = GraphReport {
            summary,
            components,
            bridges: self.bridges().into_iter().collect(),
            degrees: self.degree_table(),
            matrix,
            spectrum,
            computed_at: Utc::now(),
            computation_ms: start.elapsed().as_millis() as u64,
        };
        tracing::info!(
            nodes = report.summary.node_count,
            edges = report.summary.edge_count,
            components = report.components.len(),
            bridges = report.bridges.len(),
            ms = report.computation_ms,
            "Graph report computed"
        );
        Ok(report)
    }
}

impl Default for GraphEngine {
    fn default() -> Self {
        Self::new(GraphMode::default(), &SpectrumConfig::default())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::mock::MockEigenSolver;
    use crate::test_helpers::id;

    fn engine_with(nodes: &[&str], edges: &[(&str, &str)]) -> GraphEngine {
        let mut engine = GraphEngine::default();
        for n in nodes {
            engine
                .add_node(Some(id(n)), None, Position::default())
                .unwrap();
        }
        for (a, b) in edges {
            engine.add_edge(&id(a), &id(b), None).unwrap();
        }
        engine
    }

    // --- Mutation Tests ---

    #[test]
    fn test_add_node_auto_id_and_label() {
        let mut engine = GraphEngine::default();
        let first = engine.add_node(None, None, Position::default()).unwrap();
        let second = engine
            .add_node(None, Some("hub".into()), Position::new(3.0, -2.0))
            .unwrap();
        assert_eq!(first.id, id("0"));
        assert_eq!(first.label, "0");
        assert_eq!(second.id, id("1"));
        assert_eq!(second.label, "hub");
        assert_eq!(second.position, Position::new(3.0, -2.0));
    }

    #[test]
    fn test_add_node_auto_id_skips_claimed() {
        let mut engine = engine_with(&["0", "1"], &[]);
        let node = engine.add_node(None, None, Position::default()).unwrap();
        assert_eq!(node.id, id("2"));
    }

    #[test]
    fn test_add_node_rejects_blank_id() {
        let mut engine = GraphEngine::default();
        assert!(matches!(
            engine.add_node(Some(id(" ")), None, Position::default()),
            Err(GraphError::InvalidInput(_))
        ));
        assert_eq!(engine.store().node_count(), 0);
    }

    #[test]
    fn test_remove_node_updates_degrees() {
        let mut engine = engine_with(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
        let (_, removed) = engine.remove_node(&id("b")).unwrap();
        assert_eq!(removed.len(), 2);

        let degrees = engine.degrees();
        assert_eq!(degrees.len(), 2);
        assert_eq!(degrees[&id("a")], 1);
        assert_eq!(degrees[&id("c")], 1);
        assert!(engine
            .store()
            .edges()
            .all(|e| !e.touches(&id("b"))));
    }

    #[test]
    fn test_failed_mutation_leaves_state_untouched() {
        let mut engine = engine_with(&["a"], &[]);
        let before = engine.summary();
        assert!(engine.add_edge(&id("a"), &id("ghost"), None).is_err());
        assert!(engine.remove_edge(EdgeId(0)).is_err());
        assert!(engine.remove_node(&id("ghost")).is_err());
        assert_eq!(engine.summary(), before);
    }

    #[test]
    fn test_clear_keeps_mode() {
        let mut engine = engine_with(&["a", "b"], &[("a", "b")]);
        engine.set_directed(true);
        engine.clear();
        assert!(engine.store().is_empty());
        assert!(engine.mode().directed);
        let node = engine.add_node(None, None, Position::default()).unwrap();
        assert_eq!(node.id, id("0"));
    }

    #[test]
    fn test_mode_toggles() {
        let mut engine = GraphEngine::default();
        assert!(!engine.mode().directed);
        assert!(engine.toggle_directed().directed);
        assert!(!engine.toggle_directed().directed);
        assert!(!engine.toggle_physics().physics_enabled);
        assert!(engine.set_physics(true).physics_enabled);
    }

    // --- Query Tests ---

    #[test]
    fn test_summary_tracks_mode() {
        // a → b ← c, c → a
        let mut engine = engine_with(&["b", "a", "c"], &[("a", "b"), ("c", "b"), ("c", "a")]);
        assert!(!engine.summary().is_bipartite);
        engine.set_directed(true);
        let summary = engine.summary();
        assert!(summary.directed);
        assert!(summary.is_bipartite);
        assert!(engine.is_bipartite());
    }

    #[test]
    fn test_shortest_path_uses_engine_mode_by_default() {
        let mut engine = engine_with(&["a", "b"], &[("b", "a")]);
        assert!(engine.shortest_path(&id("a"), &id("b"), None).is_ok());
        engine.set_directed(true);
        assert!(matches!(
            engine.shortest_path(&id("a"), &id("b"), None),
            Err(GraphError::NoPath { .. })
        ));
        assert!(engine
            .shortest_path(&id("a"), &id("b"), Some(false))
            .is_ok());
    }

    #[test]
    fn test_spectrum_of_triangle() {
        let engine = engine_with(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
        let spectrum = engine.spectrum().unwrap();
        assert!((spectrum.values[0] + 1.0).abs() < 1e-8);
        assert!((spectrum.values[1] + 1.0).abs() < 1e-8);
        assert!((spectrum.values[2] - 2.0).abs() < 1e-8);
    }

    #[test]
    fn test_spectrum_delegates_to_solver() {
        let preset = EigenDecomposition {
            values: vec![42.0],
            vectors: vec![vec![1.0]],
        };
        let mut engine = GraphEngine::with_solver(
            GraphMode::default(),
            Box::new(MockEigenSolver::with_result(preset.clone())),
        );
        engine.add_node(None, None, Position::default()).unwrap();
        assert_eq!(engine.spectrum().unwrap(), preset);
    }

    #[test]
    fn test_report_aggregates_everything() {
        let engine = engine_with(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "c"), ("c", "a"), ("c", "d")],
        );
        let report = engine.report().unwrap();
        assert_eq!(report.summary.node_count, 4);
        assert_eq!(report.summary.component_count, 1);
        assert_eq!(report.components.len(), 1);
        assert_eq!(report.bridges, vec![EdgeId(3)]);
        assert_eq!(report.degrees.len(), 4);
        assert_eq!(report.matrix.size(), 4);
        assert_eq!(report.spectrum.len(), 4);
    }

    #[test]
    fn test_report_propagates_solver_failure() {
        let engine = GraphEngine::with_solver(
            GraphMode::default(),
            Box::new(MockEigenSolver::failing()),
        );
        assert!(matches!(
            engine.report(),
            Err(GraphError::NumericFailure { .. })
        ));
    }
}
