//! Graph store: the single source of truth for nodes and edges.
//!
//! Wraps a `petgraph::StableDiGraph` so node and edge indices survive
//! removals, plus two lookup tables:
//!
//! - `node_index`: user [`NodeId`] → petgraph `NodeIndex`
//! - `edge_index`: store-assigned [`EdgeId`] → petgraph `EdgeIndex`
//!
//! Every mutation validates its input first and only then touches the
//! graph, so a rejected call leaves the store exactly as it was.

use petgraph::graph::UnGraph;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

use super::error::{GraphError, GraphResult};
use super::models::{Edge, EdgeId, Node, NodeId, Position, DEFAULT_EDGE_WEIGHT};

/// Mutable node/edge collection keyed by unique identifiers.
#[derive(Debug, Clone)]
pub struct GraphStore {
    graph: StableDiGraph<Node, Edge>,
    node_index: HashMap<NodeId, NodeIndex>,
    edge_index: HashMap<EdgeId, EdgeIndex>,
    /// Next candidate for auto-assigned node ids
    next_node_id: u64,
    /// Next edge id; only ever increases until `clear`
    next_edge_id: u64,
}

impl GraphStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::new(),
            node_index: HashMap::new(),
            edge_index: HashMap::new(),
            next_node_id: 0,
            next_edge_id: 0,
        }
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    /// Add a node. Fails with `DuplicateId` if the id is already taken.
    pub fn add_node(
        &mut self,
        id: NodeId,
        label: impl Into<String>,
        position: Position,
    ) -> GraphResult<&Node> {
        if self.node_index.contains_key(&id) {
            return Err(GraphError::DuplicateId(id));
        }
        let node = Node {
            id: id.clone(),
            label: label.into(),
            position,
            color: None,
        };
        let idx = self.graph.add_node(node);
        self.node_index.insert(id, idx);
        Ok(&self.graph[idx])
    }

    /// Reserve the next free numeric node id.
    ///
    /// Ids the user already claimed (e.g. a node added as `"3"`) are skipped.
    pub fn next_node_id(&mut self) -> NodeId {
        loop {
            let candidate = NodeId::from(self.next_node_id);
            self.next_node_id += 1;
            if !self.node_index.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// Remove a node together with every edge incident to it.
    ///
    /// Returns the removed node and the cascaded edges (ascending by id).
    pub fn remove_node(&mut self, id: &NodeId) -> GraphResult<(Node, Vec<Edge>)> {
        let idx = self
            .index_of(id)
            .ok_or_else(|| GraphError::UnknownNode(id.clone()))?;

        // Self-loops show up in both directions
        let mut incident: Vec<EdgeIndex> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.graph.edges_directed(idx, Direction::Incoming))
            .map(|e| e.id())
            .collect();
        incident.sort();
        incident.dedup();

        let mut removed = Vec::with_capacity(incident.len());
        for edge_idx in incident {
            if let Some(edge) = self.graph.remove_edge(edge_idx) {
                self.edge_index.remove(&edge.id);
                removed.push(edge);
            }
        }
        removed.sort_by_key(|e| e.id);

        let node = self
            .graph
            .remove_node(idx)
            .ok_or_else(|| GraphError::UnknownNode(id.clone()))?;
        self.node_index.remove(id);
        Ok((node, removed))
    }

    /// Add an edge between two existing nodes.
    ///
    /// `weight` defaults to 1 and must be positive and finite.
    pub fn add_edge(
        &mut self,
        from: &NodeId,
        to: &NodeId,
        weight: Option<f64>,
    ) -> GraphResult<&Edge> {
        let weight = match weight {
            None => DEFAULT_EDGE_WEIGHT,
            Some(w) if w.is_finite() && w > 0.0 => w,
            Some(w) => {
                return Err(GraphError::InvalidInput(format!(
                    "edge weight must be a positive number, got {}",
                    w
                )))
            }
        };
        let from_idx = self
            .index_of(from)
            .ok_or_else(|| GraphError::UnknownEndpoint(from.clone()))?;
        let to_idx = self
            .index_of(to)
            .ok_or_else(|| GraphError::UnknownEndpoint(to.clone()))?;

        let id = EdgeId(self.next_edge_id);
        self.next_edge_id += 1;
        let edge_idx = self.graph.add_edge(
            from_idx,
            to_idx,
            Edge {
                id,
                from: from.clone(),
                to: to.clone(),
                weight,
            },
        );
        self.edge_index.insert(id, edge_idx);
        Ok(&self.graph[edge_idx])
    }

    /// Remove a single edge by id.
    pub fn remove_edge(&mut self, id: EdgeId) -> GraphResult<Edge> {
        let edge_idx = self
            .edge_index
            .get(&id)
            .copied()
            .ok_or(GraphError::UnknownEdge(id))?;
        let edge = self
            .graph
            .remove_edge(edge_idx)
            .ok_or(GraphError::UnknownEdge(id))?;
        self.edge_index.remove(&id);
        Ok(edge)
    }

    /// Set (or reset with `None`) the fill color of a node. Colors are `#rrggbb`.
    pub fn set_node_color(&mut self, id: &NodeId, color: Option<String>) -> GraphResult<&Node> {
        if let Some(c) = &color {
            if !is_hex_color(c) {
                return Err(GraphError::InvalidInput(format!(
                    "color must look like #rrggbb, got {}",
                    c
                )));
            }
        }
        let idx = self
            .index_of(id)
            .ok_or_else(|| GraphError::UnknownNode(id.clone()))?;
        self.graph[idx].color = color;
        Ok(&self.graph[idx])
    }

    /// Remove everything and start a new session (id counters restart at 0).
    pub fn clear(&mut self) {
        self.graph.clear();
        self.node_index.clear();
        self.edge_index.clear();
        self.next_node_id = 0;
        self.next_edge_id = 0;
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        let idx = self.node_index.get(id)?;
        self.graph.node_weight(*idx)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        let idx = self.edge_index.get(&id)?;
        self.graph.edge_weight(*idx)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node_index.contains_key(id)
    }

    /// Nodes in store order (stable across queries, not necessarily insertion order
    /// once nodes have been removed).
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.graph
            .node_indices()
            .filter_map(move |idx| self.graph.node_weight(idx))
    }

    /// Edges in store order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.graph
            .edge_indices()
            .filter_map(move |idx| self.graph.edge_weight(idx))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Dense, undirected copy of the graph.
    ///
    /// Node `i` of the snapshot is the `i`-th node of [`nodes`](Self::nodes);
    /// every store edge appears exactly once, weighted with its [`EdgeId`].
    pub fn undirected_snapshot(&self) -> UnGraph<NodeId, EdgeId> {
        let mut snapshot = UnGraph::with_capacity(self.node_count(), self.edge_count());
        let mut dense: HashMap<NodeIndex, NodeIndex> = HashMap::with_capacity(self.node_count());
        for idx in self.graph.node_indices() {
            dense.insert(idx, snapshot.add_node(self.graph[idx].id.clone()));
        }
        for edge_idx in self.graph.edge_indices() {
            let Some((source, target)) = self.graph.edge_endpoints(edge_idx) else {
                continue;
            };
            if let (Some(&a), Some(&b)) = (dense.get(&source), dense.get(&target)) {
                snapshot.add_edge(a, b, self.graph[edge_idx].id);
            }
        }
        snapshot
    }

    // ------------------------------------------------------------------------
    // Crate-internal access for the algorithms
    // ------------------------------------------------------------------------

    pub(crate) fn graph(&self) -> &StableDiGraph<Node, Edge> {
        &self.graph
    }

    pub(crate) fn index_of(&self, id: &NodeId) -> Option<NodeIndex> {
        self.node_index.get(id).copied()
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

// ============================================================================
// Tests
// ============================================================================
