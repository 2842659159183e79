//! Graph analysis algorithms.
//!
//! Implements the structural queries on a [`GraphStore`]:
//! - **Connected components**: iterative stack traversal on the undirected view
//! - **Bipartiteness**: BFS 2-coloring, outgoing-only in directed mode
//! - **Bridges**: iterative DFS low-link over a dense undirected snapshot
//! - **Shortest path**: Dijkstra with an O(V) frontier scan per step
//! - **Degrees / adjacency matrix**: derived read-only views
//!
//! Every function recomputes from scratch; nothing is cached between calls.
//! Components, bridges and the matrix always ignore edge direction.

use petgraph::graph::EdgeIndex;
use petgraph::stable_graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use super::error::{GraphError, GraphResult};
use super::models::{
    AdjacencyMatrix, Component, DegreeEntry, EdgeId, GraphMode, GraphSummary, NodeId, PathStep,
    ShortestPath,
};
use super::store::GraphStore;

// ============================================================================
// Connected Components
// ============================================================================

/// Partition the nodes into connected components, ignoring edge direction.
///
/// Every node lands in exactly one component; isolated nodes form
/// singletons. Components are returned largest first and the first one is
/// flagged as main.
pub fn connected_components(store: &GraphStore) -> Vec<Component> {
    let g = store.graph();

    // Working set of seeds; popping from the back visits nodes in store order
    let mut remaining: Vec<NodeIndex> = g.node_indices().collect();
    remaining.reverse();
    let mut assigned: HashSet<NodeIndex> = HashSet::with_capacity(remaining.len());
    let mut groups: Vec<Vec<NodeIndex>> = Vec::new();

    while let Some(seed) = remaining.pop() {
        if !assigned.insert(seed) {
            continue;
        }
        let mut members = Vec::new();
        let mut stack = vec![seed];
        while let Some(current) = stack.pop() {
            members.push(current);
            for neighbor in g.neighbors_undirected(current) {
                if assigned.insert(neighbor) {
                    stack.push(neighbor);
                }
            }
        }
        groups.push(members);
    }

    // Stable sort keeps discovery order among equally sized components
    groups.sort_by_key(|members| std::cmp::Reverse(members.len()));

    groups
        .into_iter()
        .enumerate()
        .map(|(i, members)| Component {
            id: i as u32,
            size: members.len(),
            members: members.into_iter().map(|idx| g[idx].id.clone()).collect(),
            is_main: i == 0,
        })
        .collect()
}

// ============================================================================
// Bipartiteness
// ============================================================================

/// Check whether every component can be 2-colored.
///
/// Each component is colored by BFS from its first member. With `directed`
/// set, only outgoing edges are followed, so nodes reachable solely
/// against edge direction stay uncolored and cannot conflict.
pub fn is_bipartite(store: &GraphStore, components: &[Component], directed: bool) -> bool {
    let g = store.graph();

    for component in components {
        let Some(start) = component.members.first().and_then(|id| store.index_of(id)) else {
            continue;
        };

        let mut color: HashMap<NodeIndex, u8> = HashMap::with_capacity(component.size);
        color.insert(start, 0);
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            let current_color = color[&current];
            let neighbors = if directed {
                g.neighbors_directed(current, Direction::Outgoing)
            } else {
                g.neighbors_undirected(current)
            };
            for neighbor in neighbors {
                match color.get(&neighbor) {
                    None => {
                        color.insert(neighbor, 1 - current_color);
                        queue.push_back(neighbor);
                    }
                    Some(&c) if c == current_color => return false,
                    Some(_) => {}
                }
            }
        }
    }

    true
}

// ============================================================================
// Bridges: DFS low-link (iterative)
// ============================================================================

const UNVISITED: usize = usize::MAX;

/// One DFS frame: the node, the edge slot used to enter it, and the
/// position of the next adjacency entry to examine.
struct Frame {
    node: usize,
    parent_edge: Option<usize>,
    cursor: usize,
}

/// Find every edge whose removal disconnects its endpoints.
///
/// Works on a dense undirected snapshot of the store. Within a frame only
/// the exact edge used to enter the node is skipped, so a parallel edge to
/// the parent acts as a back edge. Pairs joined by more than one edge are
/// excluded outright; self-loops never qualify.
pub fn find_bridges(store: &GraphStore) -> BTreeSet<EdgeId> {
    let snapshot = store.undirected_snapshot();
    let n = snapshot.node_count();

    // adjacency[u] = [(v, edge slot)]
    let mut adjacency: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
    let mut multiplicity: HashMap<(usize, usize), usize> = HashMap::new();
    for edge in snapshot.edge_references() {
        let (a, b) = (edge.source().index(), edge.target().index());
        if a == b {
            continue;
        }
        let slot = edge.id().index();
        adjacency[a].push((b, slot));
        adjacency[b].push((a, slot));
        *multiplicity.entry(unordered(a, b)).or_default() += 1;
    }

    let mut disc = vec![UNVISITED; n];
    let mut low = vec![UNVISITED; n];
    let mut timer = 0usize;
    let mut bridge_slots: Vec<(usize, usize, usize)> = Vec::new();

    for root in 0..n {
        if disc[root] != UNVISITED {
            continue;
        }
        disc[root] = timer;
        low[root] = timer;
        timer += 1;

        let mut stack = vec![Frame {
            node: root,
            parent_edge: None,
            cursor: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let u = frame.node;
            if let Some(&(v, slot)) = adjacency[u].get(frame.cursor) {
                frame.cursor += 1;
                if frame.parent_edge == Some(slot) {
                    continue;
                }
                if disc[v] == UNVISITED {
                    disc[v] = timer;
                    low[v] = timer;
                    timer += 1;
                    stack.push(Frame {
                        node: v,
                        parent_edge: Some(slot),
                        cursor: 0,
                    });
                } else {
                    // Back edge
                    low[u] = low[u].min(disc[v]);
                }
            } else {
                let finished = stack.pop();
                if let (Some(done), Some(parent)) = (finished, stack.last()) {
                    let p = parent.node;
                    low[p] = low[p].min(low[done.node]);
                    if low[done.node] > disc[p] {
                        if let Some(slot) = done.parent_edge {
                            bridge_slots.push((p, done.node, slot));
                        }
                    }
                }
            }
        }
    }

    bridge_slots
        .into_iter()
        .filter(|&(a, b, _)| multiplicity.get(&unordered(a, b)).copied() == Some(1))
        .map(|(_, _, slot)| snapshot[EdgeIndex::new(slot)])
        .collect()
}

fn unordered(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

// ============================================================================
// Shortest Path: Dijkstra with linear frontier scan
// ============================================================================

/// Lightest edge from one node to a neighbor.
#[derive(Clone, Copy)]
struct Hop {
    weight: f64,
    edge: EdgeId,
}

/// Compute the lightest path from `from` to `to`.
///
/// Fails with `UnknownNode` if either endpoint is missing and with `NoPath`
/// when they sit in different components, or when `directed` is set and no
/// path follows edge direction. Parallel edges contribute their lightest
/// member.
pub fn shortest_path(
    store: &GraphStore,
    from: &NodeId,
    to: &NodeId,
    directed: bool,
) -> GraphResult<ShortestPath> {
    let g = store.graph();
    let source = store
        .index_of(from)
        .ok_or_else(|| GraphError::UnknownNode(from.clone()))?;
    let target = store
        .index_of(to)
        .ok_or_else(|| GraphError::UnknownNode(to.clone()))?;
    let no_path = || GraphError::NoPath {
        from: from.clone(),
        to: to.clone(),
    };

    // Fast reject: different undirected components
    let same_component = connected_components(store)
        .iter()
        .find(|c| c.contains(from))
        .is_some_and(|c| c.contains(to));
    if !same_component {
        return Err(no_path());
    }

    // node → {neighbor → lightest hop}
    let mut adjacency: HashMap<NodeIndex, HashMap<NodeIndex, Hop>> = HashMap::new();
    for edge_idx in g.edge_indices() {
        let Some((a, b)) = g.edge_endpoints(edge_idx) else {
            continue;
        };
        let edge = &g[edge_idx];
        let hop = Hop {
            weight: edge.weight,
            edge: edge.id,
        };
        offer_hop(&mut adjacency, a, b, hop);
        if !directed {
            offer_hop(&mut adjacency, b, a, hop);
        }
    }

    let mut distance: HashMap<NodeIndex, f64> =
        g.node_indices().map(|idx| (idx, f64::INFINITY)).collect();
    distance.insert(source, 0.0);
    let mut previous: HashMap<NodeIndex, (NodeIndex, Hop)> = HashMap::new();
    let mut unvisited: Vec<NodeIndex> = g.node_indices().collect();
    let mut visited: HashSet<NodeIndex> = HashSet::with_capacity(unvisited.len());

    while !unvisited.is_empty() {
        // O(V) scan for the closest unvisited node
        let mut best = 0;
        for (i, idx) in unvisited.iter().enumerate() {
            if distance[idx] < distance[&unvisited[best]] {
                best = i;
            }
        }
        let current = unvisited.swap_remove(best);
        let current_distance = distance[&current];
        if current_distance.is_infinite() {
            break;
        }
        visited.insert(current);
        if current == target {
            break;
        }

        let Some(neighbors) = adjacency.get(&current) else {
            continue;
        };
        for (&neighbor, hop) in neighbors {
            if visited.contains(&neighbor) {
                continue;
            }
            let candidate = current_distance + hop.weight;
            if candidate < distance[&neighbor] {
                distance.insert(neighbor, candidate);
                previous.insert(neighbor, (current, *hop));
            }
        }
    }

    // Walk predecessors back to the source; a broken chain means unreachable
    let mut steps = Vec::new();
    let mut node = target;
    while node != source {
        let Some(&(prev, hop)) = previous.get(&node) else {
            return Err(no_path());
        };
        steps.push(PathStep {
            edge: hop.edge,
            from: g[prev].id.clone(),
            to: g[node].id.clone(),
            weight: hop.weight,
        });
        node = prev;
    }
    steps.reverse();

    Ok(ShortestPath {
        source: from.clone(),
        target: to.clone(),
        total_weight: steps.iter().map(|s| s.weight).sum(),
        steps,
    })
}

fn offer_hop(
    adjacency: &mut HashMap<NodeIndex, HashMap<NodeIndex, Hop>>,
    from: NodeIndex,
    to: NodeIndex,
    hop: Hop,
) {
    let slot = adjacency.entry(from).or_default().entry(to).or_insert(hop);
    if hop.weight < slot.weight || (hop.weight == slot.weight && hop.edge < slot.edge) {
        *slot = hop;
    }
}

// ============================================================================
// Degrees and Adjacency Matrix
// ============================================================================

/// Incident edge count per node. A self-loop counts twice, so the degrees
/// always sum to twice the edge count.
pub fn degree_of(store: &GraphStore) -> HashMap<NodeId, usize> {
    let mut degrees: HashMap<NodeId, usize> =
        store.nodes().map(|n| (n.id.clone(), 0)).collect();
    for edge in store.edges() {
        *degrees.entry(edge.from.clone()).or_default() += 1;
        *degrees.entry(edge.to.clone()).or_default() += 1;
    }
    degrees
}

/// Degrees listed in store node order.
pub fn degree_table(store: &GraphStore) -> Vec<DegreeEntry> {
    let degrees = degree_of(store);
    store
        .nodes()
        .map(|n| DegreeEntry {
            node: n.id.clone(),
            degree: degrees.get(&n.id).copied().unwrap_or(0),
        })
        .collect()
}

/// Symmetric 0/1 adjacency matrix in store node order.
///
/// Built from the undirected view regardless of mode; a self-loop marks
/// the diagonal.
pub fn adjacency_matrix(store: &GraphStore) -> AdjacencyMatrix {
    let snapshot = store.undirected_snapshot();
    let n = snapshot.node_count();
    let mut cells = vec![vec![0u8; n]; n];
    for edge in snapshot.edge_references() {
        let (a, b) = (edge.source().index(), edge.target().index());
        cells[a][b] = 1;
        cells[b][a] = 1;
    }
    AdjacencyMatrix {
        nodes: snapshot
            .node_indices()
            .map(|idx| snapshot[idx].clone())
            .collect(),
        cells,
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Recompute the counters shown after every mutation.
pub fn compute_summary(store: &GraphStore, mode: &GraphMode) -> GraphSummary {
    let components = connected_components(store);
    GraphSummary {
        node_count: store.node_count(),
        edge_count: store.edge_count(),
        component_count: components.len(),
        is_bipartite: is_bipartite(store, &components, mode.directed),
        directed: mode.directed,
    }
}

// ============================================================================
// Tests
// ============================================================================
