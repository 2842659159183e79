//! Engine property tests
//!
//! Exercise the public `GraphEngine` API on well-known graph families.
//! Run with: cargo test --test engine_tests

use graph_lab::graph::{EdgeId, GraphEngine, GraphError, NodeId, Position};
use std::collections::BTreeSet;

fn id(s: &str) -> NodeId {
    NodeId::from(s)
}

fn engine_with(nodes: &[&str], edges: &[(&str, &str, f64)]) -> GraphEngine {
    let mut engine = GraphEngine::default();
    for n in nodes {
        engine
            .add_node(Some(id(n)), None, Position::default())
            .unwrap();
    }
    for (a, b, w) in edges {
        engine.add_edge(&id(a), &id(b), Some(*w)).unwrap();
    }
    engine
}

fn cycle(n: usize) -> GraphEngine {
    let mut engine = GraphEngine::default();
    for _ in 0..n {
        engine.add_node(None, None, Position::default()).unwrap();
    }
    for i in 0..n {
        engine
            .add_edge(&NodeId::from(i as u64), &NodeId::from(((i + 1) % n) as u64), None)
            .unwrap();
    }
    engine
}

fn complete(n: usize) -> GraphEngine {
    let mut engine = GraphEngine::default();
    for _ in 0..n {
        engine.add_node(None, None, Position::default()).unwrap();
    }
    for i in 0..n {
        for j in (i + 1)..n {
            engine
                .add_edge(&NodeId::from(i as u64), &NodeId::from(j as u64), None)
                .unwrap();
        }
    }
    engine
}

/// Random-looking but deterministic graph: sparse, with loops and parallels.
fn scrambled(n: u64) -> GraphEngine {
    let mut engine = GraphEngine::default();
    for _ in 0..n {
        engine.add_node(None, None, Position::default()).unwrap();
    }
    let mut state = 17u64;
    for _ in 0..(n + n / 2) {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let a = (state >> 33) % n;
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let b = (state >> 33) % n;
        engine
            .add_edge(&NodeId::from(a), &NodeId::from(b), None)
            .unwrap();
    }
    engine
}

// ============================================================================
// Components
// ============================================================================

#[test]
fn test_components_partition_every_node() {
    let engine = scrambled(40);
    let components = engine.components();

    let mut seen = BTreeSet::new();
    for c in &components {
        for m in &c.members {
            assert!(seen.insert(m.clone()), "node {} in two components", m);
        }
    }
    assert_eq!(seen.len(), engine.store().node_count());
    assert_eq!(components.iter().filter(|c| c.is_main).count(), 1);
    assert!(components.windows(2).all(|w| w[0].size >= w[1].size));
}

#[test]
fn test_components_agree_with_petgraph() {
    for n in [5, 12, 30, 64] {
        let engine = scrambled(n);
        let snapshot = engine.store().undirected_snapshot();
        assert_eq!(
            engine.components().len(),
            petgraph::algo::connected_components(&snapshot),
            "n = {}",
            n
        );
    }
}

#[test]
fn test_edgeless_graph_all_singletons() {
    let engine = engine_with(&["a", "b", "c"], &[]);
    let components = engine.components();
    assert_eq!(components.len(), 3);
    assert!(components.iter().all(|c| c.size == 1));
    assert!(engine.bridges().is_empty());
    assert!(engine.is_bipartite());
}

#[test]
fn test_components_stable_across_calls() {
    let engine = scrambled(25);
    let first: BTreeSet<_> = engine.components().iter().map(|c| c.member_set()).collect();
    let second: BTreeSet<_> = engine.components().iter().map(|c| c.member_set()).collect();
    assert_eq!(first, second);
}

// ============================================================================
// Bridges
// ============================================================================

#[test]
fn test_bridge_removal_changes_component_count_by_one() {
    for n in [10, 20, 35] {
        let engine = scrambled(n);
        let base = engine.components().len();
        let bridges = engine.bridges();
        let edge_ids: Vec<EdgeId> = engine.store().edges().map(|e| e.id).collect();

        for edge_id in edge_ids {
            let mut trial = scrambled(n);
            trial.remove_edge(edge_id).unwrap();
            let after = trial.components().len();
            let expected = if bridges.contains(&edge_id) { base + 1 } else { base };
            assert_eq!(after, expected, "n = {}, edge {}", n, edge_id);
        }
    }
}

#[test]
fn test_cycles_have_no_bridges() {
    for n in 3..10 {
        assert!(cycle(n).bridges().is_empty());
    }
}

#[test]
fn test_tree_bridges() {
    let mut engine = GraphEngine::default();
    engine.add_node(None, None, Position::default()).unwrap();
    for i in 1..15u64 {
        engine.add_node(None, None, Position::default()).unwrap();
        engine
            .add_edge(&NodeId::from(i / 3), &NodeId::from(i), None)
            .unwrap();
    }
    assert_eq!(engine.bridges().len(), 14);
}

// ============================================================================
// Bipartiteness
// ============================================================================

#[test]
fn test_cycle_parity_decides_bipartiteness() {
    for n in 3..12 {
        assert_eq!(cycle(n).is_bipartite(), n % 2 == 0, "C{}", n);
    }
}

#[test]
fn test_complete_graphs_not_bipartite() {
    for n in 3..7 {
        assert!(!complete(n).is_bipartite(), "K{}", n);
    }
}

// ============================================================================
// Shortest path
// ============================================================================

#[test]
fn test_weighted_triangle_prefers_two_hops() {
    let engine = engine_with(
        &["A", "B", "C"],
        &[("A", "B", 1.0), ("B", "C", 1.0), ("A", "C", 5.0)],
    );
    let path = engine.shortest_path(&id("A"), &id("C"), None).unwrap();
    assert_eq!(path.edge_ids(), vec![EdgeId(0), EdgeId(1)]);
    assert!((path.total_weight - 2.0).abs() < f64::EPSILON);
}

#[test]
fn test_no_path_across_components() {
    let engine = engine_with(&["a", "b", "c", "d"], &[("a", "b", 1.0), ("c", "d", 1.0)]);
    assert_eq!(
        engine.shortest_path(&id("a"), &id("d"), None).unwrap_err(),
        GraphError::NoPath {
            from: id("a"),
            to: id("d")
        }
    );
}

#[test]
fn test_path_weight_never_exceeds_direct_edge() {
    let engine = engine_with(
        &["s", "a", "b", "t"],
        &[
            ("s", "a", 2.0),
            ("a", "t", 2.0),
            ("s", "b", 1.0),
            ("b", "a", 0.5),
            ("s", "t", 4.5),
        ],
    );
    let path = engine.shortest_path(&id("s"), &id("t"), None).unwrap();
    assert!((path.total_weight - 3.5).abs() < 1e-12);
    assert_eq!(path.nodes(), vec![id("s"), id("b"), id("a"), id("t")]);
    let sum: f64 = path.steps.iter().map(|s| s.weight).sum();
    assert!((sum - path.total_weight).abs() < 1e-12);
}

// ============================================================================
// Degrees, deletion and spectrum
// ============================================================================

#[test]
fn test_handshake_lemma() {
    let engine = scrambled(30);
    let total: usize = engine.degrees().values().sum();
    assert_eq!(total, 2 * engine.store().edge_count());
}

#[test]
fn test_node_deletion_cascades_and_updates_degrees() {
    let mut engine = engine_with(
        &["hub", "a", "b", "c"],
        &[("hub", "a", 1.0), ("b", "hub", 1.0), ("hub", "c", 1.0), ("a", "b", 1.0)],
    );
    assert_eq!(engine.degrees()[&id("hub")], 3);

    let (_, removed) = engine.remove_node(&id("hub")).unwrap();
    assert_eq!(removed.len(), 3);
    assert_eq!(engine.store().edge_count(), 1);
    assert!(engine.store().edges().all(|e| !e.touches(&id("hub"))));

    let degrees = engine.degrees();
    assert!(!degrees.contains_key(&id("hub")));
    assert_eq!(degrees[&id("a")], 1);
    assert_eq!(degrees[&id("c")], 0);
}

#[test]
fn test_complete_graph_spectrum() {
    let spectrum = complete(5).spectrum().unwrap();
    for value in &spectrum.values[..4] {
        assert!((value + 1.0).abs() < 1e-8);
    }
    assert!((spectrum.values[4] - 4.0).abs() < 1e-8);
}

#[test]
fn test_spectrum_eigenpairs_hold() {
    let engine = scrambled(12);
    let matrix = engine.adjacency_matrix().to_f64_rows();
    let spectrum = engine.spectrum().unwrap();
    assert_eq!(spectrum.len(), 12);
    for (lambda, v) in spectrum.values.iter().zip(&spectrum.vectors) {
        for (i, row) in matrix.iter().enumerate() {
            let av: f64 = row.iter().zip(v).map(|(a, x)| a * x).sum();
            assert!((av - lambda * v[i]).abs() < 1e-6);
        }
    }
}
