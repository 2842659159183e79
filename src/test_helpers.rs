//! Test helper factories
//!
//! Builders for stores with well-known shapes. Node ids are decimal
//! strings ("0", "1", ...) unless given explicitly; edges get the default
//! weight and are numbered in insertion order.
#![allow(dead_code)]

use crate::graph::{GraphStore, NodeId, Position};

pub fn id(s: &str) -> NodeId {
    NodeId::from(s)
}

/// Build a store from explicit node ids and directed edge pairs.
pub fn store_from(nodes: &[&str], edges: &[(&str, &str)]) -> GraphStore {
    let mut store = GraphStore::new();
    for n in nodes {
        store.add_node(id(n), *n, Position::default()).unwrap();
    }
    for (a, b) in edges {
        store.add_edge(&id(a), &id(b), None).unwrap();
    }
    store
}

fn numbered_store(n: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> GraphStore {
    let mut store = GraphStore::new();
    for i in 0..n {
        let node = NodeId::from(i as u64);
        let label = node.to_string();
        store.add_node(node, label, Position::default()).unwrap();
    }
    for (a, b) in edges {
        store
            .add_edge(&NodeId::from(a as u64), &NodeId::from(b as u64), None)
            .unwrap();
    }
    store
}

/// Cycle 0 → 1 → … → n-1 → 0.
pub fn cycle_store(n: usize) -> GraphStore {
    numbered_store(n, (0..n).map(|i| (i, (i + 1) % n)))
}

/// Path 0 → 1 → … → n-1.
pub fn path_store(n: usize) -> GraphStore {
    numbered_store(n, (1..n).map(|i| (i - 1, i)))
}

/// Binary tree: node i hangs off (i - 1) / 2.
pub fn tree_store(n: usize) -> GraphStore {
    numbered_store(n, (1..n).map(|i| ((i - 1) / 2, i)))
}

/// Complete graph K_n, one edge per unordered pair.
pub fn complete_store(n: usize) -> GraphStore {
    numbered_store(
        n,
        (0..n).flat_map(move |i| ((i + 1)..n).map(move |j| (i, j))),
    )
}
