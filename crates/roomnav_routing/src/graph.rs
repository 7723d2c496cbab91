use std::fmt;

use fxhash::FxHashMap;
use serde::Serialize;

use crate::{define_index_newtype, geopoint::GeoPoint, kilometers::Kilometers, listing::ListingId};

define_index_newtype!(NodeIdx);

/// Identity of a graph vertex: the caller's current position or one listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum NodeKey {
    CurrentPosition,
    Listing(ListingId),
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::CurrentPosition => write!(f, "current position"),
            NodeKey::Listing(id) => write!(f, "listing {id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphEdge {
    adj_node: NodeIdx,
    weight: Kilometers,
}

impl GraphEdge {
    pub fn adj_node(&self) -> NodeIdx {
        self.adj_node
    }

    pub fn weight(&self) -> Kilometers {
        self.weight
    }
}

pub trait Graph {
    fn node_count(&self) -> usize;

    fn node_edges(&self, node: NodeIdx) -> &[GraphEdge];
}

/// Undirected weighted graph. Every edge is stored once per direction with the
/// same weight, and there are no self-loops.
#[derive(Debug, Clone, Default)]
pub struct WeightedGraph {
    keys: Vec<NodeKey>,
    positions: Vec<GeoPoint>,
    adjacency_list: Vec<Vec<GraphEdge>>,
    lookup: FxHashMap<NodeKey, NodeIdx>,
}

impl WeightedGraph {
    pub fn with_capacity(nodes: usize) -> Self {
        WeightedGraph {
            keys: Vec::with_capacity(nodes),
            positions: Vec::with_capacity(nodes),
            adjacency_list: Vec::with_capacity(nodes),
            lookup: FxHashMap::default(),
        }
    }

    /// Adds a node, or returns `None` if a node with the same key exists.
    pub fn add_node(&mut self, key: NodeKey, position: GeoPoint) -> Option<NodeIdx> {
        if self.lookup.contains_key(&key) {
            return None;
        }

        let node = NodeIdx::new(self.keys.len());
        self.lookup.insert(key.clone(), node);
        self.keys.push(key);
        self.positions.push(position);
        self.adjacency_list.push(Vec::new());

        Some(node)
    }

    /// Connects `a` and `b` in both directions. Self-loops are ignored.
    pub fn add_edge(&mut self, a: NodeIdx, b: NodeIdx, weight: Kilometers) {
        if a == b {
            return;
        }

        self.adjacency_list[a].push(GraphEdge { adj_node: b, weight });
        self.adjacency_list[b].push(GraphEdge { adj_node: a, weight });
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency_list.iter().map(Vec::len).sum::<usize>() / 2
    }

    pub fn node_key(&self, node: NodeIdx) -> &NodeKey {
        &self.keys[node]
    }

    pub fn node_position(&self, node: NodeIdx) -> GeoPoint {
        self.positions[node]
    }

    pub fn node_index(&self, key: &NodeKey) -> Option<NodeIdx> {
        self.lookup.get(key).copied()
    }

    pub fn current_position_node(&self) -> Option<NodeIdx> {
        self.node_index(&NodeKey::CurrentPosition)
    }

    pub fn weight(&self, from: NodeIdx, to: NodeIdx) -> Option<Kilometers> {
        self.adjacency_list
            .get(from.get())?
            .iter()
            .find(|edge| edge.adj_node == to)
            .map(|edge| edge.weight)
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeIdx> + '_ {
        (0..self.keys.len()).map(NodeIdx::new)
    }
}

impl Graph for WeightedGraph {
    fn node_count(&self) -> usize {
        self.keys.len()
    }

    fn node_edges(&self, node: NodeIdx) -> &[GraphEdge] {
        &self.adjacency_list[node]
    }
}
