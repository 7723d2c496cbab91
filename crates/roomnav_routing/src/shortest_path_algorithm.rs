use serde::Serialize;

use crate::{
    error::RoutingError,
    graph::{Graph, NodeIdx},
    kilometers::Kilometers,
};

/// Single-source shortest distances and predecessor links. Computed once per
/// graph and source, never updated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortestPathResult {
    source: NodeIdx,
    distances: Vec<Kilometers>,
    previous: Vec<Option<NodeIdx>>,
}

impl ShortestPathResult {
    pub(crate) fn new(
        source: NodeIdx,
        distances: Vec<Kilometers>,
        previous: Vec<Option<NodeIdx>>,
    ) -> Self {
        ShortestPathResult {
            source,
            distances,
            previous,
        }
    }

    pub fn source(&self) -> NodeIdx {
        self.source
    }

    /// Distance from the source, `Kilometers::INFINITY` when unreachable or unknown.
    pub fn distance(&self, node: NodeIdx) -> Kilometers {
        self.distances
            .get(node.get())
            .copied()
            .unwrap_or(Kilometers::INFINITY)
    }

    pub fn previous(&self, node: NodeIdx) -> Option<NodeIdx> {
        self.previous.get(node.get()).copied().flatten()
    }

    pub fn is_reachable(&self, node: NodeIdx) -> bool {
        self.distance(node).is_finite()
    }

    pub fn distances(&self) -> &[Kilometers] {
        &self.distances
    }

    pub fn previous_links(&self) -> &[Option<NodeIdx>] {
        &self.previous
    }

    /// Nodes from the source to `target`, both included. Empty when `target`
    /// is unreachable or not part of the graph.
    pub fn path_to(&self, target: NodeIdx) -> Vec<NodeIdx> {
        if !self.is_reachable(target) {
            return Vec::new();
        }

        let mut path = Vec::with_capacity(8);
        let mut node = Some(target);

        while let Some(current) = node {
            path.push(current);
            // Predecessor links form a tree rooted at the source.
            if path.len() > self.distances.len() {
                return Vec::new();
            }
            node = self.previous(current);
        }

        path.reverse();
        path
    }
}

pub trait ShortestPathAlgorithm {
    fn calc_shortest_paths(
        &self,
        graph: &impl Graph,
        source: NodeIdx,
    ) -> Result<ShortestPathResult, RoutingError>;
}
