use serde::Serialize;

use crate::{
    geopoint::GeoPoint,
    graph::{NodeKey, WeightedGraph},
    kilometers::Kilometers,
    shortest_path_algorithm::ShortestPathResult,
};

/// Ordered walk from the current position to one target, with the positions of
/// every node on the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutingPath {
    nodes: Vec<NodeKey>,
    points: Vec<GeoPoint>,
    distance: Kilometers,
}

impl RoutingPath {
    /// Path used when the target is unreachable or unknown.
    pub fn empty() -> RoutingPath {
        RoutingPath {
            nodes: Vec::new(),
            points: Vec::new(),
            distance: Kilometers::INFINITY,
        }
    }

    pub fn resolve(
        graph: &WeightedGraph,
        result: &ShortestPathResult,
        target: &NodeKey,
    ) -> RoutingPath {
        let Some(target) = graph.node_index(target) else {
            return RoutingPath::empty();
        };

        let path = result.path_to(target);
        if path.is_empty() {
            return RoutingPath::empty();
        }

        RoutingPath {
            nodes: path.iter().map(|&node| graph.node_key(node).clone()).collect(),
            points: path.iter().map(|&node| graph.node_position(node)).collect(),
            distance: result.distance(target),
        }
    }

    pub fn nodes(&self) -> &[NodeKey] {
        &self.nodes
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn distance(&self) -> Kilometers {
        self.distance
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
