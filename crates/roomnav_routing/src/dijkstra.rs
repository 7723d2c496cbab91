use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::error::RoutingError;
use crate::graph::{Graph, NodeIdx};
use crate::kilometers::Kilometers;
use crate::shortest_path_algorithm::{ShortestPathAlgorithm, ShortestPathResult};

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
struct HeapItem {
    node: NodeIdx,
    distance: Kilometers,
}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &HeapItem) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // Flip both keys to make this a min-heap, lowest node index first on ties
        other
            .distance
            .cmp(&self.distance)
            .then_with(|| other.node.cmp(&self.node))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    Visited,
}

/// Dijkstra over a non-negative weighted graph. Holds no state between calls,
/// every call starts from scratch.
#[derive(Debug, Default, Clone, Copy)]
pub struct Dijkstra;

impl Dijkstra {
    pub fn new() -> Self {
        Dijkstra
    }
}

impl ShortestPathAlgorithm for Dijkstra {
    fn calc_shortest_paths(
        &self,
        graph: &impl Graph,
        source: NodeIdx,
    ) -> Result<ShortestPathResult, RoutingError> {
        let node_count = graph.node_count();
        if source.get() >= node_count {
            return Err(RoutingError::InvalidSource(source));
        }

        let mut distances = vec![Kilometers::INFINITY; node_count];
        let mut previous: Vec<Option<NodeIdx>> = vec![None; node_count];
        let mut state = vec![VisitState::Unvisited; node_count];
        let mut heap = BinaryHeap::with_capacity(node_count);

        distances[source] = Kilometers::ZERO;
        heap.push(HeapItem {
            node: source,
            distance: Kilometers::ZERO,
        });

        let mut settled = 0;
        let mut relaxed = 0;

        // Nodes never pushed onto the heap are unreachable and keep an infinite
        // distance without being visited.
        while let Some(HeapItem { node, distance }) = heap.pop() {
            if state[node] == VisitState::Visited {
                continue;
            }

            // Stale entry, a shorter distance was pushed later
            if distance > distances[node] {
                continue;
            }

            state[node] = VisitState::Visited;
            settled += 1;

            for edge in graph.node_edges(node) {
                let adj_node = edge.adj_node();

                if state[adj_node] == VisitState::Visited {
                    continue;
                }

                let alternative = distance + edge.weight();

                if alternative < distances[adj_node] {
                    distances[adj_node] = alternative;
                    previous[adj_node] = Some(node);
                    relaxed += 1;
                    heap.push(HeapItem {
                        node: adj_node,
                        distance: alternative,
                    });
                }
            }
        }

        debug!(nodes = node_count, settled, relaxed, "Dijkstra finished");

        Ok(ShortestPathResult::new(source, distances, previous))
    }
}
