use tracing::debug;

use crate::{
    constants::DEFAULT_THRESHOLD_KM,
    error::RoutingError,
    geopoint::GeoPoint,
    graph::{Graph, NodeIdx, NodeKey, WeightedGraph},
    kilometers::Kilometers,
    listing::Listing,
};

/// Builds the proximity graph for one computation: the current position plus
/// every listing, with an edge between each pair closer than the threshold.
///
/// Pairs are compared exhaustively (`O(N²)` distance evaluations), which is fine
/// for the working set of a single session.
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder {
    threshold: Kilometers,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        GraphBuilder::new(Kilometers::new(DEFAULT_THRESHOLD_KM))
    }
}

impl GraphBuilder {
    pub fn new(threshold: Kilometers) -> Self {
        GraphBuilder { threshold }
    }

    pub fn threshold(&self) -> Kilometers {
        self.threshold
    }

    pub fn build(
        &self,
        origin: GeoPoint,
        listings: &[Listing],
    ) -> Result<WeightedGraph, RoutingError> {
        let mut graph = WeightedGraph::with_capacity(listings.len() + 1);

        graph.add_node(NodeKey::CurrentPosition, origin);

        for listing in listings {
            graph
                .add_node(NodeKey::Listing(listing.id.clone()), listing.position)
                .ok_or_else(|| RoutingError::DuplicateListing(listing.id.clone()))?;
        }

        if listings.is_empty() {
            debug!("No listings in snapshot, graph only holds the current position");
        }

        let node_count = graph.node_count();
        for i in 0..node_count {
            let from = NodeIdx::new(i);
            let from_position = graph.node_position(from);

            for j in (i + 1)..node_count {
                let to = NodeIdx::new(j);
                let distance = from_position.haversine_distance(&graph.node_position(to));

                if distance < self.threshold {
                    graph.add_edge(from, to, distance);
                }
            }
        }

        debug!(
            nodes = node_count,
            edges = graph.edge_count(),
            threshold_km = self.threshold.value(),
            "Built proximity graph"
        );

        Ok(graph)
    }
}
