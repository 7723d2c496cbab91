pub mod constants;
pub mod dijkstra;
pub mod error;
pub mod geopoint;
pub mod graph;
pub mod graph_builder;
pub mod kilometers;
pub mod kmh;
pub mod listing;
pub mod listing_index;
pub mod routing_path;
pub mod shortest_path_algorithm;
pub mod stopwatch;
pub mod summary;
mod utils;

#[cfg(test)]
pub(crate) mod test_listing_utils;

pub use dijkstra::Dijkstra;
pub use error::RoutingError;
pub use geopoint::GeoPoint;
pub use graph::{Graph, GraphEdge, NodeIdx, NodeKey, WeightedGraph};
pub use graph_builder::GraphBuilder;
pub use kilometers::Kilometers;
pub use kmh::Kmh;
pub use listing::{Listing, ListingId, ListingRecord, filter_by_city};
pub use listing_index::{ListingIndex, NearbyListing};
pub use routing_path::RoutingPath;
pub use shortest_path_algorithm::{ShortestPathAlgorithm, ShortestPathResult};
pub use stopwatch::Stopwatch;
pub use summary::{Estimate, RouteSummary, SummaryParams};
