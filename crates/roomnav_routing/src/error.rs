use thiserror::Error;

use crate::{graph::NodeIdx, listing::ListingId};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoutingError {
    #[error("Invalid coordinate: latitude {lat}, longitude {lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },
    #[error("Listing {0} has no coordinates")]
    MissingCoordinate(ListingId),
    #[error("Duplicate listing id {0}")]
    DuplicateListing(ListingId),
    #[error("Source node {0} is not part of the graph")]
    InvalidSource(NodeIdx),
}
