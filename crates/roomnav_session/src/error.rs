use roomnav_routing::RoutingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No current position yet")]
    NoPosition,

    #[error("No listings snapshot yet")]
    NoListings,

    #[error("No distances computed yet")]
    NotComputed,

    #[error("Session is closed")]
    Closed,

    #[error(transparent)]
    Routing(#[from] RoutingError),
}
