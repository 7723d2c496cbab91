pub mod config;
pub mod error;
pub mod listings_source;
pub mod session;

pub use config::SessionConfig;
pub use error::SessionError;
pub use listings_source::{HttpListings, JsonFileListings, ListingsSource, StaticListings};
pub use session::{Computation, ComputeInput, DistanceSession, Input, Ticket, Update};
