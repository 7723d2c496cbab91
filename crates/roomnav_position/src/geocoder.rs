use std::future::Future;

use roomnav_routing::GeoPoint;
use serde::{Deserialize, Serialize};

use crate::error::GeocodeError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeMatch {
    pub position: GeoPoint,
    pub display_name: Option<String>,
}

/// Place-name lookup. `Ok(None)` when nothing matches the query.
pub trait Geocoder: Send + Sync {
    fn geocode(
        &self,
        query: &str,
        region_bias: &str,
    ) -> impl Future<Output = Result<Option<GeocodeMatch>, GeocodeError>> + Send;
}
