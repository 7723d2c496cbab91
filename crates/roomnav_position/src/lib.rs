pub mod cache;
pub mod config;
pub mod error;
pub mod geocoder;
pub mod nominatim_api;
pub mod resolver;
pub mod sensor;

pub use cache::{FileCache, GeocodeCache, MemoryCache, NoCache};
pub use config::PositionConfig;
pub use error::{GeocodeError, PositionError, SensorError};
pub use geocoder::{GeocodeMatch, Geocoder};
pub use nominatim_api::{NominatimClient, NominatimClientParams};
pub use resolver::{PositionResolver, PositionSource, ResolvedPosition};
pub use sensor::{FixedSensor, NoSensor, PositionSensor, SensorOptions};
