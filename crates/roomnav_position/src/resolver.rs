use parking_lot::Mutex;
use roomnav_routing::GeoPoint;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    cache::{GeocodeCache, NoCache},
    config::DEFAULT_REGION_BIAS,
    error::{GeocodeError, PositionError, SensorError},
    geocoder::Geocoder,
    sensor::{PositionSensor, SensorOptions},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PositionSource {
    Sensor,
    PlaceName {
        query: String,
        display_name: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPosition {
    pub position: GeoPoint,
    pub source: PositionSource,
}

/// Turns the host's positioning capability or a typed place name into a
/// coordinate.
///
/// Failures are returned as-is, retrying is up to the caller. The only state
/// kept is the last position resolved successfully.
pub struct PositionResolver<S, G, C = NoCache> {
    sensor: S,
    geocoder: G,
    cache: C,
    region_bias: String,
    sensor_options: SensorOptions,
    last_position: Mutex<Option<ResolvedPosition>>,
}

impl<S, G> PositionResolver<S, G, NoCache>
where
    S: PositionSensor,
    G: Geocoder,
{
    pub fn new(sensor: S, geocoder: G) -> Self {
        Self::with_cache(sensor, geocoder, NoCache)
    }
}

impl<S, G, C> PositionResolver<S, G, C>
where
    S: PositionSensor,
    G: Geocoder,
    C: GeocodeCache,
{
    pub fn with_cache(sensor: S, geocoder: G, cache: C) -> Self {
        PositionResolver {
            sensor,
            geocoder,
            cache,
            region_bias: DEFAULT_REGION_BIAS.to_string(),
            sensor_options: SensorOptions::default(),
            last_position: Mutex::new(None),
        }
    }

    pub fn with_region_bias(mut self, region_bias: impl Into<String>) -> Self {
        self.region_bias = region_bias.into();
        self
    }

    pub fn with_sensor_options(mut self, sensor_options: SensorOptions) -> Self {
        self.sensor_options = sensor_options;
        self
    }

    pub fn region_bias(&self) -> &str {
        &self.region_bias
    }

    pub fn sensor_options(&self) -> &SensorOptions {
        &self.sensor_options
    }

    pub fn last_position(&self) -> Option<ResolvedPosition> {
        self.last_position.lock().clone()
    }

    pub async fn resolve_from_sensor(&self) -> Result<ResolvedPosition, PositionError> {
        let options = self.sensor_options;

        let position = tokio::time::timeout(options.timeout, self.sensor.current_position(&options))
            .await
            .map_err(|_| SensorError::Timeout)??;

        debug!("Sensor fix at ({}, {})", position.lat(), position.lng());

        Ok(self.remember(ResolvedPosition {
            position,
            source: PositionSource::Sensor,
        }))
    }

    pub async fn resolve_from_place_name(&self, query: &str) -> Result<ResolvedPosition, PositionError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(GeocodeError::NotFound(query.to_string()).into());
        }

        let found = match self.cache.get(trimmed, &self.region_bias) {
            Some(found) => {
                debug!("Geocoding cache hit for {:?}", trimmed);
                found
            }
            None => {
                let found = self
                    .geocoder
                    .geocode(trimmed, &self.region_bias)
                    .await?
                    .ok_or_else(|| GeocodeError::NotFound(trimmed.to_string()))?;
                self.cache.put(trimmed, &self.region_bias, &found);
                found
            }
        };

        info!(
            "Resolved {:?} to ({}, {})",
            trimmed,
            found.position.lat(),
            found.position.lng()
        );

        Ok(self.remember(ResolvedPosition {
            position: found.position,
            source: PositionSource::PlaceName {
                query: trimmed.to_string(),
                display_name: found.display_name,
            },
        }))
    }

    fn remember(&self, resolved: ResolvedPosition) -> ResolvedPosition {
        *self.last_position.lock() = Some(resolved.clone());
        resolved
    }
}
