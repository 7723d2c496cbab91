use std::{future::Future, time::Duration};

use roomnav_routing::GeoPoint;

use crate::error::SensorError;

pub const DEFAULT_SENSOR_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
}

impl Default for SensorOptions {
    fn default() -> Self {
        SensorOptions {
            high_accuracy: true,
            timeout: DEFAULT_SENSOR_TIMEOUT,
        }
    }
}

/// Host positioning capability.
///
/// Implementations may ignore `options.timeout`, the resolver bounds the wait
/// on its own.
pub trait PositionSensor: Send + Sync {
    fn current_position(
        &self,
        options: &SensorOptions,
    ) -> impl Future<Output = Result<GeoPoint, SensorError>> + Send;
}

/// Sensor answering with a position supplied by the host, e.g. from command
/// line flags.
#[derive(Debug, Clone, Copy)]
pub struct FixedSensor {
    position: GeoPoint,
}

impl FixedSensor {
    pub fn new(position: GeoPoint) -> Self {
        FixedSensor { position }
    }
}

impl PositionSensor for FixedSensor {
    async fn current_position(&self, _options: &SensorOptions) -> Result<GeoPoint, SensorError> {
        Ok(self.position)
    }
}

/// Host without any positioning capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSensor;

impl PositionSensor for NoSensor {
    async fn current_position(&self, _options: &SensorOptions) -> Result<GeoPoint, SensorError> {
        Err(SensorError::CapabilityUnavailable)
    }
}
