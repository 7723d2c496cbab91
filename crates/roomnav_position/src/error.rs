use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SensorError {
    #[error("Positioning is not available on this host")]
    CapabilityUnavailable,

    #[error("Permission to read the current position was denied")]
    PermissionDenied,

    #[error("No position fix within the allowed time")]
    Timeout,

    #[error("Positioning failed: {0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("No location found for \"{0}\"")]
    NotFound(String),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Invalid coordinate in geocoder response: {0}")]
    InvalidResponse(String),
}

impl GeocodeError {
    /// Everything but an empty lookup means the geocoder could not be used.
    pub fn is_network(&self) -> bool {
        !matches!(self, GeocodeError::NotFound(_))
    }
}

#[derive(Debug, Error)]
pub enum PositionError {
    #[error(transparent)]
    Sensor(#[from] SensorError),

    #[error(transparent)]
    Geocode(#[from] GeocodeError),
}

impl PositionError {
    /// Whether entering a place name manually is a sensible next step.
    pub fn suggests_manual_entry(&self) -> bool {
        matches!(self, PositionError::Sensor(_))
    }
}
