#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use roomnav_position::{GeocodeError, GeocodeMatch, Geocoder, PositionSensor, SensorError, SensorOptions};
use roomnav_routing::{GeoPoint, ListingRecord};
use tokio::sync::oneshot;

pub fn point(lat: f64, lng: f64) -> GeoPoint {
    GeoPoint::new(lat, lng).unwrap()
}

pub fn record(id: &str, lat: f64, lng: f64) -> ListingRecord {
    ListingRecord {
        id: id.to_string(),
        latitude: Some(lat),
        longitude: Some(lng),
        name: Some(format!("PG {id}")),
        city: None,
        area: None,
    }
}

pub fn delhi() -> GeoPoint {
    point(28.6139, 77.209)
}

pub fn delhi_records() -> Vec<ListingRecord> {
    vec![
        record("connaught-place", 28.6315, 77.2167),
        record("saket", 28.5245, 77.2066),
        record("noida-18", 28.5708, 77.3261),
    ]
}

/// Geocoder knowing a single place, "Delhi".
#[derive(Default)]
pub struct DelhiGeocoder {
    pub calls: AtomicUsize,
}

impl DelhiGeocoder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Geocoder for DelhiGeocoder {
    async fn geocode(&self, query: &str, _region_bias: &str) -> Result<Option<GeocodeMatch>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        Ok(query.eq_ignore_ascii_case("delhi").then(|| GeocodeMatch {
            position: delhi(),
            display_name: Some("Delhi, India".to_string()),
        }))
    }
}

pub struct DeniedSensor;

impl PositionSensor for DeniedSensor {
    async fn current_position(&self, _options: &SensorOptions) -> Result<GeoPoint, SensorError> {
        Err(SensorError::PermissionDenied)
    }
}

/// Sensor whose single fix is released by the test through the returned
/// sender.
pub struct GatedSensor {
    fix: Mutex<Option<oneshot::Receiver<GeoPoint>>>,
}

impl GatedSensor {
    pub fn new() -> (Self, oneshot::Sender<GeoPoint>) {
        let (tx, rx) = oneshot::channel();
        (
            GatedSensor {
                fix: Mutex::new(Some(rx)),
            },
            tx,
        )
    }
}

impl PositionSensor for GatedSensor {
    async fn current_position(&self, _options: &SensorOptions) -> Result<GeoPoint, SensorError> {
        let rx = self
            .fix
            .lock()
            .take()
            .ok_or_else(|| SensorError::Other("fix already taken".to_string()))?;

        rx.await
            .map_err(|_| SensorError::Other("sensor dropped".to_string()))
    }
}
