use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{constants::EARTH_RADIUS_KM, error::RoutingError, kilometers::Kilometers};

/// A validated latitude/longitude pair in degrees.
///
/// Both components are finite, latitude lies in `[-90, 90]` and longitude in
/// `[-180, 180]`. Out-of-range values are rejected, never clamped.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct RawGeoPoint {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = RoutingError;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        GeoPoint::new(raw.lat, raw.lng)
    }
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Result<Self, RoutingError> {
        let lat_ok = lat.is_finite() && (-90.0..=90.0).contains(&lat);
        let lng_ok = lng.is_finite() && (-180.0..=180.0).contains(&lng);

        if !lat_ok || !lng_ok {
            return Err(RoutingError::InvalidCoordinate { lat, lng });
        }

        Ok(GeoPoint { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Great-circle distance on a sphere of radius 6371 km.
    ///
    /// The endpoints are put in a canonical order first, so `a.haversine_distance(&b)`
    /// and `b.haversine_distance(&a)` evaluate the exact same expression.
    pub fn haversine_distance(&self, other: &GeoPoint) -> Kilometers {
        let ordering = self
            .lat
            .total_cmp(&other.lat)
            .then_with(|| self.lng.total_cmp(&other.lng));

        let (from, to) = match ordering {
            Ordering::Greater => (other, self),
            _ => (self, other),
        };

        Kilometers::new(haversine_distance(from.lat, from.lng, to.lat, to.lng))
    }
}

impl From<&GeoPoint> for [f64; 2] {
    fn from(point: &GeoPoint) -> Self {
        [point.lng, point.lat]
    }
}

pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lon1_rad = lon1.to_radians();
    let lat2_rad = lat2.to_radians();
    let lon2_rad = lon2.to_radians();

    let delta_lat = lat2_rad - lat1_rad;
    let delta_lon = lon2_rad - lon1_rad;

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
