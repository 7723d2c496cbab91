use crate::{geopoint::GeoPoint, listing::Listing};

pub fn origin(lat: f64, lng: f64) -> GeoPoint {
    GeoPoint::new(lat, lng).unwrap()
}

pub fn listing(id: &str, lat: f64, lng: f64) -> Listing {
    Listing::new(id, origin(lat, lng), format!("PG {id}"))
}

pub fn delhi_listings() -> Vec<Listing> {
    vec![
        listing("connaught-place", 28.6315, 77.2167).with_city("New Delhi"),
        listing("karol-bagh", 28.6519, 77.1909).with_city("New Delhi"),
        listing("saket", 28.5245, 77.2066).with_city("New Delhi"),
        listing("noida-18", 28.5708, 77.3261).with_city("Noida"),
        listing("gurgaon-29", 28.4682, 77.0628).with_city("Gurugram"),
    ]
}

/// Listings one degree of longitude apart along the equator: `L1` at (0, 1),
/// `L2` at (0, 2), and so on.
pub fn equator_chain(count: usize) -> Vec<Listing> {
    (1..=count)
        .map(|i| listing(&format!("L{i}"), 0.0, i as f64))
        .collect()
}
