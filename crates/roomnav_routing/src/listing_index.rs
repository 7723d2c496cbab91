use rstar::{AABB, RTree, primitives::GeomWithData};
use serde::Serialize;

use crate::{geopoint::GeoPoint, kilometers::Kilometers, listing::Listing};

/// `[lng, lat]` in degrees, tagged with the listing's position in the snapshot.
type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// Small slack so points sitting exactly on the bounding box survive float
/// round-off.
const ENVELOPE_EPSILON_DEGREES: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NearbyListing<'a> {
    pub listing: &'a Listing,
    pub distance: Kilometers,
}

/// Spatial index over a listing snapshot for radius searches.
pub struct ListingIndex<'a> {
    listings: &'a [Listing],
    tree: RTree<IndexedPoint>,
}

impl<'a> ListingIndex<'a> {
    pub fn new(listings: &'a [Listing]) -> Self {
        let tree = RTree::bulk_load(
            listings
                .iter()
                .enumerate()
                .map(|(i, listing)| IndexedPoint::new((&listing.position).into(), i))
                .collect(),
        );

        ListingIndex { listings, tree }
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Listings whose great-circle distance to `center` is at most `radius`,
    /// nearest first (ties broken by id).
    pub fn within_radius(&self, center: &GeoPoint, radius: Kilometers) -> Vec<NearbyListing<'a>> {
        if !(radius.value() >= 0.0) {
            return Vec::new();
        }

        let mut candidates: Vec<usize> = bounding_envelopes(center, radius)
            .iter()
            .flat_map(|envelope| self.tree.locate_in_envelope(envelope))
            .map(|point| point.data)
            .collect();
        candidates.sort_unstable();
        candidates.dedup();

        let listings = self.listings;
        let mut nearby: Vec<NearbyListing<'a>> = candidates
            .into_iter()
            .map(|i| NearbyListing {
                listing: &listings[i],
                distance: center.haversine_distance(&listings[i].position),
            })
            .filter(|nearby| nearby.distance <= radius)
            .collect();

        nearby.sort_by(|a, b| {
            a.distance
                .cmp(&b.distance)
                .then_with(|| a.listing.id.cmp(&b.listing.id))
        });

        nearby
    }
}

/// Degree-space boxes covering every point within `radius` of `center`.
/// Longitude ranges crossing the antimeridian are split in two.
fn bounding_envelopes(center: &GeoPoint, radius: Kilometers) -> Vec<AABB<[f64; 2]>> {
    let angular = radius.value() / crate::constants::EARTH_RADIUS_KM;
    let lat = center.lat().to_radians();

    let min_lat = lat - angular;
    let max_lat = lat + angular;

    let half_pi = std::f64::consts::FRAC_PI_2;
    if min_lat <= -half_pi || max_lat >= half_pi || angular >= std::f64::consts::PI {
        // The cap contains a pole, every longitude is covered
        return vec![AABB::from_corners(
            [-180.0, min_lat.max(-half_pi).to_degrees() - ENVELOPE_EPSILON_DEGREES],
            [180.0, max_lat.min(half_pi).to_degrees() + ENVELOPE_EPSILON_DEGREES],
        )];
    }

    let delta_lng = (angular.sin() / lat.cos()).min(1.0).asin().to_degrees() + ENVELOPE_EPSILON_DEGREES;
    let min_lat = min_lat.to_degrees() - ENVELOPE_EPSILON_DEGREES;
    let max_lat = max_lat.to_degrees() + ENVELOPE_EPSILON_DEGREES;
    let min_lng = center.lng() - delta_lng;
    let max_lng = center.lng() + delta_lng;

    let mut envelopes = vec![AABB::from_corners(
        [min_lng.max(-180.0), min_lat],
        [max_lng.min(180.0), max_lat],
    )];

    if min_lng < -180.0 {
        envelopes.push(AABB::from_corners([min_lng + 360.0, min_lat], [180.0, max_lat]));
    }
    if max_lng > 180.0 {
        envelopes.push(AABB::from_corners([-180.0, min_lat], [max_lng - 360.0, max_lat]));
    }

    envelopes
}
