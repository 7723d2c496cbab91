use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{error::RoutingError, geopoint::GeoPoint};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(String);

impl ListingId {
    pub fn new(id: impl Into<String>) -> Self {
        ListingId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ListingId {
    fn from(id: &str) -> Self {
        ListingId(id.to_string())
    }
}

/// A listing as seen by the routing core. Owned by the listings collaborator,
/// never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub id: ListingId,
    pub position: GeoPoint,
    pub display_name: String,
    pub city: Option<String>,
    pub area: Option<String>,
}

impl Listing {
    pub fn new(id: impl Into<ListingId>, position: GeoPoint, display_name: impl Into<String>) -> Self {
        Listing {
            id: id.into(),
            position,
            display_name: display_name.into(),
            city: None,
            area: None,
        }
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }
}

impl From<String> for ListingId {
    fn from(id: String) -> Self {
        ListingId(id)
    }
}

/// Raw listing as delivered by a listings source. Coordinates may be missing or
/// out of range; conversion into [`Listing`] rejects those.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListingRecord {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
}

impl ListingRecord {
    fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            return name.to_string();
        }

        match (self.area.as_deref(), self.city.as_deref()) {
            (Some(area), Some(city)) => format!("{area}, {city}"),
            (Some(place), None) | (None, Some(place)) => place.to_string(),
            (None, None) => self.id.clone(),
        }
    }
}

impl TryFrom<ListingRecord> for Listing {
    type Error = RoutingError;

    fn try_from(record: ListingRecord) -> Result<Self, Self::Error> {
        let (Some(lat), Some(lng)) = (record.latitude, record.longitude) else {
            return Err(RoutingError::MissingCoordinate(ListingId::new(record.id)));
        };

        let position = GeoPoint::new(lat, lng)?;
        let display_name = record.display_name();

        Ok(Listing {
            id: ListingId::new(record.id),
            position,
            display_name,
            city: record.city,
            area: record.area,
        })
    }
}

/// Case-insensitive substring match on the listing city. A blank query keeps
/// every listing.
pub fn filter_by_city<'a>(listings: &'a [Listing], query: &str) -> Vec<&'a Listing> {
    let query = query.trim().to_lowercase();

    if query.is_empty() {
        return listings.iter().collect();
    }

    listings
        .iter()
        .filter(|listing| {
            listing
                .city
                .as_deref()
                .is_some_and(|city| city.to_lowercase().contains(&query))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_listing_utils::listing;

    fn record(json: &str) -> ListingRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn converts_mongo_style_record() {
        let record = record(
            r#"{"_id": "64f1", "latitude": 30.2689, "longitude": 77.9931, "city": "Dehradun", "area": "Clement Town"}"#,
        );

        let listing = Listing::try_from(record).unwrap();
        assert_eq!(listing.id, ListingId::from("64f1"));
        assert_eq!(listing.display_name, "Clement Town, Dehradun");
        assert_eq!(listing.position.lat(), 30.2689);
    }

    #[test]
    fn prefers_name_for_display() {
        let record = record(r#"{"id": "a", "latitude": 1.0, "longitude": 2.0, "name": "Sunrise PG", "city": "Delhi"}"#);
        assert_eq!(Listing::try_from(record).unwrap().display_name, "Sunrise PG");
    }

    #[test]
    fn rejects_missing_coordinates() {
        let record = record(r#"{"_id": "b", "latitude": 28.6}"#);
        assert_eq!(
            Listing::try_from(record),
            Err(RoutingError::MissingCoordinate(ListingId::from("b")))
        );
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let record = record(r#"{"_id": "c", "latitude": 128.6, "longitude": 77.2}"#);
        assert!(matches!(
            Listing::try_from(record),
            Err(RoutingError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn city_filter_is_case_insensitive_substring() {
        let listings = vec![
            listing("1", 28.63, 77.21).with_city("New Delhi"),
            listing("2", 19.07, 72.87).with_city("Mumbai"),
            listing("3", 28.52, 77.20),
        ];

        let matches = filter_by_city(&listings, "  delhi ");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, ListingId::from("1"));

        assert_eq!(filter_by_city(&listings, "").len(), 3);
        assert!(filter_by_city(&listings, "Pune").is_empty());
    }
}
