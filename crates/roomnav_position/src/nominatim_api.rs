use roomnav_routing::GeoPoint;
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::GeocodeError,
    geocoder::{GeocodeMatch, Geocoder},
};

pub const NOMINATIM_API_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = concat!("roomnav/", env!("CARGO_PKG_VERSION"));

/// One entry of a Nominatim `/search?format=json` answer. Coordinates come back
/// as strings.
#[derive(Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NominatimClientParams {
    pub base_url: String,
    pub user_agent: String,
}

impl Default for NominatimClientParams {
    fn default() -> Self {
        NominatimClientParams {
            base_url: NOMINATIM_API_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

pub struct NominatimClient {
    params: NominatimClientParams,
    client: reqwest::Client,
}

impl NominatimClient {
    pub fn new(params: NominatimClientParams) -> Self {
        Self {
            params,
            client: reqwest::Client::new(),
        }
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.params.base_url.trim_end_matches('/'))
    }

    async fn search(&self, query: &str, region_bias: &str) -> Result<Option<GeocodeMatch>, GeocodeError> {
        let q = qualified_query(query, region_bias);
        debug!("Nominatim: searching for {:?}", q);

        let response = self
            .client
            .get(self.search_url())
            .header(reqwest::header::USER_AGENT, &self.params.user_agent)
            .query(&[("format", "json"), ("q", q.as_str()), ("limit", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api { status, message });
        }

        let body = response.text().await?;
        parse_search_response(&body)
    }
}

impl Geocoder for NominatimClient {
    async fn geocode(&self, query: &str, region_bias: &str) -> Result<Option<GeocodeMatch>, GeocodeError> {
        self.search(query, region_bias).await
    }
}

/// `"<query>, <region>"`, or the bare query when no region bias is set.
pub fn qualified_query(query: &str, region_bias: &str) -> String {
    let query = query.trim();
    let region_bias = region_bias.trim();

    if region_bias.is_empty() {
        query.to_string()
    } else {
        format!("{query}, {region_bias}")
    }
}

/// Takes the first result of a search answer, if any.
pub fn parse_search_response(body: &str) -> Result<Option<GeocodeMatch>, GeocodeError> {
    let results: Vec<SearchResult> = serde_json::from_str(body)?;

    let Some(first) = results.into_iter().next() else {
        return Ok(None);
    };

    let lat = parse_degrees(&first.lat)?;
    let lng = parse_degrees(&first.lon)?;
    let position = GeoPoint::new(lat, lng).map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

    Ok(Some(GeocodeMatch {
        position,
        display_name: first.display_name,
    }))
}

fn parse_degrees(value: &str) -> Result<f64, GeocodeError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| GeocodeError::InvalidResponse(value.to_string()))
}
