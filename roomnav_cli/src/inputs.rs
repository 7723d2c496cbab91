use std::{sync::Arc, time::Duration};

use anyhow::Context;
use clap::Args;
use roomnav_position::{
    FileCache, FixedSensor, GeocodeCache, Geocoder, NoSensor, NominatimClient, PositionConfig,
    PositionError, PositionResolver, PositionSensor, ResolvedPosition, SensorError, SensorOptions,
};
use roomnav_routing::{GeoPoint, Listing, ListingRecord};
use roomnav_session::{DistanceSession, HttpListings, JsonFileListings, ListingsSource, Update};
use tracing::{info, warn};

use crate::parsers;

#[derive(Args, Debug)]
pub struct ListingsArgs {
    /// Listings snapshot: a JSON file, or the base URL of a listings API
    #[arg(short, long)]
    pub listings: String,
}

#[derive(Args, Debug)]
pub struct PositionArgs {
    /// Latitude of the current position
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude of the current position
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Place name used when no position fix is available (e.g. "Delhi")
    #[arg(short, long)]
    pub place: Option<String>,

    /// How long to wait for a position fix (e.g., "10s", "PT30S")
    #[arg(long, value_parser = parsers::parse_duration)]
    pub timeout: Option<jiff::SignedDuration>,
}

pub enum AnyListings {
    File(JsonFileListings),
    Http(HttpListings),
}

impl AnyListings {
    pub fn from_args(args: &ListingsArgs) -> Self {
        if args.listings.starts_with("http://") || args.listings.starts_with("https://") {
            AnyListings::Http(HttpListings::from_env(args.listings.as_str()))
        } else {
            AnyListings::File(JsonFileListings::new(&args.listings))
        }
    }
}

impl ListingsSource for AnyListings {
    async fn fetch(&self) -> anyhow::Result<Vec<ListingRecord>> {
        match self {
            AnyListings::File(source) => source.fetch().await,
            AnyListings::Http(source) => source.fetch().await,
        }
    }
}

pub async fn load_listings(
    session: &DistanceSession,
    args: &ListingsArgs,
) -> Result<Arc<Vec<Listing>>, anyhow::Error> {
    let source = AnyListings::from_args(args);
    session
        .update_listings(&source)
        .await
        .with_context(|| format!("Failed to load listings from {}", args.listings))?;

    let listings = session
        .listings()
        .ok_or_else(|| anyhow::anyhow!("Listings request was superseded"))?;
    info!("Loaded {} listings", listings.len());

    Ok(listings)
}

fn sensor_options(config: &PositionConfig, args: &PositionArgs) -> Result<SensorOptions, anyhow::Error> {
    let mut options = config.sensor_options();

    if let Some(timeout) = args.timeout {
        options.timeout = Duration::try_from(timeout).context("Timeout must not be negative")?;
    }

    Ok(options)
}

/// Tries the sensor first and falls back to the place name, the way a user
/// would after a failed fix.
async fn resolve<S, G, C>(
    resolver: &PositionResolver<S, G, C>,
    place: Option<&str>,
) -> Result<ResolvedPosition, PositionError>
where
    S: PositionSensor,
    G: Geocoder,
    C: GeocodeCache,
{
    match resolver.resolve_from_sensor().await {
        Ok(resolved) => Ok(resolved),
        Err(err) => match place {
            Some(place) => {
                if !matches!(err, PositionError::Sensor(SensorError::CapabilityUnavailable)) {
                    warn!("{}, falling back to {:?}", err, place);
                }
                resolver.resolve_from_place_name(place).await
            }
            None => Err(err),
        },
    }
}

async fn resolve_with_sensor<S>(
    session: &DistanceSession,
    sensor: S,
    config: &PositionConfig,
    args: &PositionArgs,
) -> Result<Update, anyhow::Error>
where
    S: PositionSensor,
{
    let cache = match &config.cache_folder {
        Some(folder) => Some(FileCache::new(folder)?),
        None => None,
    };

    let resolver = PositionResolver::with_cache(sensor, NominatimClient::new(config.nominatim_params()), cache)
        .with_region_bias(config.region_bias.as_str())
        .with_sensor_options(sensor_options(config, args)?);

    session
        .update_position(resolve(&resolver, args.place.as_deref()))
        .await
        .map_err(|err| {
            if err.suggests_manual_entry() {
                anyhow::anyhow!("{err}. Pass --place <city> to enter a location manually")
            } else {
                anyhow::Error::new(err)
            }
        })
}

pub async fn resolve_position(session: &DistanceSession, args: &PositionArgs) -> Result<GeoPoint, anyhow::Error> {
    let config = PositionConfig::from_env()?;

    match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => {
            let position = GeoPoint::new(lat, lng)?;
            resolve_with_sensor(session, FixedSensor::new(position), &config, args).await?;
        }
        _ => {
            resolve_with_sensor(session, NoSensor, &config, args).await?;
        }
    }

    let resolved = session
        .position()
        .ok_or_else(|| anyhow::anyhow!("Position request was superseded"))?;
    info!(
        "Current position ({:.4}, {:.4})",
        resolved.position.lat(),
        resolved.position.lng()
    );

    Ok(resolved.position)
}
