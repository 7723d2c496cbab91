use std::{path::PathBuf, time::Duration};

use anyhow::Context;

use crate::{
    cache::CACHE_FOLDER_ENV_VAR,
    nominatim_api::{DEFAULT_USER_AGENT, NOMINATIM_API_URL, NominatimClientParams},
    sensor::{DEFAULT_SENSOR_TIMEOUT, SensorOptions},
};

pub const GEOCODER_URL_ENV_VAR: &str = "ROOMNAV_GEOCODER_URL";
pub const REGION_BIAS_ENV_VAR: &str = "ROOMNAV_REGION_BIAS";
pub const USER_AGENT_ENV_VAR: &str = "ROOMNAV_USER_AGENT";
pub const SENSOR_TIMEOUT_ENV_VAR: &str = "ROOMNAV_SENSOR_TIMEOUT_MS";

pub const DEFAULT_REGION_BIAS: &str = "India";

/// Loads `.env.local` then `.env` from the working directory, if present.
/// Variables already set in the environment win.
pub fn load_dotenv() {
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();
}

#[derive(Debug, Clone)]
pub struct PositionConfig {
    pub geocoder_url: String,
    pub region_bias: String,
    pub user_agent: String,
    pub sensor_timeout: Duration,
    pub cache_folder: Option<PathBuf>,
}

impl Default for PositionConfig {
    fn default() -> Self {
        PositionConfig {
            geocoder_url: NOMINATIM_API_URL.to_string(),
            region_bias: DEFAULT_REGION_BIAS.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            sensor_timeout: DEFAULT_SENSOR_TIMEOUT,
            cache_folder: None,
        }
    }
}

impl PositionConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, anyhow::Error> {
        let mut config = PositionConfig::default();

        if let Some(url) = lookup(GEOCODER_URL_ENV_VAR) {
            config.geocoder_url = url;
        }
        if let Some(region_bias) = lookup(REGION_BIAS_ENV_VAR) {
            config.region_bias = region_bias;
        }
        if let Some(user_agent) = lookup(USER_AGENT_ENV_VAR) {
            config.user_agent = user_agent;
        }
        if let Some(timeout) = lookup(SENSOR_TIMEOUT_ENV_VAR) {
            let millis: u64 = timeout
                .trim()
                .parse()
                .with_context(|| format!("{SENSOR_TIMEOUT_ENV_VAR} must be a number of milliseconds"))?;
            config.sensor_timeout = Duration::from_millis(millis);
        }
        config.cache_folder = lookup(CACHE_FOLDER_ENV_VAR)
            .filter(|folder| !folder.trim().is_empty())
            .map(PathBuf::from);

        Ok(config)
    }

    pub fn nominatim_params(&self) -> NominatimClientParams {
        NominatimClientParams {
            base_url: self.geocoder_url.clone(),
            user_agent: self.user_agent.clone(),
        }
    }

    pub fn sensor_options(&self) -> SensorOptions {
        SensorOptions {
            timeout: self.sensor_timeout,
            ..SensorOptions::default()
        }
    }
}
