use anyhow::Context;
use roomnav_routing::{
    GraphBuilder, Kilometers, Kmh, SummaryParams,
    constants::{DEFAULT_DETOUR_FACTOR, DEFAULT_SPEED_KMH, DEFAULT_THRESHOLD_KM},
};

pub const THRESHOLD_ENV_VAR: &str = "ROOMNAV_THRESHOLD_KM";
pub const SPEED_ENV_VAR: &str = "ROOMNAV_SPEED_KMH";
pub const DETOUR_FACTOR_ENV_VAR: &str = "ROOMNAV_DETOUR_FACTOR";

/// Knobs of a distance computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    /// Listings at least this far apart get no edge
    pub threshold: Kilometers,
    pub assumed_speed: Kmh,
    pub detour_factor: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            threshold: Kilometers::new(DEFAULT_THRESHOLD_KM),
            assumed_speed: Kmh::new(DEFAULT_SPEED_KMH),
            detour_factor: DEFAULT_DETOUR_FACTOR,
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, anyhow::Error> {
        let mut config = SessionConfig::default();

        if let Some(threshold) = parse_positive(&lookup, THRESHOLD_ENV_VAR)? {
            config.threshold = Kilometers::new(threshold);
        }
        if let Some(speed) = parse_positive(&lookup, SPEED_ENV_VAR)? {
            config.assumed_speed = Kmh::new(speed);
        }
        if let Some(detour_factor) = parse_positive(&lookup, DETOUR_FACTOR_ENV_VAR)? {
            config.detour_factor = detour_factor;
        }

        Ok(config)
    }

    pub fn graph_builder(&self) -> GraphBuilder {
        GraphBuilder::new(self.threshold)
    }

    pub fn summary_params(&self) -> SummaryParams {
        SummaryParams {
            assumed_speed: self.assumed_speed,
            detour_factor: self.detour_factor,
        }
    }
}

fn parse_positive(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<f64>, anyhow::Error> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };

    let value: f64 = raw
        .trim()
        .parse()
        .with_context(|| format!("{key} must be a number, got {raw:?}"))?;

    if !(value.is_finite() && value > 0.0) {
        anyhow::bail!("{key} must be a positive number, got {raw:?}");
    }

    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SessionConfig::from_lookup(|_| None).unwrap();

        assert_eq!(config.threshold, Kilometers::new(500.0));
        assert_eq!(config.summary_params(), SummaryParams::default());
    }

    #[test]
    fn overrides_and_validation() {
        let config = SessionConfig::from_lookup(|key| match key {
            THRESHOLD_ENV_VAR => Some("50".to_string()),
            DETOUR_FACTOR_ENV_VAR => Some("1.2".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.graph_builder().threshold(), Kilometers::new(50.0));
        assert_eq!(config.summary_params().detour_factor, 1.2);

        assert!(SessionConfig::from_lookup(|key| (key == SPEED_ENV_VAR).then(|| "0".to_string())).is_err());
        assert!(SessionConfig::from_lookup(|key| (key == THRESHOLD_ENV_VAR).then(|| "far".to_string())).is_err());
    }
}
