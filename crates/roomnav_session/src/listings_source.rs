use std::{future::Future, path::PathBuf};

use anyhow::Context;
use roomnav_routing::ListingRecord;
use tracing::debug;

pub const LISTINGS_TOKEN_ENV_VAR: &str = "ROOMNAV_LISTINGS_TOKEN";

/// Where the listings snapshot comes from. Records are returned raw, the
/// session validates them.
pub trait ListingsSource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = anyhow::Result<Vec<ListingRecord>>> + Send;
}

/// A JSON array of listing records on disk.
#[derive(Debug, Clone)]
pub struct JsonFileListings {
    path: PathBuf,
}

impl JsonFileListings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileListings { path: path.into() }
    }
}

impl ListingsSource for JsonFileListings {
    async fn fetch(&self) -> anyhow::Result<Vec<ListingRecord>> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read listings from {}", self.path.display()))?;

        let records: Vec<ListingRecord> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse listings in {}", self.path.display()))?;

        debug!("Read {} listing records from {}", records.len(), self.path.display());

        Ok(records)
    }
}

/// Listings backend answering `GET <base>/api/pg/` with a JSON array.
pub struct HttpListings {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpListings {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token,
            client: reqwest::Client::new(),
        }
    }

    /// Token from `ROOMNAV_LISTINGS_TOKEN`, if set.
    pub fn from_env(base_url: impl Into<String>) -> Self {
        Self::new(base_url, std::env::var(LISTINGS_TOKEN_ENV_VAR).ok())
    }

    fn listings_url(&self) -> String {
        format!("{}/api/pg/", self.base_url.trim_end_matches('/'))
    }
}

impl ListingsSource for HttpListings {
    async fn fetch(&self) -> anyhow::Result<Vec<ListingRecord>> {
        let mut request = self.client.get(self.listings_url());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            anyhow::bail!("Listings API error: {status} - {message}");
        }

        let records: Vec<ListingRecord> = response.json().await?;
        debug!("Fetched {} listing records from {}", records.len(), self.base_url);

        Ok(records)
    }
}

/// Records held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticListings {
    records: Vec<ListingRecord>,
}

impl StaticListings {
    pub fn new(records: Vec<ListingRecord>) -> Self {
        StaticListings { records }
    }
}

impl ListingsSource for StaticListings {
    async fn fetch(&self) -> anyhow::Result<Vec<ListingRecord>> {
        Ok(self.records.clone())
    }
}
