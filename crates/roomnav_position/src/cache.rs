use std::{
    hash::Hasher,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use fxhash::{FxHashMap, FxHasher64};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::geocoder::GeocodeMatch;

pub const CACHE_FOLDER_ENV_VAR: &str = "ROOMNAV_CACHE_FOLDER";

/// Storage for successful geocoding lookups. Misses are never cached.
pub trait GeocodeCache: Send + Sync {
    fn get(&self, query: &str, region_bias: &str) -> Option<GeocodeMatch>;

    fn put(&self, query: &str, region_bias: &str, found: &GeocodeMatch);
}

/// Lookups differing only in case or surrounding whitespace share an entry.
fn cache_key(query: &str, region_bias: &str) -> String {
    format!(
        "{}\u{1f}{}",
        query.trim().to_lowercase(),
        region_bias.trim().to_lowercase()
    )
}

/// `None` behaves like [`NoCache`], handy when a cache is configured at runtime.
impl<C: GeocodeCache> GeocodeCache for Option<C> {
    fn get(&self, query: &str, region_bias: &str) -> Option<GeocodeMatch> {
        self.as_ref().and_then(|cache| cache.get(query, region_bias))
    }

    fn put(&self, query: &str, region_bias: &str, found: &GeocodeMatch) {
        if let Some(cache) = self {
            cache.put(query, region_bias, found);
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl GeocodeCache for NoCache {
    fn get(&self, _query: &str, _region_bias: &str) -> Option<GeocodeMatch> {
        None
    }

    fn put(&self, _query: &str, _region_bias: &str, _found: &GeocodeMatch) {}
}

#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<FxHashMap<String, GeocodeMatch>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl GeocodeCache for MemoryCache {
    fn get(&self, query: &str, region_bias: &str) -> Option<GeocodeMatch> {
        self.entries.lock().get(&cache_key(query, region_bias)).cloned()
    }

    fn put(&self, query: &str, region_bias: &str, found: &GeocodeMatch) {
        self.entries
            .lock()
            .insert(cache_key(query, region_bias), found.clone());
    }
}

/// One JSON file per lookup, named after a hash of the normalized query.
#[derive(Debug, Clone)]
pub struct FileCache {
    folder: PathBuf,
}

impl FileCache {
    pub fn new(folder: impl Into<PathBuf>) -> Result<Self, anyhow::Error> {
        let folder = folder.into();

        if !folder.is_dir() {
            return Err(anyhow::anyhow!(format!(
                "Path {} is not a directory",
                folder.display()
            )));
        }

        Ok(FileCache { folder })
    }

    /// Uses the folder named by `ROOMNAV_CACHE_FOLDER`.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let cache_folder_path = std::env::var(CACHE_FOLDER_ENV_VAR)?;
        Self::new(cache_folder_path)
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    fn file_path(&self, query: &str, region_bias: &str) -> PathBuf {
        let mut hasher = FxHasher64::default();
        hasher.write(cache_key(query, region_bias).as_bytes());
        self.folder.join(format!("{:016x}.json", hasher.finish()))
    }

    fn read(&self, file_path: &Path) -> Result<Option<GeocodeMatch>, anyhow::Error> {
        if !file_path.is_file() {
            return Ok(None);
        }

        let file = std::fs::File::open(file_path)?;
        let found: GeocodeMatch = serde_json::from_reader(file)?;

        Ok(Some(found))
    }

    fn write(&self, file_path: &Path, found: &GeocodeMatch) -> Result<(), anyhow::Error> {
        let file = std::fs::File::create(file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, found)?;
        writer.flush()?;

        Ok(())
    }
}

impl GeocodeCache for FileCache {
    fn get(&self, query: &str, region_bias: &str) -> Option<GeocodeMatch> {
        let file_path = self.file_path(query, region_bias);

        match self.read(&file_path) {
            Ok(found) => found,
            Err(err) => {
                warn!("Ignoring unreadable cache file {}: {}", file_path.display(), err);
                None
            }
        }
    }

    fn put(&self, query: &str, region_bias: &str, found: &GeocodeMatch) {
        let file_path = self.file_path(query, region_bias);

        if let Err(err) = self.write(&file_path, found) {
            warn!("Failed to write cache file {}: {}", file_path.display(), err);
        } else {
            debug!("Cached geocoding result in {}", file_path.display());
        }
    }
}
