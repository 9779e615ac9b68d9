use crate::model::{Catalog, CatalogRecord, StorageError};
use crate::utils::parse_datetime;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

/// On-disk form of the catalog: `{ "items": {...}, "last_update": "..." | null }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CachedCatalog {
    #[serde(default)]
    pub items: BTreeMap<String, CatalogRecord>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub last_update: Option<DateTime<Utc>>,
}

/// Unparseable timestamps count as "never updated" instead of failing the whole cache.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_datetime))
}

impl CachedCatalog {
    pub fn new(catalog: &Catalog, last_update: Option<DateTime<Utc>>) -> Self {
        Self {
            items: catalog.to_items(),
            last_update,
        }
    }

    pub fn catalog(&self) -> Catalog {
        Catalog::from_items(self.items.clone())
    }

    pub fn age(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.last_update.map(|updated| now - updated)
    }

    /// Never-updated caches are always stale.
    pub fn is_stale(&self, now: DateTime<Utc>, refresh_interval: Duration) -> bool {
        self.age(now).is_none_or(|age| age > refresh_interval)
    }
}

/// Reads and writes the catalog cache file.
#[derive(Debug, Clone)]
pub struct CatalogCache {
    path: PathBuf,
}

impl CatalogCache {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when no cache file exists yet.
    pub fn load(&self) -> Result<Option<CachedCatalog>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No cache file at {}, will fetch fresh data", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let cached: CachedCatalog = serde_json::from_str(&content)?;
        info!("Loaded {} items from cache", cached.items.len());
        Ok(Some(cached))
    }

    pub fn save(&self, cached: &CachedCatalog) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(cached)?;
        fs::write(&self.path, json)?;
        info!("Saved {} items to cache", cached.items.len());
        Ok(())
    }
}
