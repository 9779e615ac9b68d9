use crate::fetcher::CatalogSource;
use crate::model::{Catalog, RefreshError};
use crate::parser::{Parser, ValueListParser};
use crate::storage::{CachedCatalog, CatalogCache};
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The cache was recent enough; nothing was fetched.
    Fresh,
    Updated { items: usize },
}

/// Keeps the catalog current: serves the cached copy and re-fetches it when stale.
pub struct ValueList<S: CatalogSource> {
    source: S,
    parser: ValueListParser,
    cache: CatalogCache,
    refresh_interval: Duration,
    cached: CachedCatalog,
}

impl<S: CatalogSource> ValueList<S> {
    /// Opens the cache. An unreadable cache is logged and treated as empty.
    pub fn open(source: S, cache: CatalogCache, refresh_interval: Duration) -> Self {
        let cached = match cache.load() {
            Ok(Some(cached)) => cached,
            Ok(None) => CachedCatalog::default(),
            Err(e) => {
                warn!("Error loading cache {}: {}", cache.path().display(), e);
                CachedCatalog::default()
            }
        };

        Self {
            source,
            parser: ValueListParser::new(),
            cache,
            refresh_interval,
            cached,
        }
    }

    pub fn catalog(&self) -> Catalog {
        self.cached.catalog()
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.cached.last_update
    }

    pub fn cache_age(&self) -> Option<Duration> {
        self.cached.age(Utc::now())
    }

    pub fn should_refresh(&self) -> bool {
        self.cached.is_stale(Utc::now(), self.refresh_interval)
    }

    /// Fetches and parses the value list unless the cache is fresh and `force` is off.
    /// On failure the previous catalog stays in place.
    pub async fn refresh(&mut self, force: bool) -> Result<RefreshOutcome, RefreshError> {
        if !force && !self.should_refresh() {
            info!("Cache is still fresh, skipping fetch");
            return Ok(RefreshOutcome::Fresh);
        }

        let html = self.source.fetch().await?;
        let catalog = self.parser.parse(&html)?;
        if catalog.is_empty() {
            return Err(RefreshError::Empty);
        }

        let items = catalog.len();
        self.cached = CachedCatalog::new(&catalog, Some(Utc::now()));
        if let Err(e) = self.cache.save(&self.cached) {
            warn!("Error saving cache: {}", e);
        }

        info!("Loaded {} items from value list", items);
        Ok(RefreshOutcome::Updated { items })
    }
}
