// Core structs: CatalogRecord, Catalog, Match, ResolutionResult
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::debug;

/// One priced entry of the value list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    #[serde(rename = "name", default)]
    pub canonical_name: String,
    #[serde(rename = "value", default)]
    pub primary_value: f64,
    #[serde(rename = "values", default)]
    pub secondary_values: BTreeMap<String, f64>,
    #[serde(default = "default_demand")]
    pub demand: u8,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "status", default)]
    pub status_text: String,
}

fn default_demand() -> u8 {
    5
}

impl CatalogRecord {
    pub fn new(name: impl Into<String>, primary_value: f64, demand: u8) -> Self {
        Self {
            canonical_name: name.into(),
            primary_value,
            secondary_values: BTreeMap::new(),
            demand: demand.clamp(1, 10),
            category: String::new(),
            status_text: String::new(),
        }
    }
}

/// Canonical name → record. Iteration is ordered by canonical name, lookups ignore case.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: BTreeMap<String, CatalogRecord>,
    folded: HashMap<String, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record under its canonical name. A key equal ignoring case replaces the old entry.
    pub fn insert(&mut self, record: CatalogRecord) {
        let folded = record.canonical_name.to_lowercase();
        if let Some(previous) = self.folded.remove(&folded) {
            debug!("Replacing catalog entry '{}' with '{}'", previous, record.canonical_name);
            self.items.remove(&previous);
        }
        self.folded.insert(folded, record.canonical_name.clone());
        self.items.insert(record.canonical_name.clone(), record);
    }

    pub fn get(&self, name: &str) -> Option<&CatalogRecord> {
        self.folded
            .get(&name.to_lowercase())
            .and_then(|key| self.items.get(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogRecord> {
        self.items.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Builds a catalog from the persisted `items` map; the map key wins over the record's own name.
    pub fn from_items(items: BTreeMap<String, CatalogRecord>) -> Self {
        let mut catalog = Self::new();
        for (name, mut record) in items {
            record.canonical_name = name;
            catalog.insert(record);
        }
        catalog
    }

    pub fn to_items(&self) -> BTreeMap<String, CatalogRecord> {
        self.items.clone()
    }
}

impl FromIterator<CatalogRecord> for Catalog {
    fn from_iter<I: IntoIterator<Item = CatalogRecord>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for record in iter {
            catalog.insert(record);
        }
        catalog
    }
}

/// A catalog entry the resolver found in a chunk of text.
#[derive(Debug, Clone, PartialEq)]
pub struct Match<'a> {
    pub record: &'a CatalogRecord,
    pub matched_name: String,
    pub score: f64,
    /// Accepted, but scored below the low-confidence threshold.
    pub low_confidence: bool,
}

/// Matches for one text block, in discovery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionResult<'a> {
    pub matches: Vec<Match<'a>>,
}

impl<'a> ResolutionResult<'a> {
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Match<'a>> {
        self.matches.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.matches.iter().map(|m| m.matched_name.as_str()).collect()
    }

    pub fn records(&self) -> Vec<&'a CatalogRecord> {
        self.matches.iter().map(|m| m.record).collect()
    }
}

impl<'a> IntoIterator for ResolutionResult<'a> {
    type Item = Match<'a>;
    type IntoIter = std::vec::IntoIter<Match<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.into_iter()
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    HttpError(String),
    #[error("request timed out")]
    Timeout,
    #[error("invalid response status {0}")]
    InvalidResponse(u16),
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("HTML parse error: {0}")]
    HtmlParseError(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cache I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("cache is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParserError),
    #[error("value list contained no items")]
    Empty,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} is out of range")]
    OutOfRange(&'static str),
}
