use crate::model::ConfigError;
use chrono::Duration;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One OCR misread fix, applied as a plain substring replacement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Correction {
    pub pattern: String,
    pub replacement: String,
}

impl Correction {
    pub fn new(pattern: &str, replacement: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Phrases removed from every chunk, in order.
    pub boilerplate: Vec<String>,
    /// Applied in order, so an earlier fix may feed a later one.
    pub corrections: Vec<Correction>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            boilerplate: vec![
                "Your Offer".to_string(),
                "Their Offer".to_string(),
                "Offer".to_string(),
            ],
            corrections: default_corrections(),
        }
    }
}

pub fn default_corrections() -> Vec<Correction> {
    vec![
        Correction::new("Wveb", "Web"),
        Correction::new("Wve", "Web"),
        Correction::new("Glove ", "Gloves "),
        Correction::new("DesertEagle", "Desert Eagle "),
        Correction::new("Tec9", "Tec-9 "),
        Correction::new("u Tec", "Tec"),
    ]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub max_attempts: usize,
    /// Scores must be strictly above this to count as a match.
    pub min_score: f64,
    /// Matches below this are reported as low confidence.
    pub low_confidence: f64,
    /// Floor for single-name lookups.
    pub single_min_score: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            min_score: 0.50,
            low_confidence: 0.75,
            single_min_score: 0.75,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub google_docs_id: String,
    pub cache_file: String,
    pub refresh_interval_seconds: u64,
    pub normalizer: NormalizerConfig,
    pub resolver: ResolverConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            google_docs_id: "1teYBaOkmtAHz_4yEp1nJdOuzxhL09OSkYdAJt_gxTeo".to_string(),
            cache_file: "item_values_cache.json".to_string(),
            refresh_interval_seconds: 300,
            normalizer: NormalizerConfig::default(),
            resolver: ResolverConfig::default(),
        }
    }
}

impl AppConfig {
    /// `refresh_interval_seconds` as a duration; values chrono cannot represent are rejected.
    pub fn refresh_interval(&self) -> Result<Duration, ConfigError> {
        i64::try_from(self.refresh_interval_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or(ConfigError::OutOfRange("refresh_interval_seconds"))
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
