use crate::config::ResolverConfig;
use crate::model::{Catalog, CatalogRecord, Match, ResolutionResult};
use crate::normalizer::Normalizer;
use crate::resolver::similarity::ratio;
use crate::utils::collapse_whitespace;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Shorter text is never searched.
const MIN_TEXT_LEN: usize = 3;

/// Trait defining the interface for resolving text against a catalog.
pub trait Resolver {
    /// Resolves every chunk in order. A canonical name is reported at most once per call.
    fn resolve<'a>(&self, catalog: &'a Catalog, chunks: &[String]) -> ResolutionResult<'a>;

    /// Best single guess for an already isolated name, by similarity alone.
    fn find_best<'a>(&self, catalog: &'a Catalog, text: &str) -> Option<(&'a CatalogRecord, f64)>;
}

/// Catalog entry paired with the lowercase form it is searched by.
#[derive(Debug)]
struct Candidate<'a> {
    record: &'a CatalogRecord,
    key: String,
}

/// Lowercase, `|` as a word break, single spaces. "AK-47 | Redline" → "ak-47 redline".
pub fn match_key(name: &str) -> String {
    collapse_whitespace(&name.to_lowercase().replace('|', " "))
}

/// Longest canonical names first. The sort is stable, so equal lengths keep catalog order.
fn ranked_candidates(catalog: &Catalog) -> Vec<Candidate<'_>> {
    let mut candidates: Vec<Candidate<'_>> = catalog
        .iter()
        .map(|record| Candidate {
            record,
            key: match_key(&record.canonical_name),
        })
        .filter(|candidate| !candidate.key.is_empty())
        .collect();
    candidates.sort_by_key(|candidate| std::cmp::Reverse(candidate.record.canonical_name.chars().count()));
    candidates
}

/// Implementation of the iterative chunk resolver.
#[derive(Debug, Clone, Default)]
pub struct EntityResolver {
    config: ResolverConfig,
}

impl EntityResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Normalizes a raw OCR block and resolves the resulting chunks.
    pub fn resolve_text<'a>(
        &self,
        normalizer: &Normalizer,
        catalog: &'a Catalog,
        raw_text: &str,
    ) -> ResolutionResult<'a> {
        let chunks = normalizer.normalize(raw_text);
        self.resolve(catalog, &chunks)
    }

    /// Matches one chunk, recording consumed names in `seen`.
    fn resolve_chunk<'a>(
        &self,
        candidates: &[Candidate<'a>],
        chunk: &str,
        seen: &mut HashSet<&'a str>,
    ) -> Vec<Match<'a>> {
        debug!("Searching in chunk: '{}'", chunk);
        let mut remaining = match_key(chunk);
        let mut found = Vec::new();

        for attempt in 0..self.config.max_attempts {
            if remaining.chars().count() < MIN_TEXT_LEN {
                break;
            }

            let Some((candidate, score)) = self.best_candidate(candidates, &remaining) else {
                debug!("No candidate above {:.2} on attempt {}", self.config.min_score, attempt + 1);
                break;
            };

            let record: &'a CatalogRecord = candidate.record;
            let name = record.canonical_name.as_str();
            if !seen.insert(name) {
                debug!("'{}' already matched, stopping chunk", name);
                break;
            }

            let low_confidence = score < self.config.low_confidence;
            if low_confidence {
                warn!("Low confidence match '{}' (score: {:.2})", name, score);
            }

            found.push(Match {
                record,
                matched_name: name.to_string(),
                score,
                low_confidence,
            });
            remaining = collapse_whitespace(&remaining.replacen(candidate.key.as_str(), " ", 1));
        }

        found
    }

    fn best_candidate<'c, 'a>(
        &self,
        candidates: &'c [Candidate<'a>],
        remaining: &str,
    ) -> Option<(&'c Candidate<'a>, f64)> {
        let mut best = None;
        let mut best_score = 0.0;

        for candidate in candidates {
            let score = if remaining.contains(candidate.key.as_str()) {
                1.0
            } else {
                ratio(remaining, &candidate.key)
            };

            if score > best_score && score > self.config.min_score {
                best_score = score;
                best = Some((candidate, score));
                if score >= 1.0 {
                    // nothing can beat an exact hit under strict comparison
                    break;
                }
            }
        }

        best
    }
}

impl Resolver for EntityResolver {
    fn resolve<'a>(&self, catalog: &'a Catalog, chunks: &[String]) -> ResolutionResult<'a> {
        let candidates = ranked_candidates(catalog);
        let mut seen = HashSet::new();
        let mut matches = Vec::new();

        for chunk in chunks {
            let chunk_matches = self.resolve_chunk(&candidates, chunk, &mut seen);
            matches.extend(chunk_matches);
        }

        debug!("Resolved {} items from {} chunks", matches.len(), chunks.len());
        ResolutionResult { matches }
    }

    fn find_best<'a>(&self, catalog: &'a Catalog, text: &str) -> Option<(&'a CatalogRecord, f64)> {
        let text = match_key(text);
        if text.chars().count() < MIN_TEXT_LEN {
            return None;
        }

        let mut best = None;
        let mut best_score = 0.0;
        for record in catalog.iter() {
            let score = ratio(&text, &match_key(&record.canonical_name));
            if score > best_score && score > self.config.single_min_score {
                best_score = score;
                best = Some((record, score));
            }
        }
        best
    }
}

/// First record, in catalog order, whose name contains the fragment (ignoring case).
///
/// Catalog order is alphabetical by canonical name, not the order of the source document,
/// so with several hits the alphabetically first one is returned.
pub fn find_by_fragment<'a>(catalog: &'a Catalog, fragment: &str) -> Option<&'a CatalogRecord> {
    let fragment = fragment.trim().to_lowercase();
    if fragment.is_empty() {
        return None;
    }
    catalog
        .iter()
        .find(|record| record.canonical_name.to_lowercase().contains(&fragment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn catalog(names: &[&str]) -> Catalog {
        names
            .iter()
            .map(|name| CatalogRecord::new(*name, 100.0, 5))
            .collect()
    }

    fn chunks(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn match_key_folds_separators() {
        assert_eq!(match_key("AK-47 | Redline"), "ak-47 redline");
        assert_eq!(match_key("  Karambit   Fade "), "karambit fade");
    }

    #[test]
    fn candidates_are_ranked_longest_first_with_stable_ties() {
        let catalog = catalog(&["Ace", "AK-47", "AK-47 | Redline", "Bravo"]);
        let ranked: Vec<&str> = ranked_candidates(&catalog)
            .iter()
            .map(|c| c.record.canonical_name.as_str())
            .collect();
        assert_eq!(ranked, vec!["AK-47 | Redline", "AK-47", "Bravo", "Ace"]);
    }

    #[test]
    fn prefers_longer_name_over_contained_short_name() {
        let catalog = catalog(&["AK-47", "AK-47 | Redline"]);
        let result = EntityResolver::default().resolve(&catalog, &chunks(&["ak-47 redline"]));
        assert_eq!(result.names(), vec!["AK-47 | Redline"]);
        assert_eq!(result.matches[0].score, 1.0);
    }

    #[test]
    fn consumes_matched_text_before_next_attempt() {
        let catalog = catalog(&["AK-47", "AWP Asiimov"]);
        let result = EntityResolver::default().resolve(&catalog, &chunks(&["ak-47 awp asiimov"]));
        assert_eq!(result.names(), vec!["AWP Asiimov", "AK-47"]);
        assert!(result.iter().all(|m| m.score == 1.0 && !m.low_confidence));
    }

    #[test]
    fn names_are_not_reported_twice_across_chunks() {
        let catalog = catalog(&["Karambit Fade"]);
        let result = EntityResolver::default().resolve(
            &catalog,
            &chunks(&["karambit fade", "karambit fade", "karambit fade karambit fade"]),
        );
        assert_eq!(result.names(), vec!["Karambit Fade"]);
    }

    #[test]
    fn stops_after_max_attempts() {
        let catalog = catalog(&["alpha", "bravo", "charlie", "delta", "foxtrot", "golf1", "hotel"]);
        let result = EntityResolver::default().resolve(
            &catalog,
            &chunks(&["alpha bravo charlie delta foxtrot golf1 hotel"]),
        );
        assert_eq!(result.len(), 5);
    }

    #[test]
    fn attempt_limit_is_configurable() {
        let catalog = catalog(&["alpha", "bravo", "charlie"]);
        let resolver = EntityResolver::new(ResolverConfig {
            max_attempts: 2,
            ..ResolverConfig::default()
        });
        let result = resolver.resolve(&catalog, &chunks(&["alpha bravo charlie"]));
        assert_eq!(result.names(), vec!["charlie", "alpha"]);
    }

    #[test]
    fn garbled_text_is_kept_but_flagged() {
        let catalog = catalog(&["Karambit Fade", "Butterfly Tiger Tooth"]);
        let result = EntityResolver::default().resolve(&catalog, &chunks(&["karambit zzzzzzzz"]));
        assert_eq!(result.names(), vec!["Karambit Fade"]);
        let only = &result.matches[0];
        assert!((only.score - 0.6).abs() < 1e-9);
        assert!(only.low_confidence);
    }

    #[test]
    fn noise_below_threshold_yields_nothing() {
        let catalog = catalog(&["Karambit Fade"]);
        let result = EntityResolver::default().resolve(&catalog, &chunks(&["qwxv 12"]));
        assert!(result.is_empty());
    }

    #[test]
    fn empty_input_yields_empty_result() {
        let catalog = catalog(&["Karambit Fade"]);
        let resolver = EntityResolver::default();
        assert!(resolver.resolve(&catalog, &[]).is_empty());
        assert!(resolver.resolve(&catalog, &chunks(&["", "ab"])).is_empty());
        assert!(resolver.resolve(&Catalog::new(), &chunks(&["karambit fade"])).is_empty());
    }

    #[test]
    fn equal_scores_resolve_in_catalog_order() {
        // both names have the same length and the same ratio against the text
        let catalog = catalog(&["abcx", "abcy"]);
        let result = EntityResolver::default().resolve(&catalog, &chunks(&["abcz"]));
        assert_eq!(result.names(), vec!["abcx"]);
    }

    #[test]
    fn find_best_requires_high_similarity() {
        let catalog = catalog(&["Karambit Fade", "Butterfly Tiger Tooth"]);
        let resolver = EntityResolver::default();

        let (record, score) = resolver.find_best(&catalog, "Karanbit Fade").unwrap();
        assert_eq!(record.canonical_name, "Karambit Fade");
        assert!(score > 0.9);

        // "karambit" alone is contained in the name but only scores 16/21
        assert!(resolver.find_best(&catalog, "karambit").is_some());
        assert!(resolver.find_best(&catalog, "karam").is_none());
        assert!(resolver.find_best(&catalog, "ka").is_none());
    }

    #[test]
    fn find_by_fragment_uses_catalog_order() {
        // inserted out of order; the alphabetically first hit wins
        let catalog = catalog(&["AWP Autumness", "AK-47 BloodBoom", "AK-47 Ace"]);
        assert_eq!(
            find_by_fragment(&catalog, " ak-47 ").map(|r| r.canonical_name.as_str()),
            Some("AK-47 Ace")
        );
        assert!(find_by_fragment(&catalog, "m4a4").is_none());
        assert!(find_by_fragment(&catalog, "  ").is_none());
    }

    #[test]
    fn resolve_text_runs_the_normalizer() {
        let catalog = catalog(&["Bowie Knife Crimson Web"]);
        let result = EntityResolver::default().resolve_text(
            &Normalizer::default(),
            &catalog,
            "Their Offer Bowie Knife Crimson Wveb Value: 1,200",
        );
        assert_eq!(result.names(), vec!["Bowie Knife Crimson Web"]);
    }
}
