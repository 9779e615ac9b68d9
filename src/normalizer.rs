use crate::config::NormalizerConfig;
use crate::utils::collapse_whitespace;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// "Value: 1,200" style price labels that separate items in an offer panel.
static VALUE_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)value[:\s]*[\d,./]+").expect("valid marker pattern"));
static LEADING_NUMBERS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:\d+(?:\s+|$))+").expect("valid leading pattern"));
static TRAILING_NUMBERS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:(?:^|\s+)\d+)+\s*$").expect("valid trailing pattern"));
// Only the leading whitespace is consumed, so adjacent names each keep their separator.
static NAME_TON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+[A-Z][a-z]+ton\S*").expect("valid name pattern"));
static NAME_INGTON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+[A-Z][a-z]+ington\S*").expect("valid name pattern"));

const MIN_CHUNK_LEN: usize = 3;
const MIN_SEGMENT_LEN: usize = 3;
/// Upper bound on re-cleaning one chunk.
const MAX_PASSES: usize = 16;

/// Cleans OCR text and cuts it into per-item chunks.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Never fails; text with nothing usable yields an empty list.
    ///
    /// Every chunk is cleaned again until a further pass returns it unchanged, so
    /// `normalize(c) == [c]` holds for each chunk `c` this returns.
    pub fn normalize(&self, raw_text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        for chunk in self.single_pass(raw_text) {
            self.settle(chunk, MAX_PASSES, &mut chunks);
        }
        chunks
    }

    fn single_pass(&self, text: &str) -> Vec<String> {
        split_on_value_markers(text)
            .into_iter()
            .filter_map(|segment| self.clean_chunk(&segment))
            .collect()
    }

    /// Cleaning can expose more work: a number left trailing once a name is dropped, or a
    /// value marker once brackets become spaces. Re-clean until the chunk is stable.
    fn settle(&self, chunk: String, passes_left: usize, out: &mut Vec<String>) {
        let next = self.single_pass(&chunk);
        if next.len() == 1 && next[0] == chunk {
            out.push(chunk);
            return;
        }
        if passes_left == 0 {
            debug!("Chunk '{}' still changing after {} passes", chunk, MAX_PASSES);
            out.push(chunk);
            return;
        }
        for piece in next {
            self.settle(piece, passes_left - 1, out);
        }
    }

    /// Runs one cleanup pass on one segment. `None` when less than 3 characters survive.
    pub fn clean_chunk(&self, segment: &str) -> Option<String> {
        let mut chunk = segment.to_string();

        for phrase in &self.config.boilerplate {
            if !phrase.is_empty() {
                chunk = chunk.replace(phrase.as_str(), "");
            }
        }

        chunk = chunk
            .replace("'s", "")
            .replace("\u{2019}s", "")
            .replace(['\'', '\u{2019}'], "");
        chunk = chunk.replace(['(', ')', '[', ']', '_'], " ");
        chunk = chunk.replace([',', '.', '"'], "");

        chunk = LEADING_NUMBERS_RE.replace(&chunk, "").into_owned();
        chunk = TRAILING_NUMBERS_RE.replace(&chunk, "").into_owned();
        chunk = chunk.trim().to_string();

        for correction in &self.config.corrections {
            if !correction.pattern.is_empty() {
                chunk = chunk.replace(correction.pattern.as_str(), &correction.replacement);
            }
        }

        chunk = NAME_TON_RE.replace_all(&chunk, " ").into_owned();
        chunk = NAME_INGTON_RE.replace_all(&chunk, " ").into_owned();

        let chunk = collapse_whitespace(&chunk);
        if chunk.chars().count() < MIN_CHUNK_LEN {
            debug!("Dropping short chunk from segment '{}'", segment.trim());
            return None;
        }
        Some(chunk)
    }
}

/// Normalizes with the built-in boilerplate and correction tables.
pub fn normalize(raw_text: &str) -> Vec<String> {
    Normalizer::default().normalize(raw_text)
}

/// Splits at every value marker. Falls back to the whole text when there is no marker
/// or no segment longer than 3 characters.
pub fn split_on_value_markers(text: &str) -> Vec<String> {
    let segments: Vec<String> = if VALUE_MARKER_RE.is_match(text) {
        VALUE_MARKER_RE
            .split(text)
            .map(str::trim)
            .filter(|segment| segment.chars().count() > MIN_SEGMENT_LEN)
            .map(str::to_string)
            .collect()
    } else {
        Vec::new()
    };

    if segments.is_empty() {
        vec![text.trim().to_string()]
    } else {
        segments
    }
}
