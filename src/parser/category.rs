// Guesses a table's category from the headings and paragraphs just above it.
use crate::utils::strip_non_ascii;

const WEAPON_KEYWORDS: &[&str] = &[
    "ak-47", "ak", "awp", "m4a4", "m4a1", "mp", "mac", "p250", "p90", "eagle", "desert", "deagle",
    "five", "seven", "glock", "usp", "famas", "galil", "aug", "sg", "ssg", "scout", "negev",
    "bizon", "ppsh", "thompson", "nova", "xm", "mag", "sawed", "karambit", "huntsman", "bayonet",
    "butterfly", "bowie", "falchion", "flip", "gut", "navaja", "shadow", "stiletto", "talon",
    "ursus", "cleaver", "sickle",
];

const STATUS_WORDS: &[&str] = &[
    "decent", "good", "bad", "mid", "tsthas", "unknown yet", "null", "doesnt exist", "low", "high",
    "pink", "red", "blue", "purple", "gold", "covert", "classified", "cks", "ck",
];

const GENERIC_HEADINGS: &[&str] = &["hi", "guns", "gloves", "knives"];

const CASE_KNIFE_DELIMITERS: &[&str] = &["CKS", " CK", " -", " (", "CASE"];

/// Picks the best category label among `(distance, text)` pairs, where distance counts
/// document elements back from the table. Higher priority wins, then the nearer text.
pub fn infer_category<'t>(preceding: impl IntoIterator<Item = (usize, &'t str)>) -> Option<String> {
    preceding
        .into_iter()
        .filter_map(|(distance, raw)| {
            let text = clean_heading(raw)?;
            Some((heading_priority(&text, distance), distance, text))
        })
        .min_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)))
        .map(|(_, _, text)| text)
}

/// Returns the usable label in a heading, or `None` for noise.
pub fn clean_heading(raw: &str) -> Option<String> {
    let mut text = strip_non_ascii(raw).trim().to_string();
    if text.len() < 2 {
        return None;
    }

    for suffix in ["'s", "'S"] {
        if let Some(stripped) = text.strip_suffix(suffix) {
            text = stripped.to_string();
            break;
        }
    }

    if text.contains("CKS") || text.to_uppercase().contains("CASE KNIVES") {
        for delimiter in CASE_KNIFE_DELIMITERS {
            if let Some((before, _)) = text.split_once(delimiter) {
                let before = before.trim();
                if before.len() >= 2 {
                    text = before.to_string();
                    break;
                }
            }
        }
    }

    let text = text.trim().to_string();
    let lower = text.to_lowercase();
    if text.is_empty() || GENERIC_HEADINGS.contains(&lower.as_str()) || lower.contains("rarities") {
        return None;
    }
    if !(2..=50).contains(&text.len()) || is_numeric_label(&text) {
        return None;
    }
    Some(text)
}

/// "12,000+", "1.5k" and the like are values, not labels.
fn is_numeric_label(text: &str) -> bool {
    let digits: String = text
        .chars()
        .filter(|c| !matches!(c, ',' | '.' | '-' | '+' | 'k' | ' '))
        .collect();
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn heading_priority(text: &str, distance: usize) -> i32 {
    let lower = text.to_lowercase();
    let mut priority = 0;

    if WEAPON_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        priority += 100;
    }
    if text.chars().any(|c| c.is_ascii_digit()) || text.contains('-') {
        priority += 50;
    }
    let has_letters = text.chars().any(char::is_alphabetic);
    if has_letters && !text.chars().any(char::is_lowercase) && text.len() <= 8 {
        priority += 40;
    }
    priority += 11_i32.saturating_sub(distance as i32 * 2).max(0);
    if STATUS_WORDS.contains(&lower.as_str()) {
        priority -= 50;
    }

    priority
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weapon_heading_beats_nearer_prose() {
        let preceding = [(3, "AK-47"), (2, "Prices updated weekly"), (1, "see below")];
        assert_eq!(infer_category(preceding), Some("AK-47".to_string()));
    }

    #[test]
    fn nearer_weapon_heading_wins() {
        let preceding = [(2, "Karambit"), (1, "Bayonet")];
        assert_eq!(infer_category(preceding), Some("Bayonet".to_string()));
    }

    #[test]
    fn status_words_are_demoted() {
        assert!(heading_priority("Red", 1) < heading_priority("Gloves Pack", 1));
    }

    #[test]
    fn noise_headings_are_skipped() {
        assert_eq!(clean_heading("Knives"), None);
        assert_eq!(clean_heading("Rarities and colours"), None);
        assert_eq!(clean_heading("12,000+"), None);
        assert_eq!(clean_heading("🔥"), None);
        assert!(clean_heading("x").is_none());
        assert_eq!(infer_category([(1, "guns"), (2, "1.5k")]), None);
    }

    #[test]
    fn case_knife_labels_are_trimmed() {
        assert_eq!(clean_heading("Huntsman CKS - Case Knives"), Some("Huntsman".to_string()));
        assert_eq!(clean_heading("🔪 Bowie (CASE KNIVES)"), Some("Bowie".to_string()));
        assert_eq!(clean_heading("Ursus's"), Some("Ursus".to_string()));
    }
}
