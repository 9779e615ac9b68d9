// Value-list specific HTML parsing
use crate::model::{Catalog, CatalogRecord, ParserError};
use crate::parser::category::infer_category;
use crate::parser::demand::status_to_demand;
use crate::utils::{extract_number, strip_non_ascii};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::{debug, info};

static KNIFE_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+kni(?:ves|fe)\b").expect("valid knife pattern"));

/// How many document elements before a table are considered for its category.
const CATEGORY_LOOKBACK: usize = 5;
/// Title row plus header row.
const HEADER_ROWS: usize = 2;
const UNKNOWN_CATEGORY: &str = "Unknown";

/// Single header/status words; a name made only of these is not an item.
const STRUCTURAL_WORDS: &[&str] = &[
    "skin", "skins", "item", "items", "name", "rarities", "rarity", "value", "values", "demand",
    "status", "tsthas", "base", "dg", "ck", "upg", "good", "bad", "mid", "low", "high", "pink",
    "red", "purple", "blue", "gold", "covert", "classified", "restricted", "mil-spec", "consumer",
    "industrial", "decent",
];

/// Legend phrases that mark a row as explanatory text.
const STRUCTURAL_PHRASES: &[&str] = &[
    "too small to have a status",
    "easy to find",
    "a little bit harder to find",
    "hard to find",
    "doesn't exist",
    "noone ever had it",
    "case item",
    "base value",
    "dg value",
    "ck value",
    "upg value",
    "except mods",
];

pub trait Parser {
    fn parse(&self, html: &str) -> Result<Catalog, ParserError>;
}

/// Parses the HTML export of the community value list.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueListParser;

/// Column positions, present only when the header row is wide enough.
#[derive(Debug, Clone, Copy)]
struct Columns {
    base: Option<usize>,
    dg: Option<usize>,
    ck: Option<usize>,
    upg: Option<usize>,
    status: Option<usize>,
}

impl Columns {
    fn from_header_width(width: usize) -> Self {
        let column = |idx: usize| (width > idx).then_some(idx);
        Self {
            base: column(1),
            dg: column(2),
            ck: column(3),
            upg: column(4),
            status: column(5),
        }
    }
}

impl ValueListParser {
    pub fn new() -> Self {
        Self
    }
}

fn selector(css: &str) -> Result<Selector, ParserError> {
    Selector::parse(css).map_err(|e| ParserError::HtmlParseError(e.to_string()))
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

impl Parser for ValueListParser {
    fn parse(&self, html: &str) -> Result<Catalog, ParserError> {
        let document = Html::parse_document(html);

        let block_selector = selector("h1, h2, h3, h4, h5, h6, p, table")?;
        let row_selector = selector("tr")?;
        let cell_selector = selector("th, td")?;

        let blocks: Vec<ElementRef<'_>> = document.select(&block_selector).collect();
        let table_count = blocks.iter().filter(|b| b.value().name() == "table").count();
        info!("Found {} tables in document", table_count);

        let mut catalog = Catalog::new();

        for (idx, block) in blocks.iter().enumerate() {
            if block.value().name() != "table" {
                continue;
            }

            let start = idx.saturating_sub(CATEGORY_LOOKBACK);
            let preceding: Vec<(usize, String)> = blocks[start..idx]
                .iter()
                .enumerate()
                .filter(|(_, element)| element.value().name() != "table")
                .map(|(offset, element)| (idx - (start + offset), element_text(element)))
                .collect();
            let category = infer_category(preceding.iter().map(|(d, text)| (*d, text.as_str())));
            info!(
                "Processing table with category: '{}'",
                category.as_deref().unwrap_or(UNKNOWN_CATEGORY)
            );

            let rows: Vec<Vec<String>> = block
                .select(&row_selector)
                .map(|row| row.select(&cell_selector).map(|cell| element_text(&cell)).collect())
                .collect();

            if rows.len() <= HEADER_ROWS {
                debug!("Skipping table: need at least 3 rows, found {}", rows.len());
                continue;
            }

            let columns = Columns::from_header_width(rows[1].len());
            let mut parsed = 0;
            for cells in &rows[HEADER_ROWS..] {
                if let Some(record) = parse_row(cells, columns, category.as_deref()) {
                    catalog.insert(record);
                    parsed += 1;
                }
            }
            debug!("Parsed {} items from this table", parsed);
        }

        info!("Fetched {} items from value list", catalog.len());
        Ok(catalog)
    }
}

fn parse_row(cells: &[String], columns: Columns, category: Option<&str>) -> Option<CatalogRecord> {
    let name = strip_non_ascii(cells.first()?).trim().to_string();
    if name.is_empty() || is_structural(&name) {
        return None;
    }

    let number = |column: Option<usize>| {
        column
            .and_then(|idx| cells.get(idx))
            .map_or(0.0, |text| extract_number(text))
    };
    let base = number(columns.base);
    let dg = number(columns.dg);
    let ck = number(columns.ck);
    let upg = number(columns.upg);

    let status = columns
        .status
        .and_then(|idx| cells.get(idx))
        .map(|text| strip_non_ascii(text).trim().to_string())
        .unwrap_or_default();

    let primary_value = [base, ck, dg, upg]
        .into_iter()
        .find(|value| *value != 0.0)
        .unwrap_or(0.0);

    let secondary_values = BTreeMap::from([
        ("base".to_string(), base),
        ("dg".to_string(), dg),
        ("ck".to_string(), ck),
        ("upg".to_string(), upg),
    ]);

    Some(CatalogRecord {
        canonical_name: qualify_name(&name, category),
        primary_value,
        secondary_values,
        demand: status_to_demand(&status),
        category: category.unwrap_or(UNKNOWN_CATEGORY).to_string(),
        status_text: status,
    })
}

/// Header rows, legends and bare status labels.
fn is_structural(name: &str) -> bool {
    let lower = name.to_lowercase();
    STRUCTURAL_PHRASES.iter().any(|phrase| lower.contains(phrase))
        || lower
            .split_whitespace()
            .all(|word| STRUCTURAL_WORDS.contains(&word))
}

/// Prefixes the category unless the name already carries it. Knife categories
/// drop their "Knives" word first: "Butterfly Knives" + "Fade" → "Butterfly Fade".
fn qualify_name(name: &str, category: Option<&str>) -> String {
    let Some(category) = category else {
        return name.to_string();
    };
    if name.to_lowercase().contains(&category.to_lowercase()) {
        return name.to_string();
    }

    let lower = category.to_lowercase();
    if lower.contains("knives") || lower.contains("knife") {
        let prefix = KNIFE_WORD_RE.replace_all(category, "");
        format!("{} {}", prefix.trim(), name)
    } else {
        format!("{} {}", category, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const VALUE_LIST_HTML: &str = r#"
        <html><body>
        <p>🔥 Value list 🔥</p>
        <h2>AK-47</h2>
        <table>
          <tr><td>AK-47</td></tr>
          <tr><td>Skin</td><td>Base Value</td><td>DG Value</td><td>CK Value</td><td>UPG Value</td><td>Status</td></tr>
          <tr><td>Ace 🔥</td><td>1,200</td><td>1,000</td><td>0</td><td>0</td><td>Red good</td></tr>
          <tr><td>BloodBoom</td><td>N/A</td><td>300k</td><td></td><td></td><td>pink</td></tr>
          <tr><td>Status</td><td>Value</td></tr>
          <tr><td>AK-47 Redline</td><td>50</td><td>0</td><td>0</td><td>0</td><td>blue bad</td></tr>
          <tr><td>Good</td><td>1</td></tr>
          <tr><td>Easy to find</td><td>2</td></tr>
        </table>
        <p>Knives</p>
        <p>12,000+</p>
        <p>Rarities: red, gold</p>
        <p>Butterfly Knives</p>
        <table>
          <tr><td>Butterfly</td></tr>
          <tr><td>Skin</td><td>Base Value</td></tr>
          <tr><td>Tiger Tooth</td><td>900</td></tr>
        </table>
        <table><tr><td>tiny</td></tr></table>
        </body></html>
    "#;

    #[test]
    fn parses_tables_into_catalog() {
        let catalog = ValueListParser::new().parse(VALUE_LIST_HTML).unwrap();
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(
            names,
            vec!["AK-47 Ace", "AK-47 BloodBoom", "AK-47 Redline", "Butterfly Tiger Tooth"]
        );
    }

    #[test]
    fn extracts_values_and_demand() {
        let catalog = ValueListParser::new().parse(VALUE_LIST_HTML).unwrap();

        let ace = catalog.get("ak-47 ace").unwrap();
        assert_eq!(ace.primary_value, 1200.0);
        assert_eq!(ace.secondary_values["dg"], 1000.0);
        assert_eq!(ace.demand, 10);
        assert_eq!(ace.category, "AK-47");
        assert_eq!(ace.status_text, "Red good");

        // base is missing, so the DG value becomes the primary one
        let bloodboom = catalog.get("AK-47 BloodBoom").unwrap();
        assert_eq!(bloodboom.primary_value, 300.0);
        assert_eq!(bloodboom.demand, 6);

        assert_eq!(catalog.get("AK-47 Redline").unwrap().demand, 1);

        let tiger = catalog.get("Butterfly Tiger Tooth").unwrap();
        assert_eq!(tiger.primary_value, 900.0);
        assert_eq!(tiger.demand, 5);
        assert_eq!(tiger.category, "Butterfly Knives");
        assert_eq!(tiger.secondary_values["upg"], 0.0);
    }

    #[test]
    fn document_without_tables_is_empty() {
        let catalog = ValueListParser::new().parse("<p>nothing here</p>").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn structural_rows_are_recognised() {
        assert!(is_structural("Skin"));
        assert!(is_structural("Base Value"));
        assert!(is_structural("red GOOD"));
        assert!(is_structural("A little bit harder to find"));
        assert!(!is_structural("Redline"));
        assert!(!is_structural("Gold Arabesque"));
    }

    #[test]
    fn names_are_qualified_with_category() {
        assert_eq!(qualify_name("Ace", Some("AK-47")), "AK-47 Ace");
        assert_eq!(qualify_name("AK-47 Ace", Some("AK-47")), "AK-47 Ace");
        assert_eq!(qualify_name("Fade", Some("Karambit KNIVES")), "Karambit Fade");
        assert_eq!(qualify_name("Fade", None), "Fade");
    }
}
