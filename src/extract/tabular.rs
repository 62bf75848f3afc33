use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Selector;

use super::document::{element_text, Document};
use super::types::in_range;

const ROW_KEYWORDS: &[&str] = &["occupancy", "percent", "leased", "occupied", "same-store"];

static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("valid selector"));
static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td, th").expect("valid selector"));
static CELL_PERCENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+\.?\d*)\s*%").expect("valid regex"));

/// Every in-range percentage from table rows that mention occupancy.
/// Exhaustive: the consensus reducer decides which of them to trust.
pub fn scan(doc: &Document) -> Vec<f64> {
    let mut values = Vec::new();

    for row in doc.html().select(&ROW_SELECTOR) {
        let cells: Vec<String> = row.select(&CELL_SELECTOR).map(|c| element_text(&c)).collect();
        let row_text = cells.join(" ").to_lowercase();
        if !ROW_KEYWORDS.iter().any(|kw| row_text.contains(kw)) {
            continue;
        }

        for cell in &cells {
            let Some(caps) = CELL_PERCENT_RE.captures(cell) else {
                continue;
            };
            if let Ok(value) = caps[1].parse::<f64>() {
                if in_range(value) {
                    values.push(value);
                }
            }
        }
    }

    log::debug!("Table scan found {} values", values.len());
    values
}
