use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;

use super::document::Document;
use super::text::snippet;
use super::types::{Candidate, Strategy};

// HTML parsing lowercases `ix:nonFraction` and `contextRef`.
const FACT_TAG: &str = "ix:nonfraction";
const CONTEXT_ATTR: &str = "contextref";

const CURRENT_CONTEXT_MARKERS: &[&str] = &["current", "asof"];
const LABEL_KEYWORDS: &[&str] = &[
    "occupancy",
    "leased",
    "percent leased",
    "portfolio",
    "properties leased",
];
const MAX_CONTEXT_CHARS: usize = 400;

static PLAIN_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.?\d*$").expect("valid regex"));

/// First inline-XBRL fact in a current-period context whose surrounding label
/// talks about occupancy. Structured facts are taken as ground truth, so the
/// first qualifying one wins outright.
pub fn scan(doc: &Document) -> Option<Candidate> {
    doc.html()
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name().eq_ignore_ascii_case(FACT_TAG))
        .find_map(|fact| qualify(&fact))
}

fn qualify(fact: &ElementRef<'_>) -> Option<Candidate> {
    let context = fact.value().attr(CONTEXT_ATTR)?.to_lowercase();
    if !CURRENT_CONTEXT_MARKERS.iter().any(|m| context.contains(m)) {
        return None;
    }

    let label = label_text(fact);
    let label_lower = label.to_lowercase();
    if !LABEL_KEYWORDS.iter().any(|kw| label_lower.contains(kw)) {
        return None;
    }

    let raw = fact.text().collect::<String>();
    let number = raw.trim().replace(',', "");
    if !PLAIN_NUMBER_RE.is_match(&number) {
        return None;
    }
    let value: f64 = number.parse().ok()?;

    let candidate = Candidate::new(value, Strategy::Structured, snippet(&label, MAX_CONTEXT_CHARS));
    if candidate.is_some() {
        log::debug!("Structured fact {} in context {}", value, context);
    }
    candidate
}

/// Grandparent text followed by parent text.
fn label_text(fact: &ElementRef<'_>) -> String {
    let parent = fact.parent().and_then(ElementRef::wrap);
    let grandparent = parent
        .as_ref()
        .and_then(|p| p.parent())
        .and_then(ElementRef::wrap);

    let parent_text = parent.map(|p| p.text().collect::<String>()).unwrap_or_default();
    let grandparent_text = grandparent
        .map(|g| g.text().collect::<String>())
        .unwrap_or_default();

    format!("{} {}", grandparent_text, parent_text).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::fake::filing;

    fn scan_html(body: &str) -> Option<Candidate> {
        let raw = format!("<html><body>{}</body></html>", body);
        scan(&Document::parse(filing(), &raw))
    }

    #[test]
    fn test_current_occupancy_fact() {
        let candidate = scan_html(
            r#"<table><tr><td>Occupancy rate</td>
            <td><ix:nonFraction contextRef="c-current_2024" name="reit:OccupancyRate">92.5</ix:nonFraction>%</td></tr></table>"#,
        )
        .unwrap();
        assert_eq!(candidate.value(), 92.5);
        assert_eq!(candidate.strategy, Strategy::Structured);
        assert!(candidate.context.contains("Occupancy rate"));
    }

    #[test]
    fn test_prior_period_context_is_ignored() {
        let candidate = scan_html(
            r#"<p>Percent leased <ix:nonFraction contextRef="FY2022" name="x">91.0</ix:nonFraction></p>"#,
        );
        assert!(candidate.is_none());
    }

    #[test]
    fn test_unrelated_label_is_ignored() {
        let candidate = scan_html(
            r#"<div><p>Gross margin <ix:nonFraction contextRef="AsOf2024" name="x">72.1</ix:nonFraction></p></div>"#,
        );
        assert!(candidate.is_none());
    }

    #[test]
    fn test_out_of_range_and_non_numeric_facts_are_skipped() {
        let candidate = scan_html(
            r#"<div><p>Leased <ix:nonFraction contextRef="AsOf2024" name="a">1,250</ix:nonFraction></p>
            <p>Leased <ix:nonFraction contextRef="AsOf2024" name="b">n/a</ix:nonFraction></p>
            <p>Portfolio leased <ix:nonFraction contextRef="AsOf2024" name="c">97.3</ix:nonFraction></p></div>"#,
        )
        .unwrap();
        assert_eq!(candidate.value(), 97.3);
    }
}
