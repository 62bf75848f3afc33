use scraper::{ElementRef, Html, Node};

use super::text::{normalize_text, repair_decimals};
use crate::edgar::filing::FilingRef;

/// One parsed filing document. Built once per evaluation and dropped after.
///
/// `Html` is not `Send`, so a `Document` must be built and consumed within
/// synchronous code.
pub struct Document {
    pub filing: FilingRef,
    html: Html,
    text: String,
    repaired_text: String,
}

impl Document {
    pub fn parse(filing: FilingRef, raw: &str) -> Self {
        let html = Html::parse_document(raw);
        let text = normalize_text(&flatten(&html));
        let repaired_text = repair_decimals(&text);
        Self {
            filing,
            html,
            text,
            repaired_text,
        }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Whitespace-collapsed visible text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// `text()` with numbers split across markup nodes joined back together.
    pub fn repaired_text(&self) -> &str {
        &self.repaired_text
    }
}

/// Every text node outside `<script>`/`<style>`, space separated.
fn flatten(html: &Html) -> String {
    let mut parts = Vec::new();
    for node in html.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|p| p.value().as_element().map(|e| e.name()))
            .is_some_and(|name| name == "script" || name == "style");
        if !hidden {
            parts.push(&**text);
        }
    }
    parts.join(" ")
}

/// Trimmed text nodes of `element` joined by a single space.
pub fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
