use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;
use unicode_normalization::UnicodeNormalization;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static SPLIT_PERCENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*\.\s*(\d+)\s*(%)").expect("valid regex"));
static SPLIT_DECIMAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*\.\s*(\d+)").expect("valid regex"));

/// NFKC-normalizes and collapses every whitespace run to a single space.
pub fn normalize_text(text: &str) -> String {
    let text = text.nfkc().collect::<String>();
    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}

/// Re-joins numbers that markup split apart, e.g. `94 . 2 %` -> `94.2%`.
pub fn repair_decimals(text: &str) -> String {
    let text = SPLIT_PERCENT_RE.replace_all(text, "${1}.${2}${3}");
    SPLIT_DECIMAL_RE.replace_all(&text, "${1}.${2}").into_owned()
}

/// Byte ranges of the sentences in `text`. A sentence ends at `.`, `?` or
/// `!` followed by whitespace (or end of text), so decimals like `94.2` stay
/// inside their sentence. Terminators are excluded from the ranges.
pub fn sentence_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '?' | '!') {
            continue;
        }
        let at_boundary = match chars.peek() {
            Some((_, next)) => next.is_whitespace(),
            None => true,
        };
        if at_boundary {
            spans.push(start..i);
            start = i + c.len_utf8();
        }
    }
    if start < text.len() {
        spans.push(start..text.len());
    }
    spans
}

/// The range reaching `radius` characters either side of the byte range
/// `start..end`.
pub fn window_bounds(text: &str, start: usize, end: usize, radius: usize) -> Range<usize> {
    let lo = text[..start]
        .char_indices()
        .rev()
        .take(radius)
        .last()
        .map_or(start, |(i, _)| i);
    let hi = text[end..]
        .char_indices()
        .nth(radius)
        .map_or(text.len(), |(i, _)| end + i);
    lo..hi
}

/// Character offsets for ascending byte offsets into `text`.
pub fn char_offsets(text: &str, byte_offsets: impl IntoIterator<Item = usize>) -> Vec<usize> {
    let mut chars = 0;
    let mut last = 0;
    byte_offsets
        .into_iter()
        .map(|offset| {
            chars += text[last..offset].chars().count();
            last = offset;
            chars
        })
        .collect()
}

/// Whitespace-collapsed text capped at `max_chars`, for human-readable context.
pub fn snippet(text: &str, max_chars: usize) -> String {
    let collapsed = WHITESPACE_RE.replace_all(text, " ");
    let collapsed = collapsed.trim();
    if collapsed.chars().count() <= max_chars {
        return collapsed.to_string();
    }
    let mut cut: String = collapsed.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}
