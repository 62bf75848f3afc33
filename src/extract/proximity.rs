use once_cell::sync::Lazy;
use regex::Regex;

use super::text::char_offsets;
use super::types::in_range;

/// Maximum keyword-to-value distance, in characters of flattened text.
pub const MAX_DISTANCE: usize = 300;

static LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)occupancy|leased|percent").expect("valid regex"));
static VALUE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+\.?\d*)%").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityMatch {
    pub value: f64,
    pub distance: usize,
}

/// The in-range `N%` token closest to any occupancy keyword, if one lies
/// within `MAX_DISTANCE`. Exact ties go to the earlier keyword, then the
/// earlier value.
pub fn scan(text: &str) -> Option<ProximityMatch> {
    let labels = char_offsets(text, LABEL_RE.find_iter(text).map(|m| m.start()));
    let (value_starts, parsed): (Vec<usize>, Vec<f64>) = VALUE_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let start = caps.get(0)?.start();
            let value = caps[1].parse::<f64>().ok()?;
            in_range(value).then_some((start, value))
        })
        .unzip();
    let values: Vec<(usize, f64)> = char_offsets(text, value_starts)
        .into_iter()
        .zip(parsed)
        .collect();

    let mut best: Option<ProximityMatch> = None;
    for label in labels {
        let Some((distance, value)) = nearest(&values, label) else {
            continue;
        };
        if distance >= MAX_DISTANCE {
            continue;
        }
        if best.map_or(true, |b| distance < b.distance) {
            best = Some(ProximityMatch { value, distance });
        }
    }
    best
}

/// Closest entry of `values` (sorted by offset) to `offset`; the lower offset
/// wins a tie.
fn nearest(values: &[(usize, f64)], offset: usize) -> Option<(usize, f64)> {
    let idx = values.partition_point(|(pos, _)| *pos < offset);
    let before = idx
        .checked_sub(1)
        .map(|i| (offset - values[i].0, values[i].1));
    let after = values.get(idx).map(|(pos, v)| (pos - offset, *v));

    match (before, after) {
        (Some(b), Some(a)) => Some(if a.0 < b.0 { a } else { b }),
        (b, a) => b.or(a),
    }
}
