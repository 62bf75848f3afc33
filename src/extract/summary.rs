use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{Candidate, Strategy};

// Portfolio summary tables report near-full occupancy; lower values there are
// usually segment or lease-expiry columns.
const SUMMARY_MIN: f64 = 90.0;
const SUMMARY_MAX: f64 = 100.0;

static PERCENT_LEASED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:percent|percentage)\s+leased.*?(\d+\.?\d*)\s*(?:%|percent)")
        .expect("valid regex")
});

/// First "percent leased ... N%" figure in the [90, 100] band of the
/// decimal-repaired text.
pub fn scan(text: &str) -> Option<Candidate> {
    PERCENT_LEASED_RE
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse::<f64>().ok())
        .find(|v| (SUMMARY_MIN..=SUMMARY_MAX).contains(v))
        .and_then(|value| {
            let context = format!("Percent leased: {:.1}% (from portfolio summary)", value);
            Candidate::new(value, Strategy::PortfolioSummary, context)
        })
}
