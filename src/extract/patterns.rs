//! Phrase-pattern scanner for occupancy figures stated in prose.
//!
//! The library is plain data: an ordered list of [`PatternRule`]s whose first
//! capture group is the percentage, a list of disqualifying terms that mark a
//! sentence as a definition or policy threshold rather than a reported fact,
//! and a table of [`SignalWeight`]s used to rank surviving candidates.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use super::text::{sentence_spans, window_bounds};
use super::types::{in_range, Candidate, Strategy};

#[derive(Debug, Clone, Copy)]
pub struct PatternRule {
    pub name: &'static str,
    pub pattern: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct SignalWeight {
    pub phrases: &'static [&'static str],
    pub weight: i32,
}

/// Matched case-insensitively, in this order.
pub const PATTERN_RULES: &[PatternRule] = &[
    PatternRule {
        name: "decreased-to",
        pattern: r"decreased\s+(?:approximately\s+)?\d+\.?\d*%\s+to\s+(\d+\.?\d*)%",
    },
    PatternRule {
        name: "increased-to",
        pattern: r"increased\s+(?:approximately\s+)?\d+\.?\d*%\s+to\s+(\d+\.?\d*)%",
    },
    PatternRule {
        name: "percent-leased",
        pattern: r"percent\s+leased\s*(?:was|is|remained|stood)?\s*[:\-]?\s*(\d+\.?\d*)%",
    },
    PatternRule {
        name: "percentage-leased",
        pattern: r"percentage\s+leased\s*(?:was|is|remained|stood)?\s*[:\-]?\s*(\d+\.?\d*)%",
    },
    PatternRule {
        name: "properties-leased",
        pattern: r"properties.*?leased.*?(\d+\.?\d*)%",
    },
    PatternRule {
        name: "leased-was",
        pattern: r"leased\s*(?:was|is|stood)?\s*[:\-]?\s*(\d+\.?\d*)%",
    },
    PatternRule {
        name: "occupancy-was",
        pattern: r"occupancy\s*(?:was|is|stood|remained)?\s*[:\-]?\s*(\d+\.?\d*)%",
    },
    PatternRule {
        name: "portfolio-was",
        pattern: r"portfolio\s+(?:was|is)\s+(\d+\.?\d*)%\s+(?:leased|occupied)",
    },
    PatternRule {
        name: "pct-leased",
        pattern: r"(\d+\.?\d*)%\s+(?:leased|occupied)",
    },
    PatternRule {
        name: "pct-of-portfolio",
        pattern: r"(\d+\.?\d*)%\s+of\s+our\s+(?:properties|portfolio)",
    },
    PatternRule {
        name: "same-store",
        pattern: r"same\s*store[^.?!]{0,1000}\b(\d+\.?\d*)%",
    },
];

pub const DISQUALIFYING_TERMS: &[&str] = &[
    "definition",
    "means",
    "defined as",
    "earlier of",
    "achieving",
    "stabilization",
    "threshold",
    "minimum",
    "target",
    "expense",
    "rent",
    "cash basis",
];

pub const SIGNAL_WEIGHTS: &[SignalWeight] = &[
    SignalWeight {
        phrases: &["same store"],
        weight: 10,
    },
    SignalWeight {
        phrases: &["portfolio"],
        weight: 5,
    },
    SignalWeight {
        phrases: &["as of", "ended"],
        weight: 8,
    },
    SignalWeight {
        phrases: &["leased", "occupancy"],
        weight: 5,
    },
    SignalWeight {
        phrases: &["decreased", "increased"],
        weight: 3,
    },
    SignalWeight {
        phrases: &["percent leased"],
        weight: 7,
    },
];

/// Characters of context taken either side of a match.
pub const CONTEXT_RADIUS: usize = 1000;
/// A context sentence must be longer than this to be chosen over the fallback.
pub const MIN_SENTENCE_CHARS: usize = 50;
pub const SENTENCE_KEYWORDS: &[&str] = &["occupancy", "leased", "portfolio"];

// The same-store rule's bounded span needs more room than the default.
const REGEX_SIZE_LIMIT: usize = 64 * (1 << 20);

struct CompiledRule {
    name: &'static str,
    regex: Regex,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatternCandidate {
    pub rule: &'static str,
    pub value: f64,
    pub score: i32,
    pub sentence: String,
}

impl PatternCandidate {
    pub fn into_candidate(self) -> Option<Candidate> {
        Candidate::new(self.value, Strategy::Pattern, self.sentence)
            .map(|c| c.with_score(self.score))
    }

    fn outranks(&self, other: &PatternCandidate) -> bool {
        self.score > other.score || (self.score == other.score && self.value > other.value)
    }
}

pub struct PatternLibrary {
    rules: Vec<CompiledRule>,
    disqualifiers: &'static [&'static str],
    weights: &'static [SignalWeight],
}

static STANDARD: Lazy<PatternLibrary> = Lazy::new(|| {
    PatternLibrary::new(PATTERN_RULES, DISQUALIFYING_TERMS, SIGNAL_WEIGHTS)
        .expect("built-in pattern rules compile")
});

impl PatternLibrary {
    pub fn new(
        rules: &[PatternRule],
        disqualifiers: &'static [&'static str],
        weights: &'static [SignalWeight],
    ) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                let regex = RegexBuilder::new(rule.pattern)
                    .case_insensitive(true)
                    .size_limit(REGEX_SIZE_LIMIT)
                    .build()
                    .with_context(|| format!("Invalid pattern rule {}", rule.name))?;
                Ok(CompiledRule {
                    name: rule.name,
                    regex,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            rules,
            disqualifiers,
            weights,
        })
    }

    pub fn standard() -> &'static PatternLibrary {
        &STANDARD
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.name)
    }

    /// Raw captured values of one rule, before range checks or filtering.
    pub fn rule_values(&self, name: &str, text: &str) -> Vec<f64> {
        self.rules
            .iter()
            .filter(|r| r.name == name)
            .flat_map(|r| r.regex.captures_iter(text))
            .filter_map(|caps| caps[1].parse().ok())
            .collect()
    }

    /// Every in-range, non-disqualified match of every rule, in rule order.
    pub fn candidates(&self, text: &str) -> Vec<PatternCandidate> {
        let mut found = Vec::new();
        for rule in &self.rules {
            for caps in rule.regex.captures_iter(text) {
                let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                let Ok(value) = number.as_str().parse::<f64>() else {
                    continue;
                };
                if !in_range(value) {
                    continue;
                }

                let sentence = context_sentence(text, whole.start(), whole.end());
                if self.is_disqualified(&sentence) {
                    log::debug!("Rule {} dropped {}: disqualified context", rule.name, value);
                    continue;
                }

                found.push(PatternCandidate {
                    rule: rule.name,
                    value,
                    score: self.score(&sentence),
                    sentence,
                });
            }
        }
        found
    }

    pub fn best(&self, text: &str) -> Option<PatternCandidate> {
        select_best(self.candidates(text))
    }

    pub fn is_disqualified(&self, sentence: &str) -> bool {
        let lower = sentence.to_lowercase();
        self.disqualifiers.iter().any(|term| contains_term(&lower, term))
    }

    pub fn score(&self, sentence: &str) -> i32 {
        let lower = sentence.to_lowercase();
        self.weights
            .iter()
            .filter(|w| w.phrases.iter().any(|p| contains_term(&lower, p)))
            .map(|w| w.weight)
            .sum()
    }
}

/// Highest `(score, value)`; the earliest candidate keeps an exact tie.
pub fn select_best(
    candidates: impl IntoIterator<Item = PatternCandidate>,
) -> Option<PatternCandidate> {
    candidates.into_iter().fold(None, |best, c| match best {
        Some(b) if !c.outranks(&b) => Some(b),
        _ => Some(c),
    })
}

pub fn scan(text: &str) -> Option<Candidate> {
    let best = PatternLibrary::standard().best(text)?;
    log::debug!(
        "Pattern rule {} chose {} (score {})",
        best.rule,
        best.value,
        best.score
    );
    best.into_candidate()
}

/// Picks the sentence that justifies a match: the first sentence of the
/// surrounding window that is long enough and mentions occupancy, failing
/// that the window's first sentence.
fn context_sentence(text: &str, start: usize, end: usize) -> String {
    let window = &text[window_bounds(text, start, end, CONTEXT_RADIUS)];
    let sentences: Vec<&str> = sentence_spans(window)
        .into_iter()
        .map(|span| &window[span])
        .collect();

    let qualifies = |s: &str| {
        let lower = s.to_lowercase();
        s.chars().count() > MIN_SENTENCE_CHARS
            && SENTENCE_KEYWORDS.iter().any(|kw| lower.contains(kw))
    };

    let chosen = sentences
        .iter()
        .copied()
        .find(|s| qualifies(*s))
        .or_else(|| sentences.first().copied())
        .unwrap_or("");

    format!("{}.", chosen.trim())
}

/// `term` occurs in `haystack` starting at a word boundary, so "rent" matches
/// "rental" but not "current".
fn contains_term(haystack: &str, term: &str) -> bool {
    haystack.match_indices(term).any(|(i, _)| {
        haystack[..i]
            .chars()
            .next_back()
            .map_or(true, |prev| !prev.is_alphanumeric())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> &'static PatternLibrary {
        PatternLibrary::standard()
    }

    #[test]
    fn test_every_rule_captures_its_phrase() {
        let cases: &[(&str, &str, f64)] = &[
            ("decreased-to", "occupancy decreased 1.2% to 93.4% during", 93.4),
            ("increased-to", "occupancy increased approximately 0.5% to 96.1% at", 96.1),
            ("percent-leased", "Percent leased was 94.0% at quarter end", 94.0),
            ("percentage-leased", "percentage leased: 92.5% overall", 92.5),
            ("properties-leased", "our properties were leased at 97.0% in total", 97.0),
            ("leased-was", "leased stood 95.5% at", 95.5),
            ("occupancy-was", "Occupancy remained 98% for", 98.0),
            ("portfolio-was", "the portfolio was 93.1% occupied", 93.1),
            ("pct-leased", "were 90.2% leased", 90.2),
            ("pct-of-portfolio", "represent 61% of our portfolio", 61.0),
            ("same-store", "same store properties ended the year at 94.8% occupied", 94.8),
        ];

        let names: Vec<_> = library().rule_names().collect();
        assert_eq!(names.len(), cases.len());

        for (rule, text, expected) in cases {
            assert!(names.contains(rule), "unknown rule {}", rule);
            let values = library().rule_values(rule, text);
            assert_eq!(values.first(), Some(expected), "rule {} on {:?}", rule, text);
        }
    }

    #[test]
    fn test_same_store_captures_the_whole_number() {
        let values = library().rule_values("same-store", "Same store NOI rose; same store occupancy hit 95% today");
        assert_eq!(values, vec![95.0]);
    }

    #[test]
    fn test_threshold_sentence_is_never_a_candidate() {
        let text = "A property is considered stabilized upon reaching a stabilization threshold of 90% leased occupancy for the portfolio.";
        assert!(library().candidates(text).iter().all(|c| c.value != 90.0));
        assert!(scan(text).is_none());
    }

    #[test]
    fn test_earlier_rent_sentence_disqualifies_the_window() {
        let text = "Minimum base rent escalations apply to all leased space across our retail centers. \
                    As of June 30, 2024 the portfolio was 95% leased by tenants overall.";
        assert!(library().candidates(text).is_empty());
        assert!(scan(text).is_none());
    }

    #[test]
    fn test_context_is_first_qualifying_sentence_in_window() {
        let text = "Results were stable. The portfolio was 95% leased to tenants as of June 30, 2024 overall. \
                    Same store occupancy stood at 93% across the comparable property pool.";
        let candidates = library().candidates(text);
        assert!(!candidates.is_empty());
        assert!(candidates
            .iter()
            .all(|c| c.sentence.starts_with("The portfolio was 95% leased")));
    }

    #[test]
    fn test_disqualifier_matches_word_starts_only() {
        assert!(library().is_disqualified("Annual base rent per square foot"));
        assert!(library().is_disqualified("rental income rose"));
        assert!(!library().is_disqualified("The current portfolio was 95% leased"));
    }

    #[test]
    fn test_score_sums_signal_weights() {
        let sentence = "Same store portfolio was 94.2% leased as of December 31";
        // same store 10 + portfolio 5 + as of 8 + leased 5
        assert_eq!(library().score(sentence), 28);
        assert_eq!(library().score("nothing relevant"), 0);
        assert_eq!(library().score("Percent leased increased"), 7 + 5 + 3);
    }

    #[test]
    fn test_equal_scores_prefer_the_larger_value() {
        let text = format!(
            "As of June 30, 2024 the Northeast portfolio was 88% leased by tenants. {}\
             As of June 30, 2024 the Southwest portfolio was 91% leased by tenants.",
            "Other matters were routine. ".repeat(40)
        );
        let best = library().best(&text).unwrap();
        assert_eq!(best.value, 91.0);
        assert!(best.sentence.contains("Southwest"));
    }

    #[test]
    fn test_select_best_keeps_the_first_exact_tie() {
        let make = |rule, value, score| PatternCandidate {
            rule,
            value,
            score,
            sentence: String::new(),
        };
        let best = select_best(vec![
            make("a", 91.0, 13),
            make("b", 91.0, 13),
            make("c", 99.0, 5),
        ])
        .unwrap();
        assert_eq!(best.rule, "a");
    }

    #[test]
    fn test_scan_returns_the_justifying_sentence() {
        let text = "Results of operations were stable. Same store portfolio was 94.2% leased as of December 31, 2024. Leasing spreads widened.";
        let candidate = scan(text).unwrap();
        assert_eq!(candidate.value(), 94.2);
        assert_eq!(candidate.strategy, Strategy::Pattern);
        assert!(candidate.context.contains("Same store portfolio was 94.2% leased"));
        assert_eq!(candidate.score, Some(28));
    }

    #[test]
    fn test_out_of_range_values_are_dropped() {
        let text = "As of December 31, 2024 the portfolio was 45% leased to a single anchor tenant group.";
        assert!(library().candidates(text).is_empty());
    }
}
