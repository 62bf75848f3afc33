use serde::{Deserialize, Serialize};
use std::fmt;

use crate::edgar::filing::FilingRef;

pub const MIN_PERCENT: f64 = 50.0;
pub const MAX_PERCENT: f64 = 100.0;

/// Occupancy is reported as "mostly to fully occupied"; anything else is noise.
pub fn in_range(value: f64) -> bool {
    (MIN_PERCENT..=MAX_PERCENT).contains(&value)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    Structured,
    Consensus,
    PortfolioSummary,
    Pattern,
}

impl Strategy {
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Structured => "structured",
            Strategy::Consensus => "advanced-consensus",
            Strategy::PortfolioSummary => "table",
            Strategy::Pattern => "pattern",
        }
    }

    /// Evaluation order for one document. The summary scan sits between
    /// consensus and patterns when enabled.
    pub fn ordered(summary_scan: bool) -> Vec<Strategy> {
        let mut strategies = vec![Strategy::Structured, Strategy::Consensus];
        if summary_scan {
            strategies.push(Strategy::PortfolioSummary);
        }
        strategies.push(Strategy::Pattern);
        strategies
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A tentative value from one strategy. Only constructible in range.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    value: f64,
    pub strategy: Strategy,
    pub context: String,
    pub score: Option<i32>,
}

impl Candidate {
    pub fn new(value: f64, strategy: Strategy, context: impl Into<String>) -> Option<Self> {
        if !in_range(value) {
            return None;
        }
        Some(Self {
            value,
            strategy,
            context: context.into(),
            score: None,
        })
    }

    pub fn with_score(mut self, score: i32) -> Self {
        self.score = Some(score);
        self
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum FailureReason {
    #[error("Ticker not found")]
    IdentifierNotFound,
    #[error("Filing catalog unavailable: {0}")]
    CatalogUnavailable(String),
    #[error("No recent filings found")]
    NoFilings,
    #[error("No reliable rate found across recent filings")]
    NoQualifyingCandidate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExtractionResult {
    Success {
        value: f64,
        source: String,
        context: String,
        filing_url: String,
    },
    Failure {
        reason: FailureReason,
    },
}

impl ExtractionResult {
    pub fn success(candidate: Candidate, filing: &FilingRef) -> Self {
        ExtractionResult::Success {
            value: round2(candidate.value),
            source: format!("{} ({})", candidate.strategy.label(), filing.form),
            context: candidate.context,
            filing_url: filing.url.clone(),
        }
    }

    pub fn failure(reason: FailureReason) -> Self {
        ExtractionResult::Failure { reason }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            ExtractionResult::Success { value, .. } => Some(*value),
            ExtractionResult::Failure { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionResult::Success { .. })
    }
}
