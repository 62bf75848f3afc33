use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use super::document::Document;
use super::types::{Candidate, ExtractionResult, FailureReason, Strategy};
use super::{consensus, patterns, proximity, structured, summary, tabular};
use crate::core::{CompanyResolver, DocumentFetcher, ExtractorConfig, FilingCatalog};
use crate::edgar::filing::FilingRef;
use crate::edgar::report::ReportType;
use crate::edgar::tickers::{Cik, Ticker};

pub const DEFAULT_MAX_FILINGS: usize = 3;

/// Runs a single strategy against a parsed document.
pub fn run_strategy(strategy: Strategy, doc: &Document) -> Option<Candidate> {
    match strategy {
        Strategy::Structured => structured::scan(doc),
        Strategy::Consensus => {
            let mut values = tabular::scan(doc);
            if let Some(m) = proximity::scan(doc.text()) {
                values.push(m.value);
            }
            consensus::consensus_candidate(&values)
        }
        Strategy::PortfolioSummary => summary::scan(doc.repaired_text()),
        Strategy::Pattern => patterns::scan(doc.repaired_text()),
    }
}

/// First candidate produced by `strategies`, tried in order.
pub fn evaluate_document(doc: &Document, strategies: &[Strategy]) -> Option<Candidate> {
    strategies.iter().find_map(|&strategy| {
        let candidate = run_strategy(strategy, doc);
        match &candidate {
            Some(c) => log::debug!("{} yielded {} for {}", strategy, c.value(), doc.filing.url),
            None => log::debug!("{} yielded nothing for {}", strategy, doc.filing.url),
        }
        candidate
    })
}

/// Parses `raw` and evaluates it. Kept synchronous: the DOM never crosses an
/// `.await`.
pub fn evaluate_markup(
    filing: &FilingRef,
    raw: &str,
    strategies: &[Strategy],
) -> Option<ExtractionResult> {
    let doc = Document::parse(filing.clone(), raw);
    evaluate_document(&doc, strategies).map(|c| ExtractionResult::success(c, filing))
}

/// Evaluates a filing saved on disk, e.g. one downloaded by hand.
pub fn extract_from_file(
    path: &Path,
    form: ReportType,
    strategies: &[Strategy],
) -> Result<ExtractionResult> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read filing {}", path.display()))?;
    let filing = FilingRef {
        cik: String::new(),
        form,
        accession_number: String::new(),
        url: format!("file://{}", path.display()),
    };
    Ok(evaluate_markup(&filing, &raw, strategies)
        .unwrap_or_else(|| ExtractionResult::failure(FailureReason::NoQualifyingCandidate)))
}

/// Ties the collaborators to the strategy list.
pub struct OccupancyExtractor {
    resolver: Arc<dyn CompanyResolver>,
    catalog: Arc<dyn FilingCatalog>,
    fetcher: Arc<dyn DocumentFetcher>,
    strategies: Vec<Strategy>,
    max_filings: usize,
}

impl OccupancyExtractor {
    pub fn new(
        resolver: Arc<dyn CompanyResolver>,
        catalog: Arc<dyn FilingCatalog>,
        fetcher: Arc<dyn DocumentFetcher>,
    ) -> Self {
        Self {
            resolver,
            catalog,
            fetcher,
            strategies: Strategy::ordered(false),
            max_filings: DEFAULT_MAX_FILINGS,
        }
    }

    /// One backend serving as resolver, catalog and fetcher.
    pub fn from_backend<B>(backend: Arc<B>, config: &ExtractorConfig) -> Self
    where
        B: CompanyResolver + FilingCatalog + DocumentFetcher + 'static,
    {
        Self::new(backend.clone(), backend.clone(), backend)
            .with_strategies(Strategy::ordered(config.summary_scan))
            .with_max_filings(config.max_filings)
    }

    pub fn with_strategies(mut self, strategies: Vec<Strategy>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn with_max_filings(mut self, max_filings: usize) -> Self {
        self.max_filings = max_filings;
        self
    }

    pub async fn extract_occupancy(&self, ticker: &str) -> ExtractionResult {
        let ticker = match Ticker::new(ticker.to_string()) {
            Ok(t) => t,
            Err(e) => {
                log::debug!("Rejected ticker {:?}: {}", ticker, e);
                return ExtractionResult::failure(FailureReason::IdentifierNotFound);
            }
        };

        let cik = match self.resolver.resolve(&ticker).await {
            Ok(Some(cik)) => cik,
            Ok(None) => {
                log::info!("Ticker {} not found", ticker);
                return ExtractionResult::failure(FailureReason::IdentifierNotFound);
            }
            Err(e) => {
                log::error!("Ticker lookup failed for {}: {:#}", ticker, e);
                return ExtractionResult::failure(FailureReason::CatalogUnavailable(e.to_string()));
            }
        };

        self.extract_for_cik(&cik).await
    }

    pub async fn extract_for_cik(&self, cik: &Cik) -> ExtractionResult {
        let filings = match self.catalog.recent_filings(cik, self.max_filings).await {
            Ok(filings) => filings,
            Err(e) => {
                log::error!("Filing catalog failed for CIK {}: {:#}", cik, e);
                return ExtractionResult::failure(FailureReason::CatalogUnavailable(e.to_string()));
            }
        };
        if filings.is_empty() {
            return ExtractionResult::failure(FailureReason::NoFilings);
        }

        self.extract_from_filings(&filings).await
    }

    /// Walks `filings` in the given order (newest first), at most
    /// `max_filings` of them, and returns the first document-level success.
    pub async fn extract_from_filings(&self, filings: &[FilingRef]) -> ExtractionResult {
        for filing in filings.iter().take(self.max_filings) {
            let raw = match self.fetcher.fetch(filing).await {
                Ok(raw) => raw,
                Err(e) => {
                    log::warn!("Skipping {} ({}): {:#}", filing.url, filing.form, e);
                    continue;
                }
            };

            if let Some(result) = evaluate_markup(filing, &raw, &self.strategies) {
                log::info!("Occupancy found in {} {}", filing.form, filing.url);
                return result;
            }
        }

        ExtractionResult::failure(FailureReason::NoQualifyingCandidate)
    }
}
