use anyhow::Result;
use async_trait::async_trait;

use crate::edgar::filing::FilingRef;
use crate::edgar::tickers::{Cik, Ticker};

/// Maps a ticker symbol to the company's CIK.
#[async_trait]
pub trait CompanyResolver: Send + Sync {
    /// `Ok(None)` means the lookup worked but the ticker is unknown.
    async fn resolve(&self, ticker: &Ticker) -> Result<Option<Cik>>;
}

/// Lists a company's most recent periodic filings, newest first.
#[async_trait]
pub trait FilingCatalog: Send + Sync {
    async fn recent_filings(&self, cik: &Cik, limit: usize) -> Result<Vec<FilingRef>>;
}

/// Retrieves the raw markup of one filing document.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, filing: &FilingRef) -> Result<String>;
}
