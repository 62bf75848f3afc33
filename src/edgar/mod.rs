pub mod filing;
pub mod report;
pub mod tickers;
pub mod utils;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use url::Url;

use crate::core::{CompanyResolver, DocumentFetcher, ExtractorConfig, FilingCatalog, TtlCache};
use crate::utils::rate_limit::RateLimiter;
use filing::FilingRef;
use tickers::{Cik, Ticker, TickerMap};

/// EDGAR-backed implementation of the resolver, catalog and fetcher.
pub struct EdgarClient {
    client: Client,
    config: ExtractorConfig,
    tickers: TtlCache<(), Arc<TickerMap>>,
    rate_limiter: &'static RateLimiter,
}

impl EdgarClient {
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        let client = Client::builder()
            .gzip(true)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            tickers: TtlCache::with_system_clock(config.cache_ttl),
            config,
            rate_limiter: RateLimiter::edgar(),
        })
    }

    async fn get(&self, url: &Url, timeout: std::time::Duration) -> Result<String> {
        utils::fetch_text(
            &self.client,
            url,
            &self.config.user_agent,
            timeout,
            self.rate_limiter,
        )
        .await
    }

    async fn ticker_map(&self) -> Result<Arc<TickerMap>> {
        self.tickers
            .get_or_try_load((), move || async move {
                log::debug!("Fetching tickers from SEC");
                let url = Url::parse(tickers::TICKER_URL)?;
                let body = self.get(&url, self.config.catalog_timeout).await?;
                Ok::<_, anyhow::Error>(Arc::new(tickers::parse_ticker_table(&body)?))
            })
            .await
    }
}

#[async_trait]
impl CompanyResolver for EdgarClient {
    async fn resolve(&self, ticker: &Ticker) -> Result<Option<Cik>> {
        let map = self.ticker_map().await?;
        Ok(map.get(ticker).cloned())
    }
}

#[async_trait]
impl FilingCatalog for EdgarClient {
    async fn recent_filings(&self, cik: &Cik, limit: usize) -> Result<Vec<FilingRef>> {
        let url = Url::parse(&filing::submissions_url(cik))?;
        log::info!("Fetching company filings from {}", url);
        let body = self.get(&url, self.config.catalog_timeout).await?;
        let filings = filing::parse_company_filings(&body)?;
        filing::recent_periodic_filings(&filings, cik, limit)
    }
}

#[async_trait]
impl DocumentFetcher for EdgarClient {
    async fn fetch(&self, filing: &FilingRef) -> Result<String> {
        let url = Url::parse(&filing.url)?;
        self.get(&url, self.config.fetch_timeout).await
    }
}
