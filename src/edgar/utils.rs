use anyhow::{anyhow, Result};
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::utils::rate_limit::RateLimiter;

/// GETs `url` and returns the body as text. Non-2xx responses are errors.
pub async fn fetch_text(
    client: &Client,
    url: &Url,
    user_agent: &str,
    timeout: Duration,
    rate_limiter: &RateLimiter,
) -> Result<String> {
    let _permit = rate_limiter.acquire().await?;
    log::debug!("Fetching URL: {}", url);

    let response = client
        .get(url.as_str())
        .header(reqwest::header::USER_AGENT, user_agent)
        .header(reqwest::header::ACCEPT_ENCODING, "gzip, deflate")
        .timeout(timeout)
        .send()
        .await?;

    log::debug!("Response status: {}", response.status());

    if !response.status().is_success() {
        return Err(anyhow!(
            "HTTP request to {} failed with status: {}",
            url,
            response.status()
        ));
    }

    let content = response.text().await?;
    log::debug!("Received content length: {}", content.len());
    Ok(content)
}
