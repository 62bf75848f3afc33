use anyhow::{anyhow, Result};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "software@example.com";

#[derive(Clone, Debug)]
pub struct ExtractorConfig {
    pub user_agent: String,
    pub max_filings: usize,
    pub fetch_timeout: Duration,
    pub catalog_timeout: Duration,
    pub cache_ttl: Duration,
    pub summary_scan: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_filings: 3,
            fetch_timeout: Duration::from_secs(20),
            catalog_timeout: Duration::from_secs(15),
            cache_ttl: Duration::from_secs(3600),
            summary_scan: false,
        }
    }
}

impl ExtractorConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let user_agent =
            std::env::var("SEC_USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());

        let max_filings = env_or("OCCUPANCY_MAX_FILINGS", defaults.max_filings)?;
        if max_filings == 0 {
            return Err(anyhow!("OCCUPANCY_MAX_FILINGS must be at least 1"));
        }

        let fetch_timeout = Duration::from_secs(env_or(
            "OCCUPANCY_FETCH_TIMEOUT_SECS",
            defaults.fetch_timeout.as_secs(),
        )?);
        let cache_ttl = Duration::from_secs(env_or(
            "OCCUPANCY_CACHE_TTL_SECS",
            defaults.cache_ttl.as_secs(),
        )?);
        let summary_scan = env_or("OCCUPANCY_SUMMARY_SCAN", defaults.summary_scan)?;

        Ok(Self {
            user_agent,
            max_filings,
            fetch_timeout,
            catalog_timeout: defaults.catalog_timeout,
            cache_ttl,
            summary_scan,
        })
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow!("{} has an invalid value: {}", key, raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_falls_back_when_unset() {
        let value: usize = env_or("OCCUPANCY_TEST_UNSET_KEY", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_env_or_rejects_garbage() {
        std::env::set_var("OCCUPANCY_TEST_GARBAGE_KEY", "three");
        assert!(env_or::<usize>("OCCUPANCY_TEST_GARBAGE_KEY", 3).is_err());
        std::env::remove_var("OCCUPANCY_TEST_GARBAGE_KEY");
    }
}
