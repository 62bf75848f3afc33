use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;

pub const TICKER_URL: &str = "https://www.sec.gov/files/company_tickers.json";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ticker(String);

impl Ticker {
    /// Share classes are written `BRK-B` in the SEC table, so `BRK.B` is
    /// accepted and stored with a hyphen.
    pub fn new(ticker: String) -> Result<Self> {
        let uppercase_ticker = ticker.trim().to_uppercase().replace('.', "-");
        if uppercase_ticker.is_empty() {
            return Err(anyhow!("Ticker cannot be empty"));
        }
        if !uppercase_ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(anyhow!(
                "Ticker must contain only alphanumeric characters or hyphens: {}",
                ticker
            ));
        }
        Ok(Ticker(uppercase_ticker))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Central Index Key, stored zero-padded to ten digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cik(String);

impl Cik {
    pub fn new(cik: u64) -> Self {
        Cik(format!("{:010}", cik))
    }

    pub fn padded(&self) -> &str {
        &self.0
    }

    /// Archive paths use the CIK without leading zeros.
    pub fn unpadded(&self) -> &str {
        let trimmed = self.0.trim_start_matches('0');
        if trimmed.is_empty() {
            "0"
        } else {
            trimmed
        }
    }
}

impl std::fmt::Display for Cik {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Deserialize)]
struct TickerEntry {
    cik_str: u64,
    ticker: String,
    #[allow(dead_code)]
    title: String,
}

pub type TickerMap = HashMap<Ticker, Cik>;

/// Parses the SEC `company_tickers.json` table (an object keyed by row index).
pub fn parse_ticker_table(json: &str) -> Result<TickerMap> {
    let rows: HashMap<String, TickerEntry> =
        serde_json::from_str(json).context("Malformed company ticker table")?;
    log::debug!("Found {} ticker entries", rows.len());

    let mut map = TickerMap::with_capacity(rows.len());
    for entry in rows.into_values() {
        match Ticker::new(entry.ticker) {
            Ok(ticker) => {
                map.entry(ticker).or_insert_with(|| Cik::new(entry.cik_str));
            }
            Err(e) => log::debug!("Skipping ticker row: {}", e),
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"{
        "0": {"cik_str": 1045609, "ticker": "PLD", "title": "Prologis, Inc."},
        "1": {"cik_str": 34903, "ticker": "frt", "title": "Federal Realty"},
        "2": {"cik_str": 1, "ticker": "B@D", "title": "Broken"}
    }"#;

    #[test]
    fn test_parse_ticker_table() {
        let map = parse_ticker_table(TABLE).unwrap();
        assert_eq!(map.len(), 2);
        let frt = Ticker::new("FRT".to_string()).unwrap();
        assert_eq!(map[&frt].padded(), "0000034903");
        assert_eq!(map[&frt].unpadded(), "34903");
    }

    #[test]
    fn test_malformed_table_is_an_error() {
        assert!(parse_ticker_table("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_ticker_validation() {
        assert_eq!(Ticker::new(" brk-b ".to_string()).unwrap().as_str(), "BRK-B");
        assert!(Ticker::new("".to_string()).is_err());
        assert!(Ticker::new("A B".to_string()).is_err());
        assert!(Ticker::new("FRT_".to_string()).is_err());
    }

    #[test]
    fn test_share_class_dot_matches_table_hyphen() {
        let map = parse_ticker_table(
            r#"{"0": {"cik_str": 1067983, "ticker": "BRK-B", "title": "Berkshire Hathaway"}}"#,
        )
        .unwrap();
        let dotted = Ticker::new("brk.b".to_string()).unwrap();
        assert_eq!(dotted.as_str(), "BRK-B");
        assert_eq!(map[&dotted].unpadded(), "1067983");
    }
}
