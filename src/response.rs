use serde::Serialize;

use crate::extract::ExtractionResult;

/// Body returned to callers for a found rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupancyResponse {
    pub ticker: String,
    pub occupancy_rate: f64,
    pub source: String,
    pub context: String,
    pub filing_url: String,
}

/// Body returned when no rate could be produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub ticker: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Found(OccupancyResponse),
    NotFound(ErrorResponse),
}

impl Response {
    pub fn new(ticker: &str, result: &ExtractionResult) -> Self {
        let ticker = ticker.trim().to_uppercase();
        match result {
            ExtractionResult::Success {
                value,
                source,
                context,
                filing_url,
            } => Response::Found(OccupancyResponse {
                ticker,
                occupancy_rate: *value,
                source: source.clone(),
                context: context.clone(),
                filing_url: filing_url.clone(),
            }),
            ExtractionResult::Failure { reason } => Response::NotFound(ErrorResponse {
                error: reason.to_string(),
                ticker,
            }),
        }
    }

    /// HTTP-style status a transport layer would use.
    pub fn status(&self) -> u16 {
        match self {
            Response::Found(_) => 200,
            Response::NotFound(_) => 404,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::FailureReason;

    #[test]
    fn test_success_body() {
        let result = ExtractionResult::Success {
            value: 94.2,
            source: "pattern (10-Q)".to_string(),
            context: "Same store portfolio was 94.2% leased.".to_string(),
            filing_url: "https://example.test/doc.htm".to_string(),
        };
        let response = Response::new("frt", &result);
        assert_eq!(response.status(), 200);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["ticker"], "FRT");
        assert_eq!(json["occupancy_rate"], 94.2);
        assert_eq!(json["source"], "pattern (10-Q)");
    }

    #[test]
    fn test_failure_body() {
        let result = ExtractionResult::failure(FailureReason::IdentifierNotFound);
        let response = Response::new("zzzz", &result);
        assert_eq!(response.status(), 404);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"error": "Ticker not found", "ticker": "ZZZZ"}));
    }
}
