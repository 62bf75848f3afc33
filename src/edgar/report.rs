use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use strum::{EnumIter, IntoEnumIterator};

/// Form types that can carry a portfolio occupancy figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter)]
#[serde(try_from = "String", into = "String")]
pub enum ReportType {
    Form10Q,
    Form10K,
    Other(String),
}

impl TryFrom<String> for ReportType {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        ReportType::from_str(&s)
    }
}

impl From<ReportType> for String {
    fn from(r: ReportType) -> String {
        r.to_string()
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportType::Form10Q => write!(f, "10-Q"),
            ReportType::Form10K => write!(f, "10-K"),
            ReportType::Other(s) => write!(f, "{}", s),
        }
    }
}

pub static REPORT_TYPES: Lazy<String> = Lazy::new(|| {
    ReportType::iter()
        .filter(ReportType::is_periodic)
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ")
});

impl ReportType {
    pub fn list_types() -> &'static str {
        &REPORT_TYPES
    }

    /// Quarterly and annual reports; everything else is skipped by the catalog.
    pub fn is_periodic(&self) -> bool {
        matches!(self, ReportType::Form10Q | ReportType::Form10K)
    }
}

impl FromStr for ReportType {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<ReportType, std::string::String> {
        match s.trim().to_uppercase().as_str() {
            "10-Q" => Ok(ReportType::Form10Q),
            "10-K" => Ok(ReportType::Form10K),
            _ => Ok(ReportType::Other(s.to_string())),
        }
    }
}
