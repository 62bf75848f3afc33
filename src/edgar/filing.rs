use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use super::report::ReportType;
use super::tickers::Cik;

pub const EDGAR_DATA_URL: &str = "https://data.sec.gov";
pub const EDGAR_ARCHIVES_URL: &str = "https://www.sec.gov/Archives/edgar/data";

/// The columns of `filings.recent` that locate a primary document.
#[derive(Debug, Serialize, Deserialize)]
pub struct FilingEntry {
    #[serde(rename = "accessionNumber")]
    pub accession_number: Vec<String>,
    #[serde(rename = "form")]
    pub report_type: Vec<ReportType>,
    #[serde(rename = "primaryDocument")]
    pub primary_document: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilingsData {
    pub recent: FilingEntry,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompanyFilings {
    pub cik: String,
    #[serde(default)]
    pub name: String,
    pub filings: FilingsData,
}

/// One candidate document handed to the extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilingRef {
    pub cik: String,
    pub form: ReportType,
    pub accession_number: String,
    pub url: String,
}

pub fn submissions_url(cik: &Cik) -> String {
    format!("{}/submissions/CIK{}.json", EDGAR_DATA_URL, cik.padded())
}

pub fn document_url(cik: &Cik, accession_number: &str, primary_document: &str) -> Result<Url> {
    let accession = accession_number.replace('-', "");
    let url = format!(
        "{}/{}/{}/{}",
        EDGAR_ARCHIVES_URL,
        cik.unpadded(),
        accession,
        primary_document
    );
    Ok(Url::parse(&url)?)
}

pub fn parse_company_filings(json: &str) -> Result<CompanyFilings> {
    serde_json::from_str(json).context("Failed to parse submissions JSON")
}

/// Picks the newest periodic reports, preserving the order EDGAR lists them in
/// (newest first).
pub fn recent_periodic_filings(
    filings: &CompanyFilings,
    cik: &Cik,
    limit: usize,
) -> Result<Vec<FilingRef>> {
    let recent = &filings.filings.recent;
    let rows = recent.report_type.len();
    if recent.accession_number.len() != rows || recent.primary_document.len() != rows {
        return Err(anyhow!(
            "Submissions columns have mismatched lengths ({} forms, {} accessions, {} documents)",
            rows,
            recent.accession_number.len(),
            recent.primary_document.len()
        ));
    }

    let mut selected = Vec::new();
    for i in 0..rows {
        if selected.len() >= limit {
            break;
        }
        let form = &recent.report_type[i];
        if !form.is_periodic() {
            continue;
        }
        let url = document_url(cik, &recent.accession_number[i], &recent.primary_document[i])?;
        selected.push(FilingRef {
            cik: cik.padded().to_string(),
            form: form.clone(),
            accession_number: recent.accession_number[i].clone(),
            url: url.to_string(),
        });
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBMISSIONS: &str = r#"{
        "cik": "0000034903",
        "name": "FEDERAL REALTY",
        "filings": {
            "recent": {
                "accessionNumber": ["0000034903-24-000050", "0000034903-24-000041", "0000034903-24-000032", "0000034903-24-000020", "0000034903-24-000011"],
                "form": ["8-K", "10-Q", "10-K/A", "10-K", "10-Q"],
                "primaryDocument": ["ex99.htm", "frt-20240630.htm", "amend.htm", "frt-20231231.htm", "frt-20230930.htm"]
            }
        }
    }"#;

    #[test]
    fn test_recent_periodic_filings_in_order() {
        let filings = parse_company_filings(SUBMISSIONS).unwrap();
        let cik = Cik::new(34903);
        let refs = recent_periodic_filings(&filings, &cik, 3).unwrap();

        assert_eq!(refs.len(), 3);
        assert_eq!(refs[0].form, ReportType::Form10Q);
        assert_eq!(
            refs[0].url,
            "https://www.sec.gov/Archives/edgar/data/34903/000003490324000041/frt-20240630.htm"
        );
        assert_eq!(refs[1].form, ReportType::Form10K);
        assert_eq!(refs[2].accession_number, "0000034903-24-000011");
    }

    #[test]
    fn test_limit_is_respected() {
        let filings = parse_company_filings(SUBMISSIONS).unwrap();
        let refs = recent_periodic_filings(&filings, &Cik::new(34903), 1).unwrap();
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn test_mismatched_columns_are_malformed() {
        let json = r#"{"cik": "1", "filings": {"recent": {
            "accessionNumber": ["a"], "form": ["10-Q", "10-K"], "primaryDocument": ["x.htm"]
        }}}"#;
        let filings = parse_company_filings(json).unwrap();
        assert!(recent_periodic_filings(&filings, &Cik::new(1), 3).is_err());
    }

    #[test]
    fn test_submissions_url_is_padded() {
        assert_eq!(
            submissions_url(&Cik::new(34903)),
            "https://data.sec.gov/submissions/CIK0000034903.json"
        );
    }
}
