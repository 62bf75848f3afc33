use anyhow::Result;
use futures::future::join_all;
use occupancy::{
    core::config::ExtractorConfig,
    edgar::{report::ReportType, EdgarClient},
    extract::{self, ExtractionResult, OccupancyExtractor, Strategy},
    response::Response,
};
use std::path::PathBuf;
use std::sync::Arc;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "occupancy-cli",
    about = "Extract portfolio occupancy rates from recent SEC filings"
)]
struct Opt {
    /// Ticker symbols to look up
    tickers: Vec<String>,

    /// Evaluate a filing saved on disk instead of querying EDGAR
    #[structopt(long, parse(from_os_str), conflicts_with = "tickers")]
    file: Option<PathBuf>,

    /// Form type reported for --file
    #[structopt(long, default_value = "10-Q")]
    form: String,
}

fn print_response(ticker: &str, result: &ExtractionResult) -> Result<()> {
    let response = Response::new(ticker, result);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let opt = Opt::from_args();
    let config = ExtractorConfig::from_env()?;

    if let Some(path) = opt.file {
        let form: ReportType = opt.form.parse().map_err(anyhow::Error::msg)?;
        if !form.is_periodic() {
            anyhow::bail!("--form must be one of: {}", ReportType::list_types());
        }
        let strategies = Strategy::ordered(config.summary_scan);
        let result = extract::extract_from_file(&path, form, &strategies)?;
        let label = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        print_response(&label, &result)?;
        if !result.is_success() {
            std::process::exit(1);
        }
        return Ok(());
    }

    if opt.tickers.is_empty() {
        eprintln!("Provide at least one ticker or --file <path>");
        std::process::exit(2);
    }

    let client = Arc::new(EdgarClient::new(config.clone())?);
    let extractor = OccupancyExtractor::from_backend(client, &config);

    // Requests are independent; run them side by side.
    let results = join_all(
        opt.tickers
            .iter()
            .map(|ticker| extractor.extract_occupancy(ticker)),
    )
    .await;

    let mut all_found = true;
    for (ticker, result) in opt.tickers.iter().zip(&results) {
        print_response(ticker, result)?;
        all_found &= result.is_success();
    }

    if !all_found {
        std::process::exit(1);
    }
    Ok(())
}
