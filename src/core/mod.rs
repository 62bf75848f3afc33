pub mod cache;
pub mod config;
pub mod types;

pub use cache::{Clock, SystemClock, TtlCache};
pub use config::ExtractorConfig;
pub use types::{CompanyResolver, DocumentFetcher, FilingCatalog};
