pub mod core;
pub mod edgar;
pub mod extract;
pub mod response;
pub mod utils;

// Re-exports
pub use core::config::ExtractorConfig;
pub use edgar::EdgarClient;
pub use extract::{ExtractionResult, FailureReason, OccupancyExtractor};
