//! Multi-strategy occupancy extraction.
//!
//! Each filing document is run through an ordered list of [`Strategy`]s and
//! the first one to produce an in-range [`Candidate`] decides the document.
//! Documents are tried newest first until one succeeds.

pub mod consensus;
pub mod controller;
pub mod document;
pub mod patterns;
pub mod proximity;
pub mod structured;
pub mod summary;
pub mod tabular;
pub mod text;
pub mod types;

pub use controller::{
    evaluate_document, evaluate_markup, extract_from_file, run_strategy, OccupancyExtractor,
};
pub use document::Document;
pub use types::{Candidate, ExtractionResult, FailureReason, Strategy};
