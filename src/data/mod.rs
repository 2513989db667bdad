//! Data ingestion
//!
//! Table extraction from HTML pages, page fetching, CSV export and the
//! ATP match dataset used for training.

pub mod dataset;
pub mod export;
pub mod extract;
pub mod fetch;
pub mod scrapers;

pub use dataset::AtpMatch;
pub use extract::{RecordBatch, TableRecordExtractor};
pub use fetch::PageFetcher;
