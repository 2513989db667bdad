//! Table sources: which page, which table, which columns
//!
//! Each source bundles its URLs, the table extractor and the default CSV file
//! name. URLs are processed one after another; a page that fails to fetch
//! or lacks the expected table is logged and skipped.

pub mod tennis_abstract;
pub mod wikipedia;

use crate::data::extract::{RecordBatch, TableRecordExtractor};
use crate::data::fetch::PageFetcher;
use crate::{DataSource, Result, TennisError};
use std::path::Path;

/// One scrapeable table definition
#[derive(Debug, Clone)]
pub struct TableSource {
    /// Short name used on the command line
    pub name: &'static str,
    pub description: &'static str,
    pub data_source: DataSource,
    pub urls: Vec<&'static str>,
    pub extractor: TableRecordExtractor,
    /// Default CSV file name
    pub output_file: &'static str,
}

impl TableSource {
    pub fn headers(&self) -> Vec<&'static str> {
        self.extractor.shape.headers()
    }

    /// Extract records from one HTML page
    pub fn parse_page(&self, html: &str) -> Result<RecordBatch> {
        self.extractor.extract_html(html)
    }

    /// Extract records from a saved HTML file
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<RecordBatch> {
        let html = std::fs::read_to_string(path.as_ref())?;
        self.parse_page(&html)
    }

    /// Extract from several saved files, skipping the ones that fail
    pub fn parse_files<P: AsRef<Path>>(&self, paths: &[P]) -> RecordBatch {
        let mut batch = RecordBatch::new();
        for path in paths {
            let path = path.as_ref();
            match self.parse_file(path) {
                Ok(page) => {
                    log::info!("{}: {} record(s) from {}", self.name, page.len(), path.display());
                    batch.merge(page);
                }
                Err(e) => log::warn!("{}: skipping {}: {}", self.name, path.display(), e),
            }
        }
        batch
    }

    /// Fetch every URL in turn and collect the records
    pub fn scrape(&self, fetcher: &PageFetcher) -> RecordBatch {
        let mut batch = RecordBatch::new();
        for url in &self.urls {
            log::info!("Processing {}", url);
            match fetcher.fetch(url).and_then(|html| self.parse_page(&html)) {
                Ok(page) => {
                    log::info!(
                        "Scraped {} row(s) from {} ({} skipped)",
                        page.len(),
                        url,
                        page.skipped
                    );
                    batch.merge(page);
                }
                Err(e) => log::warn!("Skipping {}: {}", url, e),
            }
        }
        batch
    }
}

/// All known sources
pub fn all_sources() -> Result<Vec<TableSource>> {
    Ok(vec![
        wikipedia::mens_singles_finals(),
        wikipedia::womens_singles_finals(),
        wikipedia::womens_doubles_finals(),
        tennis_abstract::wta_rankings()?,
    ])
}

/// Look up a source by name
pub fn find_source(name: &str) -> Result<TableSource> {
    all_sources()?
        .into_iter()
        .find(|s| s.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| TennisError::UnknownSource(name.to_string()))
}
