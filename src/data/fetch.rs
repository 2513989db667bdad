//! Page fetching with an optional on-disk HTML cache

use crate::{Result, ScrapeConfig, TennisError};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Fetches HTML pages over HTTP, reading and writing a cache directory
pub struct PageFetcher {
    client: reqwest::blocking::Client,
    /// Optional cache directory for HTML files
    cache_dir: Option<PathBuf>,
    /// If true, only use cache (no network requests)
    offline_only: bool,
}

impl PageFetcher {
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(PageFetcher {
            client,
            cache_dir: config.cache_dir.as_ref().map(PathBuf::from),
            offline_only: config.offline,
        })
    }

    /// Use a cache directory
    pub fn with_cache<P: AsRef<Path>>(mut self, cache_dir: P) -> Self {
        self.cache_dir = Some(cache_dir.as_ref().to_path_buf());
        self
    }

    /// Set offline-only mode (no network requests, cache must exist)
    pub fn offline_only(mut self, offline: bool) -> Self {
        self.offline_only = offline;
        self
    }

    /// Get the cache file path for a URL
    fn cache_path(&self, url: &str) -> Option<PathBuf> {
        self.cache_dir
            .as_ref()
            .map(|dir| dir.join(cache_file_name(url)))
    }

    fn load_from_cache(&self, url: &str) -> Option<String> {
        let path = self.cache_path(url)?;
        if path.exists() {
            log::debug!("Loading from cache: {}", path.display());
            std::fs::read_to_string(&path).ok()
        } else {
            None
        }
    }

    fn save_to_cache(&self, url: &str, html: &str) -> Result<()> {
        if let Some(path) = self.cache_path(url) {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, html)?;
            log::debug!("Saved to cache: {}", path.display());
        }
        Ok(())
    }

    /// Fetch a page, preferring the cache
    pub fn fetch(&self, url: &str) -> Result<String> {
        if let Some(html) = self.load_from_cache(url) {
            return Ok(html);
        }

        if self.offline_only {
            return Err(TennisError::Transport {
                url: url.to_string(),
                message: "no cached copy (offline mode)".to_string(),
            });
        }

        log::debug!("Fetching {}", url);
        let response = self.client.get(url).send()?;

        if !response.status().is_success() {
            return Err(TennisError::Transport {
                url: url.to_string(),
                message: format!("HTTP {}", response.status()),
            });
        }

        let html = response.text()?;

        if let Err(e) = self.save_to_cache(url, &html) {
            log::warn!("Failed to cache {}: {}", url, e);
        }

        Ok(html)
    }
}

/// File name for a cached URL
fn cache_file_name(url: &str) -> String {
    url.replace("https://", "")
        .replace("http://", "")
        .replace(['/', '?', '&', '=', '%', ':'], "_")
        + ".html"
}
