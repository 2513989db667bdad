//! Australian Open table scraping and match prediction
//!
//! Pulls tournament tables out of HTML pages into CSV, and trains a random
//! forest that predicts head-to-head winners from ranking and odds data.

pub mod data;
pub mod features;
pub mod model;
pub mod predict;
pub mod training;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::data::extract::SelectionError;

/// Site a table source is scraped from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    Wikipedia,
    TennisAbstract,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Wikipedia => write!(f, "Wikipedia"),
            DataSource::TennisAbstract => write!(f, "Tennis Abstract"),
        }
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum TennisError {
    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("Fetch failed for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid CSS selector `{selector}`: {message}")]
    Selector { selector: String, message: String },

    #[error("Unknown source: {0}")]
    UnknownSource(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Model not trained - run `aofever train` first")]
    NoModel,

    #[error("Model error: {0}")]
    Model(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TennisError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub scrape: ScrapeConfig,
    pub predictor: PredictorConfig,
    pub data: DataConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Directory for cached HTML pages
    #[serde(default)]
    pub cache_dir: Option<String>,
    /// Only read from the cache, never hit the network
    #[serde(default)]
    pub offline: bool,
    pub output_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorConfig {
    pub n_trees: usize,
    #[serde(default)]
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub seed: u64,
    /// Matches on or after this date form the test set
    pub split_date: NaiveDate,
    /// Train share of the chronological fallback split
    pub fallback_train_fraction: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub atp_path: String,
    pub model_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            scrape: ScrapeConfig {
                user_agent: "Mozilla/5.0 (compatible; aofever/0.1)".to_string(),
                timeout_secs: 30,
                cache_dir: None,
                offline: false,
                output_dir: "data".to_string(),
            },
            predictor: PredictorConfig {
                n_trees: 200,
                max_depth: None,
                min_samples_split: 2,
                seed: 42,
                split_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
                fallback_train_fraction: 0.8,
            },
            data: DataConfig {
                atp_path: "atp.csv".to_string(),
                model_path: "model/ao_head_to_head_predictor.json".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TennisError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| TennisError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TennisError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the predictor cannot work with
    pub fn validate(&self) -> Result<()> {
        let p = &self.predictor;
        if p.n_trees == 0 {
            return Err(TennisError::Config("predictor.n_trees must be > 0".into()));
        }
        if p.min_samples_split < 2 {
            return Err(TennisError::Config(
                "predictor.min_samples_split must be >= 2".into(),
            ));
        }
        if !(p.fallback_train_fraction > 0.0 && p.fallback_train_fraction < 1.0) {
            return Err(TennisError::Config(format!(
                "predictor.fallback_train_fraction must be in (0, 1), got {}",
                p.fallback_train_fraction
            )));
        }
        if self.scrape.timeout_secs == 0 {
            return Err(TennisError::Config("scrape.timeout_secs must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let path = path.to_str().unwrap();

        let mut config = Config::default();
        config.scrape.cache_dir = Some("cache".to_string());
        config.predictor.max_depth = Some(12);
        config.save(path).unwrap();

        let loaded = Config::load(path).unwrap();
        assert_eq!(loaded.scrape.cache_dir.as_deref(), Some("cache"));
        assert_eq!(loaded.predictor.max_depth, Some(12));
        assert_eq!(loaded.predictor.n_trees, 200);
        assert_eq!(
            loaded.predictor.split_date,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_config_rejects_bad_fraction() {
        let mut config = Config::default();
        config.predictor.fallback_train_fraction = 1.0;
        assert!(matches!(config.validate(), Err(TennisError::Config(_))));

        let mut config = Config::default();
        config.predictor.n_trees = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let err = Config::load("/nonexistent/aofever.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
