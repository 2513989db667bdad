//! Match outcome model
//!
//! A random forest over encoded perspective samples, saved together with
//! its encoder as one JSON bundle.

pub mod forest;
pub mod tree;

pub use forest::{ForestParams, RandomForest};
pub use tree::DecisionTree;

use crate::features::FeatureEncoder;
use crate::{Result, TennisError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What the bundle was trained on and how it scored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub trained_at: chrono::DateTime<chrono::Utc>,
    pub train_samples: usize,
    pub test_samples: usize,
    /// None when the fallback split was used
    pub split_date: Option<NaiveDate>,
    pub test_accuracy: Option<f64>,
    pub test_roc_auc: Option<f64>,
}

/// Everything needed to score a matchup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle {
    pub encoder: FeatureEncoder,
    pub forest: RandomForest,
    pub summary: TrainingSummary,
}

impl ModelBundle {
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;
        log::info!("Saved model to {}", path.display());
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TennisError::NoModel);
        }
        let content = std::fs::read_to_string(path)?;
        let bundle: ModelBundle = serde_json::from_str(&content)?;
        if bundle.encoder.dim() != bundle.forest.n_features() {
            return Err(TennisError::Model(format!(
                "encoder produces {} features but the forest expects {}",
                bundle.encoder.dim(),
                bundle.forest.n_features()
            )));
        }
        log::debug!("Loaded model from {}", path.display());
        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{MatchContext, PerspectiveSample, PlayerEstimate};

    fn tiny_bundle() -> ModelBundle {
        let ctx = MatchContext {
            surface: "Hard".into(),
            round: "The Final".into(),
            best_of: 5.0,
        };
        let a = PlayerEstimate::new("A", 1.0, 10000.0, 1.5);
        let b = PlayerEstimate::new("B", 50.0, 900.0, 3.0);
        let mut samples = vec![
            PerspectiveSample::matchup(&a, &b, &ctx),
            PerspectiveSample::matchup(&b, &a, &ctx),
        ];
        samples[0].label = true;

        let encoder = FeatureEncoder::fit(&samples);
        let x = encoder.encode_all(&samples);
        let y: Vec<bool> = samples.iter().map(|s| s.label).collect();
        let params = ForestParams {
            n_trees: 3,
            ..ForestParams::default()
        };
        ModelBundle {
            encoder,
            forest: RandomForest::fit(&x, &y, params).unwrap(),
            summary: TrainingSummary {
                trained_at: chrono::Utc::now(),
                train_samples: 2,
                test_samples: 0,
                split_date: None,
                test_accuracy: None,
                test_roc_auc: None,
            },
        }
    }

    #[test]
    fn test_bundle_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model").join("bundle.json");
        let bundle = tiny_bundle();
        bundle.save(&path).unwrap();

        let loaded = ModelBundle::load(&path).unwrap();
        assert_eq!(loaded.encoder, bundle.encoder);
        assert_eq!(loaded.forest.n_trees(), 3);
        assert_eq!(loaded.summary.train_samples, 2);
    }

    #[test]
    fn test_missing_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let err = ModelBundle::load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, TennisError::NoModel));
    }
}
