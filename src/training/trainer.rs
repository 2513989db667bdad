//! Training pipeline: split, encode, fit, evaluate

use super::metrics::Evaluation;
use crate::data::dataset::AtpMatch;
use crate::features::{perspective_samples, FeatureEncoder, PerspectiveSample};
use crate::model::{ForestParams, ModelBundle, RandomForest, TrainingSummary};
use crate::{PredictorConfig, Result, TennisError};
use chrono::NaiveDate;

/// Train/test partition of perspective samples
#[derive(Debug, Clone)]
pub struct ChronologicalSplit {
    pub train: Vec<PerspectiveSample>,
    pub test: Vec<PerspectiveSample>,
    /// Date the split was made at, None for the fraction fallback
    pub split_date: Option<NaiveDate>,
}

impl ChronologicalSplit {
    /// Samples before `split_date` train, the rest test. An empty test set
    /// falls back to the first `fallback_fraction` of the sorted samples.
    pub fn new(
        mut samples: Vec<PerspectiveSample>,
        split_date: NaiveDate,
        fallback_fraction: f64,
    ) -> Result<Self> {
        samples.sort_by_key(|s| s.date);

        let cut = samples.partition_point(|s| s.date.map_or(true, |d| d < split_date));
        if cut == 0 {
            return Err(TennisError::Dataset(format!(
                "no matches before {} to train on",
                split_date
            )));
        }

        if cut == samples.len() {
            let fallback_cut = ((samples.len() as f64) * fallback_fraction) as usize;
            let fallback_cut = fallback_cut.clamp(1, samples.len());
            log::warn!(
                "No matches on or after {}; falling back to a {:.0}/{:.0} chronological split",
                split_date,
                fallback_fraction * 100.0,
                (1.0 - fallback_fraction) * 100.0
            );
            let test = samples.split_off(fallback_cut);
            return Ok(ChronologicalSplit {
                train: samples,
                test,
                split_date: None,
            });
        }

        let test = samples.split_off(cut);
        Ok(ChronologicalSplit {
            train: samples,
            test,
            split_date: Some(split_date),
        })
    }
}

/// Result of a training run
pub struct TrainingOutcome {
    pub bundle: ModelBundle,
    /// None when the test set is empty
    pub evaluation: Option<Evaluation>,
}

pub struct Trainer {
    config: PredictorConfig,
}

impl Trainer {
    pub fn new(config: PredictorConfig) -> Self {
        Trainer { config }
    }

    pub fn train(&self, matches: &[AtpMatch]) -> Result<TrainingOutcome> {
        let samples = perspective_samples(matches);
        log::info!(
            "Built {} perspective samples from {} matches",
            samples.len(),
            matches.len()
        );

        let split = ChronologicalSplit::new(
            samples,
            self.config.split_date,
            self.config.fallback_train_fraction,
        )?;
        log::info!(
            "Split: train={}, test={}",
            split.train.len(),
            split.test.len()
        );

        let encoder = FeatureEncoder::fit(&split.train);
        let x_train = encoder.encode_all(&split.train);
        let y_train: Vec<bool> = split.train.iter().map(|s| s.label).collect();
        log::debug!("Features: {:?}", encoder.feature_names());

        let forest = RandomForest::fit(&x_train, &y_train, ForestParams::from_config(&self.config))?;

        let evaluation = if split.test.is_empty() {
            None
        } else {
            let x_test = encoder.encode_all(&split.test);
            let y_test: Vec<bool> = split.test.iter().map(|s| s.label).collect();
            let proba = forest.predict_proba_all(&x_test)?;
            Some(Evaluation::from_probabilities(&y_test, &proba))
        };

        if let Some(eval) = &evaluation {
            log::info!(
                "Test accuracy {:.4}, ROC AUC {}",
                eval.accuracy(),
                eval.roc_auc
                    .map(|a| format!("{:.4}", a))
                    .unwrap_or_else(|| "undefined".to_string())
            );
        }

        let summary = TrainingSummary {
            trained_at: chrono::Utc::now(),
            train_samples: split.train.len(),
            test_samples: split.test.len(),
            split_date: split.split_date,
            test_accuracy: evaluation.as_ref().map(Evaluation::accuracy),
            test_roc_auc: evaluation.as_ref().and_then(|e| e.roc_auc),
        };

        Ok(TrainingOutcome {
            bundle: ModelBundle {
                encoder,
                forest,
                summary,
            },
            evaluation,
        })
    }
}
