//! Random forest classifier
//!
//! Bootstrap-sampled CART trees with random feature subsets, fully
//! determined by the seed.

use super::tree::{DecisionTree, TreeParams};
use crate::{PredictorConfig, Result, TennisError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl ForestParams {
    pub fn from_config(config: &PredictorConfig) -> Self {
        ForestParams {
            n_trees: config.n_trees,
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            seed: config.seed,
        }
    }
}

impl Default for ForestParams {
    fn default() -> Self {
        Self::from_config(&crate::Config::default().predictor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    params: ForestParams,
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Fit the forest; every row of `x` must have the same width
    pub fn fit(x: &[Vec<f64>], y: &[bool], params: ForestParams) -> Result<Self> {
        if x.is_empty() {
            return Err(TennisError::Model("cannot fit a forest on zero samples".into()));
        }
        if x.len() != y.len() {
            return Err(TennisError::Model(format!(
                "{} feature rows but {} labels",
                x.len(),
                y.len()
            )));
        }
        if params.n_trees == 0 {
            return Err(TennisError::Model("forest needs at least one tree".into()));
        }
        let n_features = x[0].len();
        if let Some(bad) = x.iter().position(|row| row.len() != n_features) {
            return Err(TennisError::Model(format!(
                "row {} has {} features, expected {}",
                bad,
                x[bad].len(),
                n_features
            )));
        }

        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
            max_features: ((n_features as f64).sqrt() as usize).max(1),
        };

        let n = x.len();
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut trees = Vec::with_capacity(params.n_trees);
        for t in 0..params.n_trees {
            let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            trees.push(DecisionTree::fit(x, y, bootstrap, &tree_params, &mut rng));
            if (t + 1) % 50 == 0 {
                log::debug!("Grown {}/{} trees", t + 1, params.n_trees);
            }
        }

        log::info!(
            "Random forest: {} trees, {} features, {} samples, mean depth {:.1}",
            trees.len(),
            n_features,
            n,
            trees.iter().map(|t| t.depth() as f64).sum::<f64>() / trees.len() as f64
        );

        Ok(RandomForest {
            params,
            n_features,
            trees,
        })
    }

    /// Probability of class 1, the mean of the trees' leaf fractions
    pub fn predict_proba(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.n_features {
            return Err(TennisError::Model(format!(
                "expected {} features, got {}",
                self.n_features,
                row.len()
            )));
        }
        let sum: f64 = self.trees.iter().map(|t| t.predict_proba(row)).sum();
        Ok(sum / self.trees.len() as f64)
    }

    pub fn predict(&self, row: &[f64]) -> Result<bool> {
        Ok(self.predict_proba(row)? > 0.5)
    }

    pub fn predict_proba_all(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        rows.iter().map(|r| self.predict_proba(r)).collect()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }
}
