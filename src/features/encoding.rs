//! Feature encoding: standard scaling and one-hot categories
//!
//! The encoder is fitted on training samples only and stored with the
//! model, so predictions are encoded exactly like the training data.

use super::match_repr::PerspectiveSample;
use serde::{Deserialize, Serialize};

/// Mean/std scaling for one numeric feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Standardizer {
    pub mean: f64,
    pub std: f64,
}

impl Standardizer {
    /// Population mean/std; a zero spread scales by 1
    pub fn fit(values: &[f64]) -> Self {
        if values.is_empty() {
            return Standardizer { mean: 0.0, std: 1.0 };
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std = variance.sqrt();

        Standardizer {
            mean,
            std: if std > 0.0 { std } else { 1.0 },
        }
    }

    pub fn transform(&self, value: f64) -> f64 {
        (value - self.mean) / self.std
    }
}

/// One-hot vocabulary for a categorical feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHot {
    categories: Vec<String>,
}

impl OneHot {
    /// Sorted distinct categories
    pub fn fit<'a>(values: impl Iterator<Item = &'a str>) -> Self {
        let mut categories: Vec<String> = values.map(str::to_string).collect();
        categories.sort();
        categories.dedup();
        OneHot { categories }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Unknown categories encode as all zeros
    pub fn encode_into(&self, value: &str, out: &mut Vec<f64>) {
        out.extend(self.categories.iter().map(|c| if c == value { 1.0 } else { 0.0 }));
    }
}

/// Turns perspective samples into model input rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureEncoder {
    numeric: Vec<Standardizer>,
    surface: OneHot,
    round: OneHot,
}

impl FeatureEncoder {
    pub fn fit(samples: &[PerspectiveSample]) -> Self {
        let numeric = (0..PerspectiveSample::NUMERIC_NAMES.len())
            .map(|i| {
                let column: Vec<f64> = samples.iter().map(|s| s.numeric()[i]).collect();
                Standardizer::fit(&column)
            })
            .collect();

        FeatureEncoder {
            numeric,
            surface: OneHot::fit(samples.iter().map(|s| s.surface.as_str())),
            round: OneHot::fit(samples.iter().map(|s| s.round.as_str())),
        }
    }

    /// Width of an encoded row
    pub fn dim(&self) -> usize {
        self.numeric.len() + self.surface.categories().len() + self.round.categories().len()
    }

    /// Numeric features first, then Surface and Round one-hots
    pub fn encode(&self, sample: &PerspectiveSample) -> Vec<f64> {
        let mut row = Vec::with_capacity(self.dim());
        row.extend(
            self.numeric
                .iter()
                .zip(sample.numeric())
                .map(|(scaler, v)| scaler.transform(v)),
        );
        self.surface.encode_into(&sample.surface, &mut row);
        self.round.encode_into(&sample.round, &mut row);
        row
    }

    pub fn encode_all(&self, samples: &[PerspectiveSample]) -> Vec<Vec<f64>> {
        samples.iter().map(|s| self.encode(s)).collect()
    }

    pub fn feature_names(&self) -> Vec<String> {
        let mut names: Vec<String> = PerspectiveSample::NUMERIC_NAMES
            .iter()
            .map(|n| n.to_string())
            .collect();
        names.extend(self.surface.categories().iter().map(|c| format!("Surface_{}", c)));
        names.extend(self.round.categories().iter().map(|c| format!("Round_{}", c)));
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(surface: &str, round: &str, rank_diff: f64) -> PerspectiveSample {
        PerspectiveSample {
            date: None,
            surface: surface.into(),
            round: round.into(),
            best_of: 3.0,
            rank_diff,
            pts_diff: 0.0,
            odd_ratio_log: 0.0,
            label: false,
        }
    }

    #[test]
    fn test_standardizer() {
        let s = Standardizer::fit(&[1.0, 3.0]);
        assert_eq!(s.mean, 2.0);
        assert_eq!(s.std, 1.0);
        assert_eq!(s.transform(3.0), 1.0);

        let constant = Standardizer::fit(&[5.0, 5.0, 5.0]);
        assert_eq!(constant.std, 1.0);
        assert_eq!(constant.transform(5.0), 0.0);
    }

    #[test]
    fn test_encoding_layout() {
        let train = vec![
            sample("Hard", "1st Round", -10.0),
            sample("Clay", "The Final", 10.0),
            sample("Hard", "The Final", 0.0),
        ];
        let encoder = FeatureEncoder::fit(&train);

        assert_eq!(encoder.dim(), 4 + 2 + 2);
        assert_eq!(
            encoder.feature_names(),
            [
                "Best of",
                "Rank_Diff",
                "Pts_Diff",
                "Odd_Ratio_Log",
                "Surface_Clay",
                "Surface_Hard",
                "Round_1st Round",
                "Round_The Final"
            ]
        );

        let row = encoder.encode(&sample("Clay", "1st Round", 10.0));
        assert_eq!(&row[4..], &[1.0, 0.0, 1.0, 0.0]);
        assert!(row[1] > 1.0);
        // constant best-of scales to zero
        assert_eq!(row[0], 0.0);
    }

    #[test]
    fn test_unknown_category_is_all_zeros() {
        let encoder = FeatureEncoder::fit(&[sample("Hard", "The Final", 0.0)]);
        let row = encoder.encode(&sample("Grass", "Quarterfinals", 0.0));
        assert_eq!(&row[4..], &[0.0, 0.0]);
    }
}
