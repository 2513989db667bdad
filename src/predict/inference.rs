//! Head-to-head inference

use crate::features::{MatchContext, PerspectiveSample, PlayerEstimate};
use crate::model::ModelBundle;
use crate::Result;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Win probabilities for one matchup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchupPrediction {
    pub player_a: String,
    pub player_b: String,
    pub surface: String,
    pub round: String,
    pub player_a_win_prob: f64,
    pub player_b_win_prob: f64,
    pub predicted_winner: String,
}

/// Scores matchups with a trained bundle
pub struct Predictor {
    bundle: ModelBundle,
}

impl Predictor {
    pub fn new(bundle: ModelBundle) -> Self {
        Predictor { bundle }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(ModelBundle::load(path)?))
    }

    /// Probability that `a` beats `b`, scored from `a`'s perspective only
    pub fn predict(
        &self,
        a: &PlayerEstimate,
        b: &PlayerEstimate,
        ctx: &MatchContext,
    ) -> Result<MatchupPrediction> {
        let sample = PerspectiveSample::matchup(a, b, ctx);
        let row = self.bundle.encoder.encode(&sample);
        let p = self.bundle.forest.predict_proba(&row)?;
        log::debug!("{} vs {}: features {:?} -> {:.4}", a.name, b.name, row, p);

        let winner = if p > 0.5 { &a.name } else { &b.name };
        Ok(MatchupPrediction {
            predicted_winner: winner.clone(),
            player_a: a.name.clone(),
            player_b: b.name.clone(),
            surface: ctx.surface.clone(),
            round: ctx.round.clone(),
            player_a_win_prob: p,
            player_b_win_prob: 1.0 - p,
        })
    }

    pub fn bundle(&self) -> &ModelBundle {
        &self.bundle
    }
}

/// Format a prediction for display
pub fn format_prediction(pred: &MatchupPrediction) -> String {
    let winner = &pred.predicted_winner;
    let win_prob = pred.player_a_win_prob.max(pred.player_b_win_prob);

    format!(
        r#"
┌─────────────────────────────────────────────────┐
│  {} vs {}
│  {}, {}
├─────────────────────────────────────────────────┤
│  {:<20} {:.1}%
│  {:<20} {:.1}%
│  Predicted winner:  {} ({:.1}%)
└─────────────────────────────────────────────────┘
"#,
        pred.player_a,
        pred.player_b,
        pred.surface,
        pred.round,
        pred.player_a,
        pred.player_a_win_prob * 100.0,
        pred.player_b,
        pred.player_b_win_prob * 100.0,
        winner,
        win_prob * 100.0
    )
}

/// Write predictions as CSV, one row each, with a header
pub fn write_predictions_csv<W: Write>(writer: W, preds: &[MatchupPrediction]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for pred in preds {
        csv_writer.serialize(pred)?;
    }
    csv_writer.flush()?;
    Ok(())
}
