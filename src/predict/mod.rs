//! Prediction and inference
//!
//! Load a trained bundle and score hypothetical matchups.

pub mod inference;

pub use inference::{format_prediction, write_predictions_csv, MatchupPrediction, Predictor};
