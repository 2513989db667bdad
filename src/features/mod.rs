//! Feature extraction and encoding
//!
//! Converts cleaned matches into model-ready rows.

pub mod encoding;
pub mod match_repr;

pub use encoding::FeatureEncoder;
pub use match_repr::{perspective_samples, MatchContext, PerspectiveSample, PlayerEstimate};
