//! Model training
//!
//! Chronological split, forest fitting and held-out metrics.

pub mod metrics;
pub mod trainer;

pub use metrics::{ConfusionMatrix, Evaluation};
pub use trainer::{ChronologicalSplit, Trainer, TrainingOutcome};
