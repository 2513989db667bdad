//! Classification metrics for held-out evaluation

use std::fmt;

/// Precision/recall/F1 for one class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassReport {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Binary confusion matrix, rows are true classes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    pub true_positive: usize,
}

impl ConfusionMatrix {
    pub fn from_predictions(y_true: &[bool], y_pred: &[bool]) -> Self {
        let mut m = ConfusionMatrix::default();
        for (&t, &p) in y_true.iter().zip(y_pred) {
            match (t, p) {
                (false, false) => m.true_negative += 1,
                (false, true) => m.false_positive += 1,
                (true, false) => m.false_negative += 1,
                (true, true) => m.true_positive += 1,
            }
        }
        m
    }

    pub fn total(&self) -> usize {
        self.true_negative + self.false_positive + self.false_negative + self.true_positive
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_negative + self.true_positive, self.total())
    }

    /// Report for class 1 (`positive`) or class 0
    pub fn class_report(&self, positive: bool) -> ClassReport {
        let (tp, fp, fn_) = if positive {
            (self.true_positive, self.false_positive, self.false_negative)
        } else {
            (self.true_negative, self.false_negative, self.false_positive)
        };
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        ClassReport {
            precision,
            recall,
            f1,
            support: tp + fn_,
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Area under the ROC curve via the rank statistic; ties share the
/// average rank. None when only one class is present.
pub fn roc_auc(y_true: &[bool], scores: &[f64]) -> Option<f64> {
    let n = y_true.len().min(scores.len());
    let positives = y_true[..n].iter().filter(|&&t| t).count();
    let negatives = n - positives;
    if positives == 0 || negatives == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut positive_rank_sum = 0.0;
    let mut start = 0;
    while start < n {
        let mut end = start;
        while end + 1 < n && scores[order[end + 1]] == scores[order[start]] {
            end += 1;
        }
        // ranks are 1-based
        let avg_rank = (start + end) as f64 / 2.0 + 1.0;
        for &i in &order[start..=end] {
            if y_true[i] {
                positive_rank_sum += avg_rank;
            }
        }
        start = end + 1;
    }

    let p = positives as f64;
    Some((positive_rank_sum - p * (p + 1.0) / 2.0) / (p * negatives as f64))
}

/// Held-out evaluation of a probabilistic classifier
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub confusion: ConfusionMatrix,
    pub roc_auc: Option<f64>,
}

impl Evaluation {
    /// Predictions are `proba > 0.5`
    pub fn from_probabilities(y_true: &[bool], proba: &[f64]) -> Self {
        let y_pred: Vec<bool> = proba.iter().map(|&p| p > 0.5).collect();
        Evaluation {
            confusion: ConfusionMatrix::from_predictions(y_true, &y_pred),
            roc_auc: roc_auc(y_true, proba),
        }
    }

    pub fn accuracy(&self) -> f64 {
        self.confusion.accuracy()
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Accuracy: {:.4}", self.accuracy())?;
        writeln!(f)?;
        writeln!(
            f,
            "{:>8} {:>10} {:>10} {:>10} {:>10}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        for (label, positive) in [("0", false), ("1", true)] {
            let r = self.confusion.class_report(positive);
            writeln!(
                f,
                "{:>8} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                label, r.precision, r.recall, r.f1, r.support
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Confusion matrix:")?;
        writeln!(
            f,
            "  [[{} {}]\n   [{} {}]]",
            self.confusion.true_negative,
            self.confusion.false_positive,
            self.confusion.false_negative,
            self.confusion.true_positive
        )?;
        match self.roc_auc {
            Some(auc) => write!(f, "ROC AUC: {:.4}", auc),
            None => write!(f, "ROC AUC: undefined (single class in test set)"),
        }
    }
}
