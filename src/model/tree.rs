//! Binary CART classification tree
//!
//! Gini impurity, axis-aligned thresholds, random feature subsets per split.
//! Nodes live in a flat vector and are built with an explicit work stack,
//! so deep trees never recurse.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Growth limits shared by every tree of a forest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    /// None grows until leaves are pure or too small to split
    pub max_depth: Option<usize>,
    /// Nodes with fewer samples become leaves
    pub min_samples_split: usize,
    /// Non-constant features evaluated per split
    pub max_features: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Leaf {
        /// Fraction of class-1 samples that reached this leaf
        positive: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

impl DecisionTree {
    /// Fit on the rows named by `samples` (may repeat, as in a bootstrap)
    pub fn fit<R: Rng>(
        x: &[Vec<f64>],
        y: &[bool],
        samples: Vec<usize>,
        params: &TreeParams,
        rng: &mut R,
    ) -> Self {
        let n_features = x.first().map_or(0, Vec::len);
        let mut features: Vec<usize> = (0..n_features).collect();
        let mut nodes = vec![Node::Leaf { positive: 0.0 }];
        let mut stack = vec![(0usize, samples, 0usize)];

        while let Some((id, node_samples, depth)) = stack.pop() {
            let n = node_samples.len();
            let positives = node_samples.iter().filter(|&&i| y[i]).count();
            let leaf = Node::Leaf {
                positive: if n == 0 { 0.0 } else { positives as f64 / n as f64 },
            };

            let pure = positives == 0 || positives == n;
            let too_deep = params.max_depth.is_some_and(|d| depth >= d);
            if pure || too_deep || n < params.min_samples_split.max(2) {
                nodes[id] = leaf;
                continue;
            }

            features.shuffle(rng);
            let Some(best) = best_split(x, y, &node_samples, &features, params.max_features) else {
                nodes[id] = leaf;
                continue;
            };

            let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = node_samples
                .into_iter()
                .partition(|&i| x[i][best.feature] <= best.threshold);

            let left = nodes.len();
            let right = left + 1;
            nodes.push(Node::Leaf { positive: 0.0 });
            nodes.push(Node::Leaf { positive: 0.0 });
            nodes[id] = Node::Split {
                feature: best.feature,
                threshold: best.threshold,
                left,
                right,
            };
            stack.push((right, right_samples, depth + 1));
            stack.push((left, left_samples, depth + 1));
        }

        DecisionTree { nodes }
    }

    /// Class-1 fraction of the leaf this row falls into
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Leaf { positive } => return *positive,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    id = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Node::Split { left, right, .. } = &self.nodes[id] {
                stack.push((*left, depth + 1));
                stack.push((*right, depth + 1));
            }
        }
        max_depth
    }
}

fn gini(positives: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = positives as f64 / n as f64;
    2.0 * p * (1.0 - p)
}

/// Scan features in the given order until `max_features` non-constant ones
/// have been evaluated
fn best_split(
    x: &[Vec<f64>],
    y: &[bool],
    samples: &[usize],
    features: &[usize],
    max_features: usize,
) -> Option<BestSplit> {
    let n = samples.len();
    let total_pos = samples.iter().filter(|&&i| y[i]).count();
    let mut best: Option<BestSplit> = None;
    let mut evaluated = 0;
    let mut column: Vec<(f64, bool)> = Vec::with_capacity(n);

    for &feature in features {
        if evaluated >= max_features.max(1) {
            break;
        }

        column.clear();
        column.extend(samples.iter().map(|&i| (x[i][feature], y[i])));
        column.sort_by(|a, b| a.0.total_cmp(&b.0));

        if column[0].0 == column[n - 1].0 {
            continue;
        }
        evaluated += 1;

        let mut left_pos = 0;
        for k in 0..n - 1 {
            if column[k].1 {
                left_pos += 1;
            }
            let (lo, hi) = (column[k].0, column[k + 1].0);
            if lo == hi {
                continue;
            }

            let left_n = k + 1;
            let right_n = n - left_n;
            let impurity = (left_n as f64 * gini(left_pos, left_n)
                + right_n as f64 * gini(total_pos - left_pos, right_n))
                / n as f64;

            if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                let mid = lo + (hi - lo) / 2.0;
                best = Some(BestSplit {
                    feature,
                    threshold: if mid < hi { mid } else { lo },
                    impurity,
                });
            }
        }
    }

    best
}
