//! Ranked-threshold ROC curves

use crate::core::{Label, Result, SVMError};
use serde::Serialize;

/// One operating point of a ROC curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RocPoint {
    pub false_positive_rate: f64,
    pub true_positive_rate: f64,
    /// Scores at or above this value are called positive
    pub threshold: f64,
}

/// ROC curve from continuous scores
///
/// Points run from `(0, 0)` to `(1, 1)` as the threshold sweeps down
/// through every distinct score. Tied scores enter together, producing a
/// diagonal segment rather than an order-dependent staircase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RocCurve {
    points: Vec<RocPoint>,
}

impl RocCurve {
    /// Build a curve; larger scores must mean "more likely `positive`"
    pub fn from_scores(scores: &[f64], actual: &[Label], positive: Label) -> Result<Self> {
        if scores.len() != actual.len() {
            return Err(SVMError::DimensionMismatch {
                expected: actual.len(),
                actual: scores.len(),
            });
        }
        if scores.iter().any(|s| s.is_nan()) {
            return Err(SVMError::InvalidParameter(
                "ROC scores must not contain NaN".to_string(),
            ));
        }

        let n_pos = actual.iter().filter(|&&l| l == positive).count();
        let n_neg = actual.len() - n_pos;

        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

        let mut points = vec![RocPoint {
            false_positive_rate: 0.0,
            true_positive_rate: 0.0,
            threshold: f64::INFINITY,
        }];

        let (mut tp, mut fp) = (0usize, 0usize);
        let mut k = 0;
        while k < order.len() {
            let threshold = scores[order[k]];
            while k < order.len() && scores[order[k]] == threshold {
                if actual[order[k]] == positive {
                    tp += 1;
                } else {
                    fp += 1;
                }
                k += 1;
            }
            points.push(RocPoint {
                false_positive_rate: rate(fp, n_neg),
                true_positive_rate: rate(tp, n_pos),
                threshold,
            });
        }

        // Single-class input never reaches (1, 1) on one axis
        let last = points[points.len() - 1];
        if last.false_positive_rate != 1.0 || last.true_positive_rate != 1.0 {
            points.push(RocPoint {
                false_positive_rate: 1.0,
                true_positive_rate: 1.0,
                threshold: f64::NEG_INFINITY,
            });
        }

        Ok(Self { points })
    }

    pub fn points(&self) -> &[RocPoint] {
        &self.points
    }

    /// Area under the curve by the trapezoid rule
    pub fn auc(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| {
                let dx = w[1].false_positive_rate - w[0].false_positive_rate;
                dx * (w[1].true_positive_rate + w[0].true_positive_rate) / 2.0
            })
            .sum()
    }
}

fn rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}
