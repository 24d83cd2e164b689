//! 2×2 confusion counts relative to a chosen positive label

use crate::core::{Label, Result, SVMError};
use serde::Serialize;

/// Confusion counts for a binary classifier
///
/// "Positive" is whichever label the caller designates, normally the
/// minority label of the table being analysed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub positive: Label,
    pub true_positives: usize,
    pub false_negatives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
}

impl ConfusionMatrix {
    /// Count agreement between actual and predicted labels
    pub fn from_labels(actual: &[Label], predicted: &[Label], positive: Label) -> Result<Self> {
        if actual.len() != predicted.len() {
            return Err(SVMError::DimensionMismatch {
                expected: actual.len(),
                actual: predicted.len(),
            });
        }

        let mut matrix = Self {
            positive,
            true_positives: 0,
            false_negatives: 0,
            false_positives: 0,
            true_negatives: 0,
        };
        for (&a, &p) in actual.iter().zip(predicted) {
            match (a == positive, p == positive) {
                (true, true) => matrix.true_positives += 1,
                (true, false) => matrix.false_negatives += 1,
                (false, true) => matrix.false_positives += 1,
                (false, false) => matrix.true_negatives += 1,
            }
        }
        Ok(matrix)
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.false_negatives + self.false_positives + self.true_negatives
    }

    /// Instances whose actual label is the positive label
    pub fn actual_positives(&self) -> usize {
        self.true_positives + self.false_negatives
    }

    pub fn actual_negatives(&self) -> usize {
        self.true_negatives + self.false_positives
    }

    /// Calculate accuracy: (TP + TN) / total
    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }

    /// Calculate precision: TP / (TP + FP)
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// Recall / true-positive rate: accuracy on the positive (minority) label
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.actual_positives())
    }

    /// Specificity / true-negative rate: accuracy on the negative (majority) label
    pub fn specificity(&self) -> f64 {
        ratio(self.true_negatives, self.actual_negatives())
    }

    pub fn minority_accuracy(&self) -> f64 {
        self.recall()
    }

    pub fn majority_accuracy(&self) -> f64 {
        self.specificity()
    }

    /// F1 score for the positive label, or `None` where it is undefined
    ///
    /// Undefined when nothing was predicted positive, nothing is actually
    /// positive, or precision and recall are both zero (the harmonic mean
    /// is 0/0).
    pub fn f1_score(&self) -> Option<f64> {
        let predicted_positives = self.true_positives + self.false_positives;
        if predicted_positives == 0 || self.actual_positives() == 0 {
            return None;
        }
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            None
        } else {
            Some(2.0 * p * r / (p + r))
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::core::Label::{Absent as A, Present as P};

    fn matrix(tp: usize, fn_: usize, fp: usize, tn: usize) -> ConfusionMatrix {
        ConfusionMatrix {
            positive: P,
            true_positives: tp,
            false_negatives: fn_,
            false_positives: fp,
            true_negatives: tn,
        }
    }

    #[test]
    fn test_from_labels() {
        let actual = [P, P, A, A, A];
        let predicted = [P, A, P, A, A];
        let m = ConfusionMatrix::from_labels(&actual, &predicted, P).unwrap();

        assert_eq!(m.true_positives, 1);
        assert_eq!(m.false_negatives, 1);
        assert_eq!(m.false_positives, 1);
        assert_eq!(m.true_negatives, 2);
        assert_eq!(m.actual_positives(), 2);
        assert_eq!(m.total(), 5);
    }

    #[test]
    fn test_positive_label_can_be_absent() {
        let actual = [P, A, A];
        let predicted = [P, A, P];
        let m = ConfusionMatrix::from_labels(&actual, &predicted, A).unwrap();
        assert_eq!(m.true_positives, 1);
        assert_eq!(m.false_negatives, 1);
        assert_eq!(m.true_negatives, 1);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(ConfusionMatrix::from_labels(&[P], &[P, A], P).is_err());
    }

    #[test]
    fn test_metrics() {
        let m = matrix(10, 3, 2, 5);

        assert_eq!(m.accuracy(), 0.75);
        assert_eq!(m.precision(), 10.0 / 12.0);
        assert_eq!(m.recall(), 10.0 / 13.0);
        assert_eq!(m.specificity(), 5.0 / 7.0);
        assert_eq!(m.minority_accuracy(), m.recall());
        assert_eq!(m.majority_accuracy(), m.specificity());
        assert_relative_eq!(m.f1_score().unwrap(), 20.0 / 25.0, epsilon = 1e-12);
    }

    #[test]
    fn test_f1_undefined_cases() {
        // Nothing predicted positive
        assert_eq!(matrix(0, 4, 0, 6).f1_score(), None);
        // Nothing actually positive
        assert_eq!(matrix(0, 0, 2, 8).f1_score(), None);
        // Precision and recall both zero
        assert_eq!(matrix(0, 3, 3, 4).f1_score(), None);
        // Perfect
        assert_eq!(matrix(3, 0, 0, 7).f1_score(), Some(1.0));
    }

    #[test]
    fn test_rates_stay_in_unit_interval() {
        for m in [matrix(0, 0, 0, 0), matrix(0, 5, 0, 0), matrix(7, 0, 9, 1)] {
            for v in [m.accuracy(), m.recall(), m.specificity(), m.precision()] {
                assert!((0.0..=1.0).contains(&v));
            }
        }
    }
}
