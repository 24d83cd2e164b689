//! Core traits for the survey SVM

use crate::core::{Prediction, Sample};

/// Trained binary classifier exposing a continuous decision function
pub trait SVMModel {
    /// Raw decision function value for a feature vector
    fn decision_value(&self, features: &[f64]) -> f64;

    /// Predict a single sample
    fn predict(&self, features: &[f64]) -> Prediction {
        Prediction::from_decision(self.decision_value(features))
    }

    /// Predict multiple samples
    fn predict_batch(&self, samples: &[Sample]) -> Vec<Prediction> {
        samples.iter().map(|s| self.predict(&s.features)).collect()
    }

    /// Get the number of support vectors
    fn n_support_vectors(&self) -> usize;

    /// Get the bias term
    fn bias(&self) -> f64;
}
