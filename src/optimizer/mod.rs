//! Optimization front end
//!
//! Ties a kernel and the weighted SMO solver together and turns the dual
//! solution into a model that only keeps its support vectors.

use crate::core::{OptimizationResult, OptimizerConfig, Result, SVMModel, Sample};
use crate::data::Dataset;
use crate::kernel::Kernel;
use crate::solver::SMOSolver;
use log::debug;
use std::sync::Arc;

/// SVM optimizer combining a kernel with the solver configuration
pub struct SVMOptimizer<K: Kernel> {
    kernel: Arc<K>,
    config: OptimizerConfig,
}

impl<K: Kernel> SVMOptimizer<K> {
    pub fn new(kernel: K, config: OptimizerConfig) -> Self {
        Self {
            kernel: Arc::new(kernel),
            config,
        }
    }

    /// Train on every row of a dataset
    pub fn train(&self, dataset: &Dataset) -> Result<TrainedSVM<K>> {
        self.train_samples(dataset.samples())
    }

    /// Train on a slice of samples
    pub fn train_samples(&self, samples: &[Sample]) -> Result<TrainedSVM<K>> {
        let solver = SMOSolver::new(Arc::clone(&self.kernel), self.config.clone());
        let result = solver.solve(samples)?;
        debug!(
            "Trained on {} samples: {} support vectors, b = {:.6}, converged = {}",
            samples.len(),
            result.support_vectors.len(),
            result.b,
            result.converged
        );
        Ok(TrainedSVM::new(Arc::clone(&self.kernel), samples, result))
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }
}

/// Fitted kernel classifier; immutable after training
pub struct TrainedSVM<K: Kernel> {
    kernel: Arc<K>,
    support_vectors: Vec<Sample>,
    alpha: Vec<f64>,
    bias: f64,
    support_indices: Vec<usize>,
    converged: bool,
}

impl<K: Kernel> TrainedSVM<K> {
    pub(crate) fn new(
        kernel: Arc<K>,
        training_samples: &[Sample],
        optimization_result: OptimizationResult,
    ) -> Self {
        let support_vectors = optimization_result
            .support_vectors
            .iter()
            .map(|&i| training_samples[i].clone())
            .collect();
        let alpha = optimization_result
            .support_vectors
            .iter()
            .map(|&i| optimization_result.alpha[i])
            .collect();

        Self {
            kernel,
            support_vectors,
            alpha,
            bias: optimization_result.b,
            support_indices: optimization_result.support_vectors,
            converged: optimization_result.converged,
        }
    }

    pub fn support_vectors(&self) -> &[Sample] {
        &self.support_vectors
    }

    pub fn alpha_values(&self) -> &[f64] {
        &self.alpha
    }

    /// Indices of support vectors in the training set
    pub fn support_vector_indices(&self) -> &[usize] {
        &self.support_indices
    }

    /// Whether the solver met its tolerance before the iteration cap
    pub fn converged(&self) -> bool {
        self.converged
    }
}

impl<K: Kernel> SVMModel for TrainedSVM<K> {
    fn decision_value(&self, features: &[f64]) -> f64 {
        self.support_vectors
            .iter()
            .zip(&self.alpha)
            .map(|(sv, &alpha)| alpha * sv.label.sign() * self.kernel.compute(features, &sv.features))
            .sum::<f64>()
            + self.bias
    }

    fn n_support_vectors(&self) -> usize {
        self.support_vectors.len()
    }

    fn bias(&self) -> f64 {
        self.bias
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Label;
    use crate::kernel::LinearKernel;

    fn separable() -> Vec<Sample> {
        vec![
            Sample::new(vec![2.0], Label::Present),
            Sample::new(vec![-2.0], Label::Absent),
            Sample::new(vec![1.5], Label::Present),
            Sample::new(vec![-1.5], Label::Absent),
        ]
    }

    #[test]
    fn test_training_simple_case() {
        let optimizer = SVMOptimizer::new(LinearKernel::new(), OptimizerConfig::default());
        let samples = separable();
        let model = optimizer.train_samples(&samples).expect("Training should succeed");

        assert!(model.n_support_vectors() > 0);
        assert_eq!(model.alpha_values().len(), model.support_vectors().len());
        assert!(model.converged());

        for sample in &samples {
            assert_eq!(model.predict(&sample.features).label, sample.label);
        }
    }

    #[test]
    fn test_decision_function_orders_points() {
        let optimizer = SVMOptimizer::new(LinearKernel::new(), OptimizerConfig::default());
        let model = optimizer.train_samples(&separable()).unwrap();

        assert!(model.decision_value(&[0.5]) > model.decision_value(&[-0.5]));
        let batch = model.predict_batch(&separable());
        assert_eq!(batch.len(), 4);
    }

    #[test]
    fn test_support_vector_access() {
        let optimizer = SVMOptimizer::new(LinearKernel::new(), OptimizerConfig::default());
        let samples = separable();
        let model = optimizer.train_samples(&samples).unwrap();

        assert_eq!(
            model.support_vectors().len(),
            model.support_vector_indices().len()
        );
        for &alpha in model.alpha_values() {
            assert!(alpha > 0.0);
        }
        for &idx in model.support_vector_indices() {
            assert!(idx < samples.len());
        }
    }

    #[test]
    fn test_single_class_model_is_constant() {
        let optimizer = SVMOptimizer::new(LinearKernel::new(), OptimizerConfig::default());
        let samples = vec![
            Sample::new(vec![1.0], Label::Present),
            Sample::new(vec![5.0], Label::Present),
        ];
        let model = optimizer.train_samples(&samples).unwrap();

        assert_eq!(model.n_support_vectors(), 0);
        assert_eq!(model.predict(&[-100.0]).label, Label::Present);
    }
}
