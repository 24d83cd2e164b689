//! High-level API for training survey classifiers
//!
//! This module provides the builder used by the tuner and the analysis
//! pipeline: pick a kernel kind, set hyperparameters and class weights,
//! and fit on a [`Dataset`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use healthsvm::api::SVM;
//! use healthsvm::data::{Dataset, Schema};
//! use healthsvm::{ClassWeights, Hyperparameters, KernelKind, Label, SVMModel};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dataset = Dataset::from_csv("diabetes.csv", &Schema::survey("diabetes"))?;
//!
//! let model = SVM::new(KernelKind::Radial)
//!     .with_hyperparameters(Hyperparameters { cost: 10.0, gamma: 0.5, ..Default::default() })
//!     .with_class_weights(ClassWeights::for_minority(Label::Present, 10.0)?)
//!     .train(&dataset)?;
//!
//! println!("{} support vectors", model.n_support_vectors());
//! # Ok(())
//! # }
//! ```

use crate::core::{ClassWeights, OptimizerConfig, Result, SVMModel, Sample};
use crate::data::Dataset;
use crate::kernel::{Hyperparameters, KernelKind, SvmKernel};
use crate::optimizer::{SVMOptimizer, TrainedSVM};
use serde::Serialize;

/// SVM builder for one kernel kind
#[derive(Debug, Clone)]
pub struct SVM {
    kind: KernelKind,
    params: Hyperparameters,
    config: OptimizerConfig,
}

impl SVM {
    /// Default hyperparameters and uniform class weights
    pub fn new(kind: KernelKind) -> Self {
        Self {
            kind,
            params: Hyperparameters::default(),
            config: OptimizerConfig::default(),
        }
    }

    /// Set cost, degree, coef0 and gamma
    pub fn with_hyperparameters(mut self, params: Hyperparameters) -> Self {
        self.params = params;
        self
    }

    /// Set per-label penalty multipliers
    pub fn with_class_weights(mut self, weights: ClassWeights) -> Self {
        self.config.class_weights = weights;
        self
    }

    /// Set convergence tolerance
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.config.epsilon = epsilon;
        self
    }

    /// Set maximum number of passes
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Set kernel cache size in bytes
    pub fn with_cache_size(mut self, cache_size: usize) -> Self {
        self.config.cache_size = cache_size;
        self
    }

    pub fn kind(&self) -> KernelKind {
        self.kind
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.params
    }

    /// Train on a dataset
    pub fn train(&self, dataset: &Dataset) -> Result<TrainedModel> {
        self.train_samples(dataset.samples())
    }

    /// Train on samples
    pub fn train_samples(&self, samples: &[Sample]) -> Result<TrainedModel> {
        let kernel = SvmKernel::build(self.kind, &self.params)?;
        let config = OptimizerConfig {
            c: self.params.cost,
            ..self.config.clone()
        };
        let class_weights = config.class_weights;
        let model = SVMOptimizer::new(kernel, config).train_samples(samples)?;
        Ok(TrainedModel {
            model,
            kind: self.kind,
            params: self.params,
            class_weights,
        })
    }
}

/// Fitted classifier together with the settings it was fitted with
pub struct TrainedModel {
    model: TrainedSVM<SvmKernel>,
    kind: KernelKind,
    params: Hyperparameters,
    class_weights: ClassWeights,
}

impl TrainedModel {
    pub fn kind(&self) -> KernelKind {
        self.kind
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.params
    }

    pub fn class_weights(&self) -> &ClassWeights {
        &self.class_weights
    }

    /// Whether the solver met the KKT tolerance on every training sample
    pub fn converged(&self) -> bool {
        self.model.converged()
    }

    /// Decision values for every row of a dataset
    pub fn decision_values(&self, dataset: &Dataset) -> Vec<f64> {
        dataset
            .samples()
            .iter()
            .map(|s| self.model.decision_value(&s.features))
            .collect()
    }

    /// Get model information
    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            kind: self.kind,
            hyperparameters: self.params,
            class_weights: self.class_weights,
            n_support_vectors: self.model.n_support_vectors(),
            bias: self.model.bias(),
            converged: self.model.converged(),
        }
    }

    /// Get the underlying trained model
    pub fn inner(&self) -> &TrainedSVM<SvmKernel> {
        &self.model
    }
}

impl SVMModel for TrainedModel {
    fn decision_value(&self, features: &[f64]) -> f64 {
        self.model.decision_value(features)
    }

    fn n_support_vectors(&self) -> usize {
        self.model.n_support_vectors()
    }

    fn bias(&self) -> f64 {
        self.model.bias()
    }
}

/// Model summary carried into reports
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub kind: KernelKind,
    pub hyperparameters: Hyperparameters,
    pub class_weights: ClassWeights,
    pub n_support_vectors: usize,
    pub bias: f64,
    pub converged: bool,
}
