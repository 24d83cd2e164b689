//! Cost-sensitive SVM analysis of health survey tables
//!
//! Loads cleaned survey CSVs, partitions them with one shared seeded index
//! draw, tunes class-weighted kernel SVMs by cross-validated `1 - F1`, and
//! reports confusion counts, per-class accuracy and ROC curves.
//!
//! Training uses Platt's SMO with per-sample box constraints
//! `C * w(label)`, so the minority label can be given a larger margin
//! penalty. Features are used as given; nothing is rescaled.

pub mod api;
pub mod cache;
pub mod core;
pub mod data;
pub mod evaluation;
pub mod kernel;
pub mod metrics;
pub mod optimizer;
pub mod pipeline;
pub mod report;
pub mod solver;
pub mod tuning;

// Re-export main types for convenience
pub use crate::api::{ModelInfo, TrainedModel, SVM};
pub use crate::cache::{CacheStats, KernelCache};
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::data::{Dataset, Partition, Schema};
pub use crate::evaluation::{EvaluationReport, Evaluator, SubsetEvaluation};
pub use crate::kernel::{Hyperparameters, Kernel, KernelKind, SvmKernel};
pub use crate::metrics::{ConfusionMatrix, RocCurve, RocPoint};
pub use crate::optimizer::{SVMOptimizer, TrainedSVM};
pub use crate::pipeline::{Analysis, AnalysisConfig, AnalysisOutcome, ModelRun, Target};
pub use crate::tuning::{DegenerateFoldPolicy, ParameterGrid, Tuner, TunerConfig, TuningResult};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
