//! End-to-end survey analysis
//!
//! Load every target table, draw one partition for all of them, then tune,
//! train and evaluate one classifier per (table, kernel kind) pair.

use crate::api::{TrainedModel, SVM};
use crate::core::{ClassWeights, OptimizerConfig, Result, SVMError};
use crate::data::{Dataset, LabelCounts, Partition, Schema};
use crate::evaluation::{EvaluationReport, Evaluator};
use crate::kernel::KernelKind;
use crate::tuning::{DegenerateFoldPolicy, ParameterGrid, Tuner, TunerConfig, TuningResult};
use log::{info, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// One input table: its CSV path and the name of its label column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub condition: String,
    pub path: PathBuf,
}

impl Target {
    pub fn new<S: Into<String>, P: Into<PathBuf>>(condition: S, path: P) -> Self {
        Self {
            condition: condition.into(),
            path: path.into(),
        }
    }

    /// Parse `CONDITION=PATH`
    pub fn parse(arg: &str) -> Result<Self> {
        match arg.split_once('=') {
            Some((condition, path)) if !condition.is_empty() && !path.is_empty() => {
                Ok(Self::new(condition.trim(), path.trim()))
            }
            _ => Err(SVMError::InvalidParameter(format!(
                "Dataset must be given as CONDITION=PATH, got: '{arg}'"
            ))),
        }
    }
}

/// Settings for a full analysis run
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub targets: Vec<Target>,
    pub kernels: Vec<KernelKind>,
    /// Feature columns; the standard survey columns when empty
    pub features: Vec<String>,
    /// Seed for the partition and the fold assignment
    pub seed: u64,
    pub train_fraction: f64,
    /// Weight of the minority label; the majority label gets 1
    pub minority_weight: f64,
    pub grid: ParameterGrid,
    pub folds: usize,
    pub degenerate_policy: DegenerateFoldPolicy,
    pub optimizer: OptimizerConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            kernels: KernelKind::ALL.to_vec(),
            features: Vec::new(),
            seed: 1,
            train_fraction: 0.8,
            minority_weight: 10.0,
            grid: ParameterGrid::default(),
            folds: 10,
            degenerate_policy: DegenerateFoldPolicy::default(),
            optimizer: OptimizerConfig::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn new(targets: Vec<Target>) -> Self {
        Self {
            targets,
            ..Self::default()
        }
    }

    pub fn with_kernels(mut self, kernels: Vec<KernelKind>) -> Self {
        self.kernels = kernels;
        self
    }

    pub fn with_features(mut self, features: Vec<String>) -> Self {
        self.features = features;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_train_fraction(mut self, train_fraction: f64) -> Self {
        self.train_fraction = train_fraction;
        self
    }

    pub fn with_minority_weight(mut self, minority_weight: f64) -> Self {
        self.minority_weight = minority_weight;
        self
    }

    pub fn with_grid(mut self, grid: ParameterGrid) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_folds(mut self, folds: usize) -> Self {
        self.folds = folds;
        self
    }

    pub fn with_degenerate_policy(mut self, policy: DegenerateFoldPolicy) -> Self {
        self.degenerate_policy = policy;
        self
    }

    pub fn with_optimizer(mut self, optimizer: OptimizerConfig) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Schema for a target's label column
    pub fn schema_for(&self, condition: &str) -> Schema {
        if self.features.is_empty() {
            Schema::survey(condition)
        } else {
            Schema::new(self.features.clone(), condition)
        }
    }

    fn tuner_config(&self) -> TunerConfig {
        TunerConfig {
            folds: self.folds,
            seed: self.seed,
            degenerate_policy: self.degenerate_policy,
            optimizer: self.optimizer.clone(),
        }
    }
}

/// Result of one (table, kernel kind) pair
#[derive(Serialize)]
pub struct ModelRun {
    pub dataset: String,
    pub kind: KernelKind,
    pub train_counts: LabelCounts,
    pub class_weights: ClassWeights,
    pub tuning: TuningResult,
    pub evaluation: EvaluationReport,
    #[serde(skip_serializing)]
    pub model: TrainedModel,
}

/// Everything one analysis run produced
#[derive(Serialize)]
pub struct AnalysisOutcome {
    pub partition: Partition,
    pub runs: Vec<ModelRun>,
}

/// Runs the load, partition, tune, train and evaluate stages
pub struct Analysis {
    config: AnalysisConfig,
}

impl Analysis {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Load every configured target from disk and analyse it
    pub fn run(&self) -> Result<AnalysisOutcome> {
        if self.config.targets.is_empty() {
            return Err(SVMError::InvalidParameter(
                "At least one dataset is required".to_string(),
            ));
        }

        let datasets = self
            .config
            .targets
            .iter()
            .map(|target| {
                let dataset = Dataset::from_csv(&target.path, &self.config.schema_for(&target.condition))?;
                info!(
                    "Loaded '{}' from {:?}: {} rows, {} features",
                    dataset.name(),
                    target.path,
                    dataset.len(),
                    dataset.dim()
                );
                Ok(dataset)
            })
            .collect::<Result<Vec<_>>>()?;

        self.run_on(&datasets)
    }

    /// Analyse already loaded, row-aligned tables
    pub fn run_on(&self, datasets: &[Dataset]) -> Result<AnalysisOutcome> {
        if self.config.kernels.is_empty() {
            return Err(SVMError::InvalidParameter(
                "At least one kernel kind is required".to_string(),
            ));
        }

        // Runs, ROC files and summary rows are keyed by dataset name
        let mut names = HashSet::new();
        if let Some(duplicate) = datasets.iter().find(|d| !names.insert(d.name())) {
            return Err(SVMError::InvalidParameter(format!(
                "Two datasets are named '{}'; rename one of the files",
                duplicate.name()
            )));
        }

        let refs: Vec<&Dataset> = datasets.iter().collect();
        let n_rows = Partition::validate_aligned(&refs)?;
        let partition = Partition::draw(n_rows, self.config.train_fraction, self.config.seed)?;
        info!(
            "Partitioned {n_rows} rows with seed {}: {} train, {} test",
            partition.seed(),
            partition.train_indices().len(),
            partition.test_indices().len()
        );

        let tuner = Tuner::new(self.config.tuner_config());
        let mut runs = Vec::with_capacity(datasets.len() * self.config.kernels.len());
        for dataset in datasets {
            let (train, test) = partition.apply(dataset)?;
            let counts = train.label_counts();
            let minority = train.minority_label();
            if counts.get(minority) == 0 {
                return Err(SVMError::InvalidDataset(format!(
                    "Training rows of '{}' hold only the '{}' label",
                    dataset.name(),
                    minority.other()
                )));
            }
            let weights = ClassWeights::for_minority(minority, self.config.minority_weight)?;
            info!(
                "'{}': {} present / {} absent in training, minority '{minority}' weighted {}",
                dataset.name(),
                counts.present,
                counts.absent,
                self.config.minority_weight
            );

            for &kind in &self.config.kernels {
                runs.push(self.run_pair(&tuner, &train, &test, kind, counts, weights)?);
            }
        }

        Ok(AnalysisOutcome { partition, runs })
    }

    fn run_pair(
        &self,
        tuner: &Tuner,
        train: &Dataset,
        test: &Dataset,
        kind: KernelKind,
        train_counts: LabelCounts,
        class_weights: ClassWeights,
    ) -> Result<ModelRun> {
        let tuning = tuner.tune(train, kind, &self.config.grid, class_weights)?;
        if tuning.best().degenerate_folds > 0 {
            warn!(
                "'{}' / {kind}: selected candidate had {} of {} folds scored by the '{}' fallback",
                train.name(),
                tuning.best().degenerate_folds,
                tuning.best().fold_scores.len(),
                self.config.degenerate_policy
            );
        }

        let model = SVM::new(kind)
            .with_hyperparameters(tuning.best_params())
            .with_class_weights(class_weights)
            .with_epsilon(self.config.optimizer.epsilon)
            .with_max_iterations(self.config.optimizer.max_iterations)
            .with_cache_size(self.config.optimizer.cache_size)
            .train(train)?;
        if !model.converged() {
            warn!(
                "'{}' / {kind}: final fit stopped before meeting the KKT tolerance ({} passes max)",
                train.name(),
                self.config.optimizer.max_iterations
            );
        }
        let evaluation = Evaluator::evaluate(&model, train, test)?;
        info!(
            "'{}' / {kind}: test accuracy {:.4}, minority accuracy {:.4}, AUC {:.4}",
            train.name(),
            evaluation.test.accuracy,
            evaluation.test.minority_accuracy,
            evaluation.test.auc
        );

        Ok(ModelRun {
            dataset: train.name().to_string(),
            kind,
            train_counts,
            class_weights,
            tuning,
            evaluation,
            model,
        })
    }
}
