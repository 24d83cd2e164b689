//! Cross-validated grid search

use crate::api::SVM;
use crate::core::{ClassWeights, Label, OptimizerConfig, Result, SVMError};
use crate::data::Dataset;
use crate::kernel::{Hyperparameters, KernelKind};
use crate::metrics::ConfusionMatrix;
use crate::tuning::{f1_objective, DegenerateFoldPolicy, KFold, ParameterGrid};
use log::{debug, info, warn};
use serde::Serialize;

/// Configuration for [`Tuner`]
#[derive(Debug, Clone)]
pub struct TunerConfig {
    /// Number of folds
    pub folds: usize,
    /// Seed for fold assignment
    pub seed: u64,
    pub degenerate_policy: DegenerateFoldPolicy,
    /// Solver settings for every fold fit; `c` is taken from each candidate
    pub optimizer: OptimizerConfig,
}

impl Default for TunerConfig {
    fn default() -> Self {
        Self {
            folds: 10,
            seed: 1,
            degenerate_policy: DegenerateFoldPolicy::default(),
            optimizer: OptimizerConfig::default(),
        }
    }
}

/// Cross-validation outcome of one candidate
#[derive(Debug, Clone, Serialize)]
pub struct CandidateScore {
    pub params: Hyperparameters,
    /// Objective per fold; `None` for skipped folds
    pub fold_scores: Vec<Option<f64>>,
    /// Mean over scored folds; 1 when every fold was skipped
    pub mean: f64,
    /// Folds on which F1 was undefined
    pub degenerate_folds: usize,
    /// Fold fits that stopped before meeting the KKT tolerance
    pub unconverged_folds: usize,
}

/// All candidates of one grid search and the winner
#[derive(Debug, Clone, Serialize)]
pub struct TuningResult {
    pub kind: KernelKind,
    pub candidates: Vec<CandidateScore>,
    best_index: usize,
}

impl TuningResult {
    pub fn best(&self) -> &CandidateScore {
        &self.candidates[self.best_index]
    }

    pub fn best_params(&self) -> Hyperparameters {
        self.best().params
    }

    pub fn best_index(&self) -> usize {
        self.best_index
    }

    /// Degenerate folds summed over all candidates
    pub fn total_degenerate_folds(&self) -> usize {
        self.candidates.iter().map(|c| c.degenerate_folds).sum()
    }

    /// Unconverged fold fits summed over all candidates
    pub fn total_unconverged_folds(&self) -> usize {
        self.candidates.iter().map(|c| c.unconverged_folds).sum()
    }
}

/// Grid search scored by `1 - F1` of the minority label
pub struct Tuner {
    config: TunerConfig,
}

impl Tuner {
    pub fn new(config: TunerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TunerConfig {
        &self.config
    }

    /// Score every candidate of `grid` and pick the lowest mean objective
    ///
    /// All candidates see the same folds. Ties go to the candidate listed
    /// first in the grid.
    pub fn tune(
        &self,
        train: &Dataset,
        kind: KernelKind,
        grid: &ParameterGrid,
        weights: ClassWeights,
    ) -> Result<TuningResult> {
        let candidates = grid.candidates(kind)?;
        if candidates.is_empty() {
            return Err(SVMError::InvalidParameter("Empty parameter grid".to_string()));
        }

        let folds = KFold::new(self.config.folds)
            .with_random_state(self.config.seed)
            .split(train.len())?;
        let minority = train.minority_label();

        info!(
            "Tuning {kind} kernel on '{}': {} candidates x {} folds",
            train.name(),
            candidates.len(),
            folds.len()
        );

        let mut scores = Vec::with_capacity(candidates.len());
        let mut best_index = 0;
        let mut best_mean = f64::INFINITY;
        for (index, params) in candidates.into_iter().enumerate() {
            let score = self.score_candidate(train, kind, params, weights, minority, &folds)?;
            debug!(
                "{}: mean objective {:.4} ({} degenerate, {} unconverged folds)",
                params.describe(kind),
                score.mean,
                score.degenerate_folds,
                score.unconverged_folds
            );
            if score.mean < best_mean {
                best_mean = score.mean;
                best_index = index;
            }
            scores.push(score);
        }

        let result = TuningResult {
            kind,
            candidates: scores,
            best_index,
        };
        info!(
            "Selected {} (mean objective {:.4})",
            result.best_params().describe(kind),
            result.best().mean
        );
        Ok(result)
    }

    fn score_candidate(
        &self,
        train: &Dataset,
        kind: KernelKind,
        params: Hyperparameters,
        weights: ClassWeights,
        minority: Label,
        folds: &[(Vec<usize>, Vec<usize>)],
    ) -> Result<CandidateScore> {
        let svm = SVM::new(kind)
            .with_hyperparameters(params)
            .with_class_weights(weights)
            .with_epsilon(self.config.optimizer.epsilon)
            .with_max_iterations(self.config.optimizer.max_iterations)
            .with_cache_size(self.config.optimizer.cache_size);

        let mut fold_scores = Vec::with_capacity(folds.len());
        let mut degenerate_folds = 0;
        let mut unconverged_folds = 0;
        for (fold, (held_in, held_out)) in folds.iter().enumerate() {
            let model = svm.train(&train.subset(held_in))?;
            if !model.converged() {
                unconverged_folds += 1;
            }
            let validation = train.subset(held_out);
            let predicted: Vec<Label> = model
                .decision_values(&validation)
                .into_iter()
                .map(Label::from_decision)
                .collect();
            let confusion = ConfusionMatrix::from_labels(&validation.labels(), &predicted, minority)?;

            let score = f1_objective(&confusion, self.config.degenerate_policy);
            if score.degenerate {
                degenerate_folds += 1;
                warn!(
                    "F1 undefined on fold {} for {} ({} held-out minority, {} predicted); applying '{}' policy",
                    fold + 1,
                    params.describe(kind),
                    confusion.actual_positives(),
                    confusion.true_positives + confusion.false_positives,
                    self.config.degenerate_policy
                );
            }
            fold_scores.push(score.value);
        }

        if unconverged_folds > 0 {
            warn!(
                "{}: {unconverged_folds} of {} fold fits ended outside the KKT tolerance (max {} passes)",
                params.describe(kind),
                folds.len(),
                self.config.optimizer.max_iterations
            );
        }

        let scored: Vec<f64> = fold_scores.iter().flatten().copied().collect();
        let mean = if scored.is_empty() {
            1.0
        } else {
            scored.iter().sum::<f64>() / scored.len() as f64
        };

        Ok(CandidateScore {
            params,
            fold_scores,
            mean,
            degenerate_folds,
            unconverged_folds,
        })
    }
}
