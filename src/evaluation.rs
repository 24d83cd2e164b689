//! Train/test evaluation of a fitted classifier
//!
//! Counts are taken relative to the minority label of the training subset,
//! so "positive" always means the rarer outcome the class weights were
//! chosen to protect.

use crate::api::{ModelInfo, TrainedModel};
use crate::core::{Label, Result};
use crate::data::Dataset;
use crate::metrics::{ConfusionMatrix, RocCurve};
use log::debug;
use serde::Serialize;

/// Metrics for one subset (train or test)
#[derive(Debug, Clone, Serialize)]
pub struct SubsetEvaluation {
    pub n_samples: usize,
    pub confusion: ConfusionMatrix,
    pub accuracy: f64,
    /// True-negative rate
    pub majority_accuracy: f64,
    /// True-positive rate
    pub minority_accuracy: f64,
    pub f1: Option<f64>,
    pub roc: RocCurve,
    pub auc: f64,
}

impl SubsetEvaluation {
    fn compute(model: &TrainedModel, dataset: &Dataset, minority: Label) -> Result<Self> {
        let actual = dataset.labels();
        let decisions = model.decision_values(dataset);
        let predicted: Vec<Label> = decisions.iter().map(|&d| Label::from_decision(d)).collect();

        let confusion = ConfusionMatrix::from_labels(&actual, &predicted, minority)?;

        // Decision values grow toward Present; flip them when Absent is rarer
        let scores: Vec<f64> = decisions.iter().map(|&d| d * minority.sign()).collect();
        let roc = RocCurve::from_scores(&scores, &actual, minority)?;
        let auc = roc.auc();

        Ok(Self {
            n_samples: dataset.len(),
            accuracy: confusion.accuracy(),
            majority_accuracy: confusion.majority_accuracy(),
            minority_accuracy: confusion.minority_accuracy(),
            f1: confusion.f1_score(),
            confusion,
            roc,
            auc,
        })
    }

    /// Whether every prediction fell on one label
    pub fn predicts_single_class(&self) -> bool {
        let c = &self.confusion;
        c.true_positives + c.false_positives == 0 || c.true_negatives + c.false_negatives == 0
    }
}

/// Evaluation of one trained model on its partition
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub dataset: String,
    pub minority_label: Label,
    pub model: ModelInfo,
    pub train: SubsetEvaluation,
    pub test: SubsetEvaluation,
}

/// Computes [`EvaluationReport`]s
pub struct Evaluator;

impl Evaluator {
    pub fn evaluate(model: &TrainedModel, train: &Dataset, test: &Dataset) -> Result<EvaluationReport> {
        let minority = train.minority_label();
        let train_eval = SubsetEvaluation::compute(model, train, minority)?;
        let test_eval = SubsetEvaluation::compute(model, test, minority)?;

        debug!(
            "{} / {}: train accuracy {:.4}, test accuracy {:.4}, test AUC {:.4}",
            train.name(),
            model.kind(),
            train_eval.accuracy,
            test_eval.accuracy,
            test_eval.auc
        );

        Ok(EvaluationReport {
            dataset: train.name().to_string(),
            minority_label: minority,
            model: model.info(),
            train: train_eval,
            test: test_eval,
        })
    }
}
