//! Core type definitions for the survey SVM

use crate::core::{Result, SVMError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary outcome of a survey record: whether the condition is present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Absent,
    Present,
}

impl Label {
    /// Signed encoding used by the solver (+1 / -1)
    pub fn sign(self) -> f64 {
        match self {
            Label::Present => 1.0,
            Label::Absent => -1.0,
        }
    }

    /// Label on the non-negative side of a decision value
    pub fn from_decision(value: f64) -> Self {
        if value >= 0.0 {
            Label::Present
        } else {
            Label::Absent
        }
    }

    /// The opposite label
    pub fn other(self) -> Self {
        match self {
            Label::Present => Label::Absent,
            Label::Absent => Label::Present,
        }
    }

    /// Parse a label cell as written by the cleaning step
    ///
    /// Accepts `1/0`, `+1/-1`, `yes/no`, `true/false` and `present/absent`,
    /// case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "+1" | "1.0" | "yes" | "y" | "true" | "present" => Some(Label::Present),
            "0" | "-1" | "0.0" | "-1.0" | "no" | "n" | "false" | "absent" => Some(Label::Absent),
            _ => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Present => write!(f, "present"),
            Label::Absent => write!(f, "absent"),
        }
    }
}

/// Prediction result containing label and decision value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted label
    pub label: Label,
    /// Raw decision function value
    pub decision_value: f64,
}

impl Prediction {
    /// Create a prediction from a decision value
    pub fn from_decision(decision_value: f64) -> Self {
        Self {
            label: Label::from_decision(decision_value),
            decision_value,
        }
    }

    /// Get confidence as absolute value of decision value
    pub fn confidence(&self) -> f64 {
        self.decision_value.abs()
    }
}

/// One survey respondent: dense numeric features and the outcome label
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub features: Vec<f64>,
    pub label: Label,
}

impl Sample {
    /// Create a new sample
    pub fn new(features: Vec<f64>, label: Label) -> Self {
        Self { features, label }
    }
}

/// Per-label penalty multipliers applied to the cost parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassWeights {
    pub absent: f64,
    pub present: f64,
}

impl ClassWeights {
    /// Weights must be strictly positive and finite
    pub fn new(absent: f64, present: f64) -> Result<Self> {
        for (label, w) in [(Label::Absent, absent), (Label::Present, present)] {
            if !(w.is_finite() && w > 0.0) {
                return Err(SVMError::InvalidParameter(format!(
                    "Class weight for {label} must be positive, got: {w}"
                )));
            }
        }
        Ok(Self { absent, present })
    }

    /// Both labels weighted equally
    pub fn uniform() -> Self {
        Self {
            absent: 1.0,
            present: 1.0,
        }
    }

    /// Majority label at weight 1, minority label at `minority_weight`
    ///
    /// Fails unless `minority_weight > 1`, since the map has to push
    /// the margin toward the minority class.
    pub fn for_minority(minority: Label, minority_weight: f64) -> Result<Self> {
        let weights = match minority {
            Label::Present => Self::new(1.0, minority_weight)?,
            Label::Absent => Self::new(minority_weight, 1.0)?,
        };
        weights.check_counteracts(minority)?;
        Ok(weights)
    }

    /// Weight for a label
    pub fn weight(&self, label: Label) -> f64 {
        match label {
            Label::Present => self.present,
            Label::Absent => self.absent,
        }
    }

    /// Ensure the minority label outweighs the majority label
    pub fn check_counteracts(&self, minority: Label) -> Result<()> {
        if self.weight(minority) > self.weight(minority.other()) {
            Ok(())
        } else {
            Err(SVMError::InvalidParameter(format!(
                "Minority label '{minority}' weight {} must exceed majority weight {}",
                self.weight(minority),
                self.weight(minority.other())
            )))
        }
    }
}

impl Default for ClassWeights {
    fn default() -> Self {
        Self::uniform()
    }
}

/// Result of optimization process
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Lagrange multipliers (alpha values)
    pub alpha: Vec<f64>,
    /// Bias term (b)
    pub b: f64,
    /// Indices of support vectors (where alpha > 0)
    pub support_vectors: Vec<usize>,
    /// Number of passes performed
    pub iterations: usize,
    /// Whether the KKT conditions were met before the iteration cap
    pub converged: bool,
}

/// Configuration for optimizer
#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    /// Regularization parameter (upper bound for alpha before weighting)
    pub c: f64,
    /// Tolerance for KKT conditions
    pub epsilon: f64,
    /// Maximum number of passes over the data
    pub max_iterations: usize,
    /// Kernel cache size in bytes
    pub cache_size: usize,
    /// Per-label multipliers on `c`
    pub class_weights: ClassWeights,
}

impl OptimizerConfig {
    /// Box constraint for a sample with the given label
    pub fn upper_bound(&self, label: Label) -> f64 {
        self.c * self.class_weights.weight(label)
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            epsilon: 0.001,
            max_iterations: 1000,
            cache_size: 100_000_000, // 100MB
            class_weights: ClassWeights::uniform(),
        }
    }
}
