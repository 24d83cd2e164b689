//! Per-fold tuning objective

use crate::metrics::ConfusionMatrix;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What to do with a fold whose F1 score is undefined
///
/// F1 is undefined when a held-out fold has no predicted minority, no
/// actual minority, or zero precision and recall. Small imbalanced folds
/// hit this often.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegenerateFoldPolicy {
    /// Score the fold 0, as if it were perfectly classified
    ///
    /// Can reward candidates that never predict the minority label, so
    /// every use is logged and counted.
    #[default]
    Perfect,
    /// Score the fold 1
    Worst,
    /// Leave the fold out of the mean
    Skip,
}

impl fmt::Display for DegenerateFoldPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DegenerateFoldPolicy::Perfect => "perfect",
            DegenerateFoldPolicy::Worst => "worst",
            DegenerateFoldPolicy::Skip => "skip",
        };
        write!(f, "{name}")
    }
}

impl FromStr for DegenerateFoldPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "perfect" => Ok(DegenerateFoldPolicy::Perfect),
            "worst" => Ok(DegenerateFoldPolicy::Worst),
            "skip" => Ok(DegenerateFoldPolicy::Skip),
            other => Err(format!("unknown degenerate fold policy '{other}'")),
        }
    }
}

/// Objective value of one held-out fold
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FoldScore {
    /// `1 - F1`, or the policy's substitute; `None` when skipped
    pub value: Option<f64>,
    /// F1 was undefined on this fold
    pub degenerate: bool,
}

/// `1 - F1` of the matrix's positive label, in `[0, 1]`
pub fn f1_objective(confusion: &ConfusionMatrix, policy: DegenerateFoldPolicy) -> FoldScore {
    match confusion.f1_score() {
        Some(f1) => FoldScore {
            value: Some((1.0 - f1).clamp(0.0, 1.0)),
            degenerate: false,
        },
        None => FoldScore {
            value: match policy {
                DegenerateFoldPolicy::Perfect => Some(0.0),
                DegenerateFoldPolicy::Worst => Some(1.0),
                DegenerateFoldPolicy::Skip => None,
            },
            degenerate: true,
        },
    }
}
