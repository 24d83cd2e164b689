//! Hyperparameter selection by k-fold cross-validation
//!
//! Candidates are scored by `1 - F1` of the minority label on each held-out
//! fold and the candidate with the lowest mean wins.

pub mod grid;
pub mod kfold;
pub mod objective;
pub mod tuner;

pub use grid::ParameterGrid;
pub use kfold::KFold;
pub use objective::{f1_objective, DegenerateFoldPolicy, FoldScore};
pub use tuner::{CandidateScore, Tuner, TunerConfig, TuningResult};
