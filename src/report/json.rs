//! Machine-readable analysis report

use crate::core::Result;
use crate::pipeline::{AnalysisConfig, AnalysisOutcome, ModelRun};
use crate::tuning::DegenerateFoldPolicy;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Run settings recorded alongside the results
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub library_version: String,
    pub created_at: String,
    pub seed: u64,
    pub train_fraction: f64,
    pub folds: usize,
    pub minority_weight: f64,
    pub degenerate_policy: DegenerateFoldPolicy,
    pub n_rows: usize,
    pub n_train: usize,
    pub n_test: usize,
}

/// JSON document written by `analyze --json`
#[derive(Serialize)]
pub struct AnalysisReport<'a> {
    pub metadata: ReportMetadata,
    pub runs: &'a [ModelRun],
}

impl<'a> AnalysisReport<'a> {
    pub fn new(config: &AnalysisConfig, outcome: &'a AnalysisOutcome) -> Self {
        Self {
            metadata: ReportMetadata {
                library_version: env!("CARGO_PKG_VERSION").to_string(),
                created_at: chrono::Utc::now().to_rfc3339(),
                seed: config.seed,
                train_fraction: config.train_fraction,
                folds: config.folds,
                minority_weight: config.minority_weight,
                degenerate_policy: config.degenerate_policy,
                n_rows: outcome.partition.n_rows(),
                n_train: outcome.partition.train_indices().len(),
                n_test: outcome.partition.test_indices().len(),
            },
            runs: &outcome.runs,
        }
    }

    pub fn write<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Save report to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
