//! Fixed-width console tables

use crate::evaluation::SubsetEvaluation;
use crate::metrics::ConfusionMatrix;
use crate::pipeline::{AnalysisOutcome, ModelRun};

/// 2x2 counts with actual labels as rows and predictions as columns
pub fn render_confusion(matrix: &ConfusionMatrix) -> String {
    let positive = matrix.positive.to_string();
    let negative = matrix.positive.other().to_string();
    [
        format!("{:>16} {:>10} {:>10}", "actual \\ pred", negative, positive),
        format!(
            "{:>16} {:>10} {:>10}",
            negative, matrix.true_negatives, matrix.false_positives
        ),
        format!(
            "{:>16} {:>10} {:>10}",
            positive, matrix.false_negatives, matrix.true_positives
        ),
    ]
    .iter()
    .map(|line| format!("{line}\n"))
    .collect()
}

fn render_subset(name: &str, subset: &SubsetEvaluation) -> String {
    let mut out = format!("  {name} ({} rows)\n", subset.n_samples);
    for line in render_confusion(&subset.confusion).lines() {
        out.push_str(&format!("  {line}\n"));
    }
    let f1 = subset
        .f1
        .map_or_else(|| "undefined".to_string(), |f| format!("{f:.4}"));
    out.push_str(&format!("    Accuracy:          {:.4}\n", subset.accuracy));
    out.push_str(&format!("    Majority accuracy: {:.4}\n", subset.majority_accuracy));
    out.push_str(&format!("    Minority accuracy: {:.4}\n", subset.minority_accuracy));
    out.push_str(&format!("    F1 (minority):     {f1}\n"));
    out.push_str(&format!("    ROC AUC:           {:.4}\n", subset.auc));
    out
}

/// Detailed block for one (table, kernel) run
pub fn render_run(run: &ModelRun) -> String {
    let eval = &run.evaluation;
    let best = run.tuning.best();
    let mut out = format!("=== {} / {} kernel ===\n", run.dataset, run.kind);
    out.push_str(&format!(
        "  Training labels: {} present, {} absent (minority '{}', weight {})\n",
        run.train_counts.present,
        run.train_counts.absent,
        eval.minority_label,
        run.class_weights.weight(eval.minority_label)
    ));
    out.push_str(&format!(
        "  Selected: {} (CV objective {:.4}, {} of {} folds degenerate, {} unconverged)\n",
        best.params.describe(run.kind),
        best.mean,
        best.degenerate_folds,
        best.fold_scores.len(),
        best.unconverged_folds
    ));
    out.push_str(&format!(
        "  Support vectors: {}, bias {:.6}{}\n",
        eval.model.n_support_vectors,
        eval.model.bias,
        if eval.model.converged { "" } else { " (not converged)" }
    ));
    out.push_str(&render_subset("Train", &eval.train));
    out.push_str(&render_subset("Test", &eval.test));
    out
}

/// One line per run
pub fn render_summary(outcome: &AnalysisOutcome) -> String {
    let mut out = format!(
        "{:<20} {:<11} {:<40} {:>9} {:>9} {:>9} {:>9} {:>8}\n",
        "Dataset", "Kernel", "Parameters", "Train acc", "Test acc", "Test maj", "Test min", "Test AUC"
    );
    out.push_str(&"-".repeat(122));
    out.push('\n');
    for run in &outcome.runs {
        let test = &run.evaluation.test;
        out.push_str(&format!(
            "{:<20} {:<11} {:<40} {:>9.4} {:>9.4} {:>9.4} {:>9.4} {:>8.4}\n",
            run.dataset,
            run.kind.to_string(),
            run.tuning.best_params().describe(run.kind),
            run.evaluation.train.accuracy,
            test.accuracy,
            test.majority_accuracy,
            test.minority_accuracy,
            test.auc
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Label;

    #[test]
    fn test_confusion_layout() {
        let matrix = ConfusionMatrix {
            positive: Label::Present,
            true_positives: 7,
            false_negatives: 3,
            false_positives: 12,
            true_negatives: 78,
        };
        let text = render_confusion(&matrix);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("absent    present"));
        assert!(lines[1].trim_start().starts_with("absent"));
        assert!(lines[1].ends_with("78         12"));
        assert!(lines[2].ends_with("3          7"));
    }

    #[test]
    fn test_summary_header_without_runs() {
        let outcome = AnalysisOutcome {
            partition: crate::data::Partition::draw(10, 0.8, 1).unwrap(),
            runs: Vec::new(),
        };
        let text = render_summary(&outcome);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Dataset"));
        assert!(lines[0].ends_with("Test AUC"));
        assert_eq!(lines[1], "-".repeat(122));
        assert!(text.ends_with('\n'));
    }
}
