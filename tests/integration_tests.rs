//! Integration tests for the healthsvm library
//!
//! These tests drive the public API end to end: CSV loading, the shared
//! partition, class-weighted training, tuning and the report exports.

use healthsvm::api::SVM;
use healthsvm::data::{Dataset, Partition, Schema};
use healthsvm::report::{self, AnalysisReport, DecisionBoundarySlice};
use healthsvm::{
    Analysis, AnalysisConfig, ClassWeights, Evaluator, Hyperparameters, KernelKind, Label,
    ParameterGrid, SVMModel, Target,
};
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};

const HEADER: &str = "bmi,weight,height,age,hours_worked,alcohol_days";

/// Survey rows where every `stride`-th respondent has the condition and a
/// clearly higher BMI; the other columns are unrelated to the label.
fn survey_csv(condition: &str, n: usize, stride: usize) -> String {
    let mut out = format!("{HEADER},{condition}\n");
    for i in 0..n {
        let present = i % stride == 0;
        let base = if present { 38.0 } else { 20.0 };
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            base + (i % 7) as f64,
            140 + (i * 7) % 60,
            60 + i % 14,
            20 + (i * 3) % 55,
            25 + i % 30,
            (i * 11) % 90,
            if present { "yes" } else { "no" }
        ));
    }
    out
}

fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write");
    path
}

fn load(condition: &str, n: usize, stride: usize) -> Dataset {
    let mut file = NamedTempFile::with_suffix(".csv").expect("Failed to create temp file");
    file.write_all(survey_csv(condition, n, stride).as_bytes())
        .expect("Failed to write");
    file.flush().expect("Failed to flush");
    Dataset::from_csv(file.path(), &Schema::survey(condition)).expect("Loading should succeed")
}

/// 100 rows in ten risk bands; the condition only appears in the top four
/// bands and never makes up a clear majority below the highest one
fn overlapping_survey_csv(condition: &str) -> String {
    // (rows, of which present) per band
    const BANDS: [(usize, usize); 10] = [
        (12, 0),
        (12, 0),
        (12, 0),
        (12, 0),
        (12, 0),
        (10, 0),
        (10, 1),
        (8, 2),
        (7, 3),
        (5, 4),
    ];
    let mut out = format!("{HEADER},{condition}\n");
    for (band, &(rows, present)) in BANDS.iter().enumerate() {
        for row in 0..rows {
            out.push_str(&format!(
                "{},{},66,45,40,10,{}\n",
                20 + band,
                150 + 5 * band,
                if row < present { "yes" } else { "no" }
            ));
        }
    }
    out
}

/// 90 majority / 10 minority with overlapping classes and weights {1, 10}:
/// every kernel must predict both labels, and the minority weight must buy
/// more minority predictions than uniform weights
#[test]
fn test_imbalanced_training_predicts_both_classes() {
    let mut file = NamedTempFile::with_suffix(".csv").expect("Failed to create temp file");
    file.write_all(overlapping_survey_csv("diabetes").as_bytes())
        .expect("Failed to write");
    file.flush().expect("Failed to flush");
    let dataset = Dataset::from_csv(file.path(), &Schema::survey("diabetes")).unwrap();

    let counts = dataset.label_counts();
    assert_eq!(counts.present, 10);
    assert_eq!(counts.absent, 90);
    assert_eq!(dataset.minority_label(), Label::Present);

    let params = Hyperparameters::for_features(dataset.dim());
    let weighted = ClassWeights::for_minority(Label::Present, 10.0).unwrap();

    for kind in [KernelKind::Linear, KernelKind::Polynomial, KernelKind::Radial] {
        let minority_predictions = |weights: ClassWeights| {
            let model = SVM::new(kind)
                .with_hyperparameters(params)
                .with_class_weights(weights)
                .train(&dataset)
                .expect("Training should succeed");
            assert!(model.n_support_vectors() > 0, "{kind}: no support vectors");
            model
                .predict_batch(dataset.samples())
                .iter()
                .filter(|p| p.label == Label::Present)
                .count()
        };

        let with_weights = minority_predictions(weighted);
        let uniform = minority_predictions(ClassWeights::uniform());

        assert!(with_weights > 0, "{kind}: no minority predictions");
        assert!(with_weights < dataset.len(), "{kind}: no majority predictions");
        assert!(
            with_weights > uniform,
            "{kind}: weighted {with_weights} vs uniform {uniform} minority predictions"
        );
    }

    let model = SVM::new(KernelKind::Linear)
        .with_class_weights(weighted)
        .train(&dataset)
        .unwrap();
    let report = Evaluator::evaluate(&model, &dataset, &dataset).unwrap();
    assert_eq!(report.train.confusion.actual_positives(), 10);
    assert!(!report.train.predicts_single_class());
}

#[test]
fn test_shared_partition_keeps_tables_aligned() {
    let cancer = load("cancer", 60, 6);
    let diabetes = load("diabetes", 60, 4);

    let n_rows = Partition::validate_aligned(&[&cancer, &diabetes]).unwrap();
    let first = Partition::draw(n_rows, 0.8, 2024).unwrap();
    let second = Partition::draw(n_rows, 0.8, 2024).unwrap();
    assert_eq!(first, second);

    let (cancer_train, cancer_test) = first.apply(&cancer).unwrap();
    let (diabetes_train, diabetes_test) = first.apply(&diabetes).unwrap();
    assert_eq!(cancer_train.len(), 48);
    assert_eq!(diabetes_test.len(), 12);

    // Same respondents: the feature columns are identical row by row
    for (a, b) in cancer_train.samples().iter().zip(diabetes_train.samples()) {
        assert_eq!(a.features, b.features);
    }
    for (a, b) in cancer_test.samples().iter().zip(diabetes_test.samples()) {
        assert_eq!(a.features, b.features);
    }

    let shorter = load("cancer", 59, 6);
    assert!(first.apply(&shorter).is_err());
}

#[test]
fn test_roc_endpoints_on_real_model() {
    let dataset = load("cancer", 80, 8);
    let model = SVM::new(KernelKind::Radial)
        .with_class_weights(ClassWeights::for_minority(Label::Present, 10.0).unwrap())
        .train(&dataset)
        .unwrap();

    let report = Evaluator::evaluate(&model, &dataset, &dataset).unwrap();
    let points = report.test.roc.points();
    let first = points[0];
    let last = points[points.len() - 1];
    assert_eq!((first.false_positive_rate, first.true_positive_rate), (0.0, 0.0));
    assert_eq!((last.false_positive_rate, last.true_positive_rate), (1.0, 1.0));
    assert!((0.0..=1.0).contains(&report.test.auc));
}

#[test]
fn test_full_analysis_with_exports() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let cancer = write_file(dir.path(), "cancer.csv", &survey_csv("cancer", 100, 8));
    let diabetes = write_file(dir.path(), "diabetes_a.csv", &survey_csv("diabetes", 100, 10));

    let config = AnalysisConfig::new(vec![
        Target::new("cancer", cancer),
        Target::new("diabetes", diabetes),
    ])
    .with_kernels(vec![KernelKind::Linear])
    .with_grid(ParameterGrid::default().with_costs(vec![0.1, 1.0]))
    .with_folds(4)
    .with_seed(7);

    let outcome = Analysis::new(config.clone()).run().expect("Analysis should succeed");
    assert_eq!(outcome.runs.len(), 2);
    assert_eq!(outcome.runs[0].dataset, "cancer");
    assert_eq!(outcome.runs[1].dataset, "diabetes_a");

    for run in &outcome.runs {
        assert_eq!(run.tuning.candidates.len(), 2);
        assert!((0.0..=1.0).contains(&run.tuning.best().mean));
        assert_eq!(
            run.evaluation.train.n_samples + run.evaluation.test.n_samples,
            100
        );
        for subset in [&run.evaluation.train, &run.evaluation.test] {
            assert!((0.0..=1.0).contains(&subset.majority_accuracy));
            assert!((0.0..=1.0).contains(&subset.minority_accuracy));
        }
    }

    // JSON report
    let json_path = dir.path().join("report.json");
    AnalysisReport::new(&config, &outcome)
        .save_to_file(&json_path)
        .unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value["metadata"]["seed"], 7);
    assert_eq!(value["metadata"]["n_train"], 80);
    assert_eq!(value["runs"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["runs"][0]["kind"], "linear");

    // ROC exports
    let roc_dir = dir.path().join("roc");
    let written = report::save_run_roc(&outcome.runs[0], &roc_dir).unwrap();
    assert_eq!(written.len(), 2);
    let text = std::fs::read_to_string(roc_dir.join("cancer_linear_test_roc.csv")).unwrap();
    assert!(text.starts_with("false_positive_rate,true_positive_rate,threshold"));

    // Console rendering
    let summary = report::render_summary(&outcome);
    assert!(summary.contains("diabetes_a"));
    let detail = report::render_run(&outcome.runs[1]);
    assert!(detail.contains("Minority accuracy"));
    assert!(detail.contains("unconverged"));
}

#[test]
fn test_boundary_slice_from_trained_model() {
    let dataset = load("diabetes", 60, 5);
    let model = SVM::new(KernelKind::Linear)
        .with_class_weights(ClassWeights::for_minority(Label::Present, 5.0).unwrap())
        .train(&dataset)
        .unwrap();

    let slice = DecisionBoundarySlice::compute(&model, &dataset, "bmi", "age", 10).unwrap();
    assert_eq!(slice.cells.len(), 100);
    assert_eq!(slice.fixed.len(), 4);

    // BMI drives the label, so both sides of the boundary appear
    assert!(slice.cells.iter().any(|c| c.label == Label::Present));
    assert!(slice.cells.iter().any(|c| c.label == Label::Absent));
}

#[test]
fn test_load_errors() {
    let dir = TempDir::new().unwrap();
    let wrong = write_file(dir.path(), "wrong.csv", "bmi,weight,diabetes\n1,2,0\n");
    assert!(Dataset::from_csv(&wrong, &Schema::survey("diabetes")).is_err());

    let missing = dir.path().join("missing.csv");
    assert!(Dataset::from_csv(&missing, &Schema::survey("diabetes")).is_err());

    let result = Analysis::new(AnalysisConfig::new(vec![Target::new("diabetes", missing)])).run();
    assert!(result.is_err());
}
