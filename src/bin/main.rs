//! healthsvm Command Line Interface
//!
//! Runs the survey analysis (partition, tune, train, evaluate) and writes
//! decision-boundary slices for plotting.

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use healthsvm::core::{ClassWeights, OptimizerConfig, Result};
use healthsvm::report::{self, AnalysisReport, DecisionBoundarySlice};
use healthsvm::{
    Analysis, AnalysisConfig, Dataset, DegenerateFoldPolicy, Hyperparameters, KernelKind,
    ParameterGrid, Partition, Schema, Target, SVM,
};
use log::{error, info, warn};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "healthsvm")]
#[command(about = "Cost-sensitive SVM analysis of health survey data")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Tune, train and evaluate one classifier per dataset and kernel
    Analyze(AnalyzeArgs),
    /// Write a two-feature decision boundary slice as CSV
    Boundary(BoundaryArgs),
}

#[derive(Args)]
struct SolverArgs {
    /// Convergence tolerance
    #[arg(short, long, default_value = "0.001")]
    epsilon: f64,

    /// Maximum passes over the training data
    #[arg(short, long, default_value = "1000")]
    max_iterations: usize,

    /// Kernel cache size in MB
    #[arg(long, default_value = "100")]
    cache_size: usize,
}

impl SolverArgs {
    fn optimizer_config(&self) -> OptimizerConfig {
        OptimizerConfig {
            epsilon: self.epsilon,
            max_iterations: self.max_iterations,
            cache_size: self.cache_size * 1024 * 1024, // Convert MB to bytes
            ..OptimizerConfig::default()
        }
    }
}

#[derive(Args)]
struct PartitionArgs {
    /// Seed for the train/test partition and fold assignment
    #[arg(long, default_value = "1")]
    seed: u64,

    /// Fraction of rows used for training
    #[arg(long, default_value = "0.8")]
    train_fraction: f64,

    /// Penalty multiplier for the minority label (majority gets 1)
    #[arg(long, default_value = "10")]
    minority_weight: f64,

    /// Feature columns (defaults to the standard survey columns)
    #[arg(long, value_delimiter = ',')]
    features: Vec<String>,
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Dataset as CONDITION=PATH, where CONDITION names the label column
    #[arg(long = "dataset", required = true)]
    datasets: Vec<String>,

    /// Kernel kinds to fit
    #[arg(long = "kernel", value_delimiter = ',', default_values = ["linear", "polynomial", "radial"])]
    kernels: Vec<CliKernel>,

    #[command(flatten)]
    partition: PartitionArgs,

    /// Number of cross-validation folds
    #[arg(long, default_value = "10")]
    folds: usize,

    /// Candidate costs
    #[arg(long = "cost", value_delimiter = ',')]
    costs: Vec<f64>,

    /// Candidate polynomial degrees
    #[arg(long = "degree", value_delimiter = ',')]
    degrees: Vec<u32>,

    /// Candidate polynomial offsets
    #[arg(long = "coef0", value_delimiter = ',', allow_negative_numbers = true)]
    coef0s: Vec<f64>,

    /// Candidate gammas
    #[arg(long = "gamma", value_delimiter = ',')]
    gammas: Vec<f64>,

    /// Scoring of folds where F1 is undefined
    #[arg(long, default_value = "perfect")]
    degenerate_folds: CliDegeneratePolicy,

    #[command(flatten)]
    solver: SolverArgs,

    /// Print confusion matrices and tuning details for every run
    #[arg(long)]
    detailed: bool,

    /// Write a JSON report to this file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write train/test ROC points as CSV files into this directory
    #[arg(long)]
    roc_dir: Option<PathBuf>,
}

#[derive(Args)]
struct BoundaryArgs {
    /// Dataset as CONDITION=PATH
    #[arg(long)]
    dataset: String,

    /// Kernel kind
    #[arg(long, default_value = "radial")]
    kernel: CliKernel,

    #[command(flatten)]
    partition: PartitionArgs,

    /// Margin penalty C
    #[arg(long, default_value = "1.0")]
    cost: f64,

    /// Polynomial degree
    #[arg(long, default_value = "3")]
    degree: u32,

    /// Polynomial offset
    #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
    coef0: f64,

    /// Kernel gamma (defaults to 1 / number of features)
    #[arg(long)]
    gamma: Option<f64>,

    /// Feature on the horizontal axis
    #[arg(long)]
    x_feature: String,

    /// Feature on the vertical axis
    #[arg(long)]
    y_feature: String,

    /// Grid points per axis
    #[arg(long, default_value = "50")]
    resolution: usize,

    /// Output CSV file
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    solver: SolverArgs,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliKernel {
    /// Separating hyperplane
    Linear,
    /// (gamma * x.y + coef0)^degree
    Polynomial,
    /// exp(-gamma * |x - y|^2)
    Radial,
}

impl From<CliKernel> for KernelKind {
    fn from(cli_kernel: CliKernel) -> Self {
        match cli_kernel {
            CliKernel::Linear => KernelKind::Linear,
            CliKernel::Polynomial => KernelKind::Polynomial,
            CliKernel::Radial => KernelKind::Radial,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliDegeneratePolicy {
    /// Score the fold as perfect (0)
    Perfect,
    /// Score the fold as worst (1)
    Worst,
    /// Leave the fold out of the mean
    Skip,
}

impl From<CliDegeneratePolicy> for DegenerateFoldPolicy {
    fn from(cli_policy: CliDegeneratePolicy) -> Self {
        match cli_policy {
            CliDegeneratePolicy::Perfect => DegenerateFoldPolicy::Perfect,
            CliDegeneratePolicy::Worst => DegenerateFoldPolicy::Worst,
            CliDegeneratePolicy::Skip => DegenerateFoldPolicy::Skip,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Analyze(args) => analyze_command(args),
        Commands::Boundary(args) => boundary_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn analyze_command(args: AnalyzeArgs) -> Result<()> {
    let targets = args
        .datasets
        .iter()
        .map(|arg| Target::parse(arg))
        .collect::<Result<Vec<_>>>()?;

    let mut grid = ParameterGrid::default();
    if !args.costs.is_empty() {
        grid = grid.with_costs(args.costs.clone());
    }
    if !args.degrees.is_empty() {
        grid = grid.with_degrees(args.degrees.clone());
    }
    if !args.coef0s.is_empty() {
        grid = grid.with_coef0s(args.coef0s.clone());
    }
    if !args.gammas.is_empty() {
        grid = grid.with_gammas(args.gammas.clone());
    }

    let config = AnalysisConfig::new(targets)
        .with_kernels(args.kernels.iter().map(|&k| k.into()).collect())
        .with_features(args.partition.features.clone())
        .with_seed(args.partition.seed)
        .with_train_fraction(args.partition.train_fraction)
        .with_minority_weight(args.partition.minority_weight)
        .with_grid(grid)
        .with_folds(args.folds)
        .with_degenerate_policy(args.degenerate_folds.into())
        .with_optimizer(args.solver.optimizer_config());

    info!(
        "Analyzing {} dataset(s) with seed {}, train fraction {}, {} folds",
        config.targets.len(),
        config.seed,
        config.train_fraction,
        config.folds
    );

    let outcome = Analysis::new(config.clone()).run()?;

    if args.detailed {
        for run in &outcome.runs {
            println!("{}", report::render_run(run));
        }
    }
    print!("{}", report::render_summary(&outcome));

    if let Some(path) = &args.json {
        AnalysisReport::new(&config, &outcome).save_to_file(path)?;
        info!("Report saved to: {path:?}");
    }

    if let Some(dir) = &args.roc_dir {
        for run in &outcome.runs {
            for path in report::save_run_roc(run, dir)? {
                info!("ROC points saved to: {path:?}");
            }
        }
    }

    Ok(())
}

fn boundary_command(args: BoundaryArgs) -> Result<()> {
    let target = Target::parse(&args.dataset)?;
    let schema = if args.partition.features.is_empty() {
        Schema::survey(&target.condition)
    } else {
        Schema::new(args.partition.features.clone(), target.condition.as_str())
    };

    let dataset = Dataset::from_csv(&target.path, &schema)?;
    info!("Loaded {} rows from {:?}", dataset.len(), target.path);

    let partition = Partition::draw(
        dataset.len(),
        args.partition.train_fraction,
        args.partition.seed,
    )?;
    let (train, _) = partition.apply(&dataset)?;

    let kind: KernelKind = args.kernel.into();
    let params = Hyperparameters {
        cost: args.cost,
        degree: args.degree,
        coef0: args.coef0,
        gamma: args
            .gamma
            .unwrap_or_else(|| Hyperparameters::for_features(train.dim()).gamma),
    };
    let weights = ClassWeights::for_minority(train.minority_label(), args.partition.minority_weight)?;
    let solver = args.solver.optimizer_config();

    info!("Training {kind} kernel with {}", params.describe(kind));
    let model = SVM::new(kind)
        .with_hyperparameters(params)
        .with_class_weights(weights)
        .with_epsilon(solver.epsilon)
        .with_max_iterations(solver.max_iterations)
        .with_cache_size(solver.cache_size)
        .train(&train)?;
    if !model.converged() {
        warn!(
            "Training stopped before meeting the KKT tolerance ({} passes max)",
            solver.max_iterations
        );
    }

    let slice = DecisionBoundarySlice::compute(
        &model,
        &train,
        &args.x_feature,
        &args.y_feature,
        args.resolution,
    )?;
    slice.save_csv(&args.output)?;

    for (name, value) in &slice.fixed {
        info!("Held {name} at {value}");
    }
    println!(
        "Wrote {} x {} slice of {} vs {} to {:?}",
        slice.resolution, slice.resolution, slice.x_feature, slice.y_feature, args.output
    );
    Ok(())
}
