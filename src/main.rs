use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ferrite_tune::{
    data::{labeled_loader, read_and_split_data, two_blobs, RawData},
    report::print_top,
    train::class_of,
    tuning::TuningResults,
    Adam, BceLoss, BinaryClassifier, Context, FitConfig, FoldInit, TuningConfig,
    kfold_tuning,
};

/// Grid search over a small binary classifier, scored by stratified k-fold
/// cross-validation.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Training CSV with a header row; synthetic data is used when omitted
    #[arg(long, value_name = "PATH")]
    data: Option<PathBuf>,
    /// Unlabelled test CSV with the same feature columns
    #[arg(long, value_name = "PATH")]
    test_data: Option<PathBuf>,
    #[arg(long, default_value = "label")]
    label_column: String,
    /// JSON tuning config; flags below override it
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    #[arg(long, value_name = "INT")]
    folds: Option<usize>,
    #[arg(long, value_name = "INT")]
    seed: Option<u64>,
    #[arg(long, value_enum)]
    fold_init: Option<FoldInit>,
    /// Rows shown in the result table
    #[arg(long, value_name = "INT")]
    top: Option<usize>,
    /// Write every result row to this JSON file
    #[arg(long, value_name = "PATH")]
    results_json: Option<PathBuf>,
    /// Retrain the best combination on an 80/20 holdout and plot its curves
    #[arg(long)]
    refit: bool,
    #[arg(long, value_name = "INT", default_value_t = 200)]
    synthetic_rows: usize,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => TuningConfig::load_json(path)?,
        None => TuningConfig::default(),
    };
    if let Some(folds) = cli.folds {
        config.n_splits = folds;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(fold_init) = cli.fold_init {
        config.fold_init = fold_init;
    }
    if let Some(top) = cli.top {
        config.top = top;
    }

    let mut ctx = Context::new(config.seed);
    let data = load_data(&cli, &mut ctx)?;

    let grid = config.grid_for(data.x_train.cols);
    let results = kfold_tuning(&data.x_train, &data.y_train, &grid, &config.options(), &mut ctx)?;
    print_top(&results, config.top)?;

    if let Some(path) = &cli.results_json {
        results.save_json(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("wrote {} result rows to {}", results.len(), path.display());
    }

    if cli.refit {
        refit_best(&data, &results, &config, &mut ctx)?;
    }
    Ok(())
}

fn load_data(cli: &Cli, ctx: &mut Context) -> Result<RawData> {
    match &cli.data {
        Some(path) => read_and_split_data(path, cli.test_data.as_deref(), &cli.label_column),
        None => {
            info!(rows = cli.synthetic_rows, "no --data given, using synthetic two-blob data");
            let (x_train, y_train) = two_blobs(cli.synthetic_rows, 5, ctx.rng());
            Ok(RawData {
                feature_names: (1..=5).map(|i| format!("x{}", i)).collect(),
                x_train,
                y_train,
                x_test: None,
            })
        }
    }
}

/// Trains the top combination once with a held-out validation split so its
/// learning curves can be inspected.
fn refit_best(data: &RawData, results: &TuningResults, config: &TuningConfig, ctx: &mut Context) -> Result<()> {
    let Some(best) = results.best() else {
        return Ok(());
    };
    let params = best.params;
    info!("refitting best combination: {}", params);

    let holdout = config.holdout_splitter().split(&data.y_train)?;
    let split = &holdout[0];
    let x_train = data.x_train.select_rows(&split.train);
    let x_val = data.x_train.select_rows(&split.validation);
    let y_train: Vec<f64> = split.train.iter().map(|&r| data.y_train[r]).collect();
    let y_val: Vec<f64> = split.validation.iter().map(|&r| data.y_train[r]).collect();

    let mut model = BinaryClassifier::new(params.classifier_spec(), ctx.rng())?;
    let mut train_loader = labeled_loader(&x_train, &y_train, params.batch_size, ctx)?;
    let mut val_loader = labeled_loader(&x_val, &y_val, 1, ctx)?;
    let mut optimizer = Adam::new(params.learning_rate);

    let history = model.fit(
        &mut train_loader,
        &BceLoss::new(),
        &mut optimizer,
        &FitConfig::new(params.epochs).verbose(1),
        Some(&mut val_loader),
    )?;
    let (train_acc, val_acc) = model.evaluate(&x_train, &x_val, &y_train, &y_val)?;
    info!("holdout train_acc: {:.3}, val_acc: {:.3}", train_acc, val_acc);
    model.plot_acc_loss(&history)?;

    if let Some(x_test) = &data.x_test {
        let predicted: Vec<f64> = model.predict_proba(x_test).into_iter().map(class_of).collect();
        let positives = predicted.iter().filter(|&&c| c == 1.0).count();
        info!("predicted {} of {} test rows as class 1", positives, predicted.len());
    }
    Ok(())
}
