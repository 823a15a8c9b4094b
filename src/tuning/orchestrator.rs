use anyhow::{bail, Context as _, Result};
use serde::{Serialize, Deserialize};
use tracing::{debug, info};

use crate::context::Context;
use crate::data::prepare::prepare_datasets;
use crate::loss::bce::BceLoss;
use crate::math::matrix::Matrix;
use crate::network::classifier::BinaryClassifier;
use crate::network::spec::ClassifierSpec;
use crate::optim::adam::Adam;
use crate::train::fit_config::FitConfig;
use crate::tuning::grid::ParamGrid;
use crate::tuning::kfold::StratifiedKFold;
use crate::tuning::result::{FoldScore, TuningResult, TuningResults};

/// How model weights relate across the folds of one combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum FoldInit {
    /// Every fold trains a newly initialized model.
    #[default]
    Fresh,
    /// One model per combination; each fold keeps training the weights the
    /// previous fold left behind.
    Carry,
}

/// Splitter and weight policy for `kfold_tuning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TuningOptions {
    pub splitter: StratifiedKFold,
    pub fold_init: FoldInit,
}

impl Default for TuningOptions {
    fn default() -> Self {
        TuningOptions { splitter: StratifiedKFold::default(), fold_init: FoldInit::Fresh }
    }
}

/// Scores every combination in `grid` with stratified k-fold cross-validation
/// and returns one row per combination, in grid order.
///
/// Each fold fits with a fresh BCE loss and a fresh Adam optimizer for the
/// combination's epoch count, then evaluates on the fold's own train and
/// validation rows. No combination is skipped or stopped early.
pub fn kfold_tuning(
    x: &Matrix,
    y: &[f64],
    grid: &ParamGrid,
    options: &TuningOptions,
    ctx: &mut Context,
) -> Result<TuningResults> {
    grid.validate()?;
    if x.rows != y.len() {
        bail!("{} feature rows but {} labels", x.rows, y.len());
    }
    if let Some(&size) = grid.input_sizes.iter().find(|&&s| s != x.cols) {
        bail!("grid input size {} does not match the {} feature columns", size, x.cols);
    }

    let splits = options.splitter.split(y)?;
    let n_splits = splits.len();
    let total = grid.len();
    info!("{} Options -> {} iterations", total, total * n_splits);

    let mut results = TuningResults::default();
    for (i, params) in grid.combinations().enumerate() {
        info!("{}/{} Tuning parameters-> {}", i + 1, total, params);

        let mut models = FoldModels::new(params.classifier_spec(), options.fold_init);

        let mut folds = Vec::with_capacity(n_splits);
        for (fold, split) in splits.iter().enumerate() {
            let model = models.next(ctx)?;

            let x_train = x.select_rows(&split.train);
            let x_val = x.select_rows(&split.validation);
            let y_train: Vec<f64> = split.train.iter().map(|&r| y[r]).collect();
            let y_val: Vec<f64> = split.validation.iter().map(|&r| y[r]).collect();

            let (mut train_loader, _validation_loader) =
                prepare_datasets(&x_train, &y_train, &x_val, params.batch_size, ctx)?;

            let loss_fn = BceLoss::new();
            let mut optimizer = Adam::new(params.learning_rate);
            model
                .fit(&mut train_loader, &loss_fn, &mut optimizer, &FitConfig::new(params.epochs), None)
                .with_context(|| format!("fold {} of [{}]", fold + 1, params))?;

            let (train_accuracy, val_accuracy) = model.evaluate(&x_train, &x_val, &y_train, &y_val)?;
            debug!(fold = fold + 1, train_accuracy, val_accuracy, "fold scored");
            folds.push(FoldScore { fold, train_accuracy, val_accuracy });
        }

        let row = TuningResult::from_folds(params, folds);
        info!("train_acc: {:.3}, val_acc:{:.3}", row.mean_train_score, row.mean_val_score);
        results.push(row);
    }

    Ok(results)
}

/// Hands out the model each fold trains under a [`FoldInit`] policy.
struct FoldModels {
    spec: ClassifierSpec,
    fold_init: FoldInit,
    current: Option<BinaryClassifier>,
}

impl FoldModels {
    fn new(spec: ClassifierSpec, fold_init: FoldInit) -> FoldModels {
        FoldModels { spec, fold_init, current: None }
    }

    /// Under `Carry` the previous fold's model comes back as it was left.
    fn next(&mut self, ctx: &mut Context) -> Result<&mut BinaryClassifier> {
        let model = match self.current.take() {
            Some(model) if self.fold_init == FoldInit::Carry => model,
            _ => BinaryClassifier::new(self.spec, ctx.rng())?,
        };
        Ok(self.current.insert(model))
    }
}
