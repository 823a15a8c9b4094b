use anyhow::Result;

use crate::context::Context;
use crate::data::dataset::TabularDataset;
use crate::data::loader::DataLoader;
use crate::math::matrix::Matrix;

/// Wraps raw splits into loaders: a shuffled, labelled training loader of
/// `batch_size` and a shuffled, unlabelled validation loader of batch size 1.
///
/// Validation labels are deliberately not attached; callers score the
/// validation rows through `BinaryClassifier::evaluate` instead.
pub fn prepare_datasets(
    x_train: &Matrix,
    y_train: &[f64],
    x_validation: &Matrix,
    batch_size: usize,
    ctx: &mut Context,
) -> Result<(DataLoader, DataLoader)> {
    let train_dataset = TabularDataset::labeled(x_train.clone(), y_train.to_vec())?;
    let validation_dataset = TabularDataset::unlabeled(x_validation.clone());

    let train_loader = DataLoader::new(train_dataset, batch_size, true, ctx.fork_rng())?;
    let validation_loader = DataLoader::new(validation_dataset, 1, true, ctx.fork_rng())?;

    Ok((train_loader, validation_loader))
}

/// A shuffled loader that keeps its labels, for validation passes inside `fit`.
pub fn labeled_loader(
    x: &Matrix,
    y: &[f64],
    batch_size: usize,
    ctx: &mut Context,
) -> Result<DataLoader> {
    let dataset = TabularDataset::labeled(x.clone(), y.to_vec())?;
    DataLoader::new(dataset, batch_size, true, ctx.fork_rng())
}
