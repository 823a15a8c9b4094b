use std::sync::atomic::Ordering;
use std::time::Instant;

use anyhow::{anyhow, bail, Result};
use tracing::{debug, info};

use crate::data::loader::DataLoader;
use crate::loss::bce::BceLoss;
use crate::math::matrix::Matrix;
use crate::network::classifier::BinaryClassifier;
use crate::optim::optimizer::Optimizer;
use crate::train::epoch_stats::EpochStats;
use crate::train::evaluate::binary_accuracy;
use crate::train::fit_config::FitConfig;
use crate::train::history::History;

impl BinaryClassifier {
    /// Trains for `config.epochs` epochs, one optimizer step per mini-batch,
    /// and returns the per-epoch history.
    ///
    /// Parameters are updated in place, so consecutive calls continue from
    /// where the previous one stopped. When `validation` is given (and
    /// labelled) a gradient-free pass over it closes every epoch.
    ///
    /// # Errors
    /// The training loader must be non-empty and labelled; a validation
    /// loader must be labelled.
    pub fn fit<O: Optimizer + ?Sized>(
        &mut self,
        train_loader: &mut DataLoader,
        loss_fn: &BceLoss,
        optimizer: &mut O,
        config: &FitConfig,
        mut validation: Option<&mut DataLoader>,
    ) -> Result<History> {
        if train_loader.is_empty() {
            bail!("cannot fit on an empty training set");
        }
        if !train_loader.has_labels() {
            bail!("training loader has no labels");
        }
        if validation.as_ref().is_some_and(|v| !v.has_labels()) {
            bail!("validation loader passed to fit has no labels");
        }

        let mut history = History::new();
        self.train();

        for epoch in 1..=config.epochs {
            let t_start = Instant::now();

            // ── One full pass over the training data ───────────────────────
            let (train_loss, train_accuracy) = self.run_one_epoch(train_loader, loss_fn, optimizer)?;

            // ── Validation ────────────────────────────────────────────────
            let (val_loss, val_accuracy) = match validation.as_deref_mut() {
                Some(loader) => {
                    let (loss, acc) = self.validation_pass(loader, loss_fn)?;
                    (Some(loss), Some(acc))
                }
                None => (None, None),
            };

            let stats = EpochStats {
                epoch,
                total_epochs: config.epochs,
                train_loss,
                train_accuracy,
                val_loss,
                val_accuracy,
                elapsed_ms: t_start.elapsed().as_millis() as u64,
            };
            history.record(&stats);

            if config.verbosity >= 1 {
                info!("{}", stats.summary());
            } else {
                debug!("{}", stats.summary());
            }

            if let Some(ref flag) = config.stop_flag {
                if flag.load(Ordering::Relaxed) {
                    info!(epoch, "stop requested, ending training early");
                    break;
                }
            }
        }

        for layer in self.layers_mut() {
            layer.clear_cache();
        }
        Ok(history)
    }

    /// One shuffled pass with an optimizer step per batch. Returns the mean
    /// per-batch loss and accuracy.
    fn run_one_epoch<O: Optimizer + ?Sized>(
        &mut self,
        loader: &mut DataLoader,
        loss_fn: &BceLoss,
        optimizer: &mut O,
    ) -> Result<(f64, f64)> {
        let mut epoch_loss = 0.0;
        let mut epoch_acc = 0.0;
        let batches = loader.batches();
        let n_batches = batches.len();

        for batch in batches {
            let labels = batch.labels.ok_or_else(|| anyhow!("training batch has no labels"))?;

            let predicted = self.forward(&batch.inputs).column_values();
            epoch_loss += loss_fn.loss(&predicted, &labels);
            epoch_acc += binary_accuracy(&predicted, &labels);

            let delta = Matrix::column(&loss_fn.logit_gradient(&predicted, &labels));
            let grads = self.backward(&delta);
            self.apply(optimizer, &grads);
        }

        Ok((epoch_loss / n_batches as f64, epoch_acc / n_batches as f64))
    }

    /// Gradient-free pass averaging loss and accuracy over batches.
    fn validation_pass(&self, loader: &mut DataLoader, loss_fn: &BceLoss) -> Result<(f64, f64)> {
        let batches = loader.batches();
        if batches.is_empty() {
            bail!("validation loader is empty");
        }
        let n_batches = batches.len() as f64;
        let (mut total_loss, mut total_acc) = (0.0, 0.0);
        for batch in batches {
            let labels = batch.labels.ok_or_else(|| anyhow!("validation batch has no labels"))?;
            let predicted = self.predict_proba(&batch.inputs);
            total_loss += loss_fn.loss(&predicted, &labels);
            total_acc += binary_accuracy(&predicted, &labels);
        }
        Ok((total_loss / n_batches, total_acc / n_batches))
    }
}
