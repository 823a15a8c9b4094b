use serde::{Serialize, Deserialize};

/// Aggregates for one completed epoch of `BinaryClassifier::fit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean of the per-batch training losses.
    pub train_loss: f64,
    /// Mean of the per-batch training accuracies, in [0, 1].
    pub train_accuracy: f64,
    /// Validation loss, when labelled validation data was supplied.
    pub val_loss: Option<f64>,
    pub val_accuracy: Option<f64>,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}

impl EpochStats {
    /// Keras-style progress line.
    pub fn summary(&self) -> String {
        let mut line = format!(
            "Epoch {}/{} - loss: {:.5} - accuracy: {:.4}",
            self.epoch, self.total_epochs, self.train_loss, self.train_accuracy
        );
        if let (Some(loss), Some(acc)) = (self.val_loss, self.val_accuracy) {
            line.push_str(&format!(" - val_loss: {:.5} - val_accuracy: {:.4}", loss, acc));
        }
        line
    }
}
