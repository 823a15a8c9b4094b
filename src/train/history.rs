use serde::{Serialize, Deserialize};

use crate::train::epoch_stats::EpochStats;

/// Per-epoch curves produced by `fit`.
///
/// Every series starts with a placeholder entry (accuracy 0, loss 1), so the
/// first real epoch lands at index 1. Validation series only grow when the
/// run had labelled validation data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub accuracy: Vec<f64>,
    pub val_accuracy: Vec<f64>,
    pub loss: Vec<f64>,
    pub val_loss: Vec<f64>,
}

impl History {
    pub fn new() -> History {
        History {
            accuracy: vec![0.0],
            val_accuracy: vec![0.0],
            loss: vec![1.0],
            val_loss: vec![1.0],
        }
    }

    pub fn record(&mut self, stats: &EpochStats) {
        self.accuracy.push(stats.train_accuracy);
        self.loss.push(stats.train_loss);
        if let (Some(loss), Some(acc)) = (stats.val_loss, stats.val_accuracy) {
            self.val_accuracy.push(acc);
            self.val_loss.push(loss);
        }
    }

    /// Number of recorded epochs, excluding the placeholder.
    pub fn epochs(&self) -> usize {
        self.loss.len() - 1
    }

    pub fn has_validation(&self) -> bool {
        self.val_loss.len() > 1
    }
}

impl Default for History {
    fn default() -> Self {
        History::new()
    }
}
