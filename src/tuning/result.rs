use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::tuning::grid::Hyperparams;

/// Accuracies from one cross-validation fold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoldScore {
    pub fold: usize,
    pub train_accuracy: f64,
    pub val_accuracy: f64,
}

/// Cross-validated scores of one hyperparameter combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningResult {
    pub params: Hyperparams,
    pub mean_val_score: f64,
    pub mean_train_score: f64,
    pub folds: Vec<FoldScore>,
}

impl TuningResult {
    pub fn from_folds(params: Hyperparams, folds: Vec<FoldScore>) -> TuningResult {
        let n = folds.len().max(1) as f64;
        let mean_train_score = folds.iter().map(|f| f.train_accuracy).sum::<f64>() / n;
        let mean_val_score = folds.iter().map(|f| f.val_accuracy).sum::<f64>() / n;
        TuningResult { params, mean_val_score, mean_train_score, folds }
    }
}

/// All rows of a sweep, in the order they were evaluated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TuningResults {
    pub rows: Vec<TuningResult>,
}

impl TuningResults {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push(&mut self, row: TuningResult) {
        self.rows.push(row);
    }

    /// Rows by mean validation score, best first. Ties keep evaluation order.
    pub fn sorted_by_validation(&self) -> Vec<&TuningResult> {
        let mut sorted: Vec<&TuningResult> = self.rows.iter().collect();
        sorted.sort_by(|a, b| b.mean_val_score.total_cmp(&a.mean_val_score));
        sorted
    }

    pub fn best(&self) -> Option<&TuningResult> {
        self.sorted_by_validation().into_iter().next()
    }

    /// Serializes all rows to a pretty-printed JSON file.
    pub fn save_json(&self, path: &Path) -> io::Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}
