use anyhow::{bail, Result};

use crate::math::matrix::Matrix;
use crate::network::classifier::BinaryClassifier;

/// Thresholds a probability to its class. Exactly 0.5 maps to 0.
pub fn class_of(probability: f64) -> f64 {
    if probability > 0.5 { 1.0 } else { 0.0 }
}

/// Fraction of predictions whose rounded class equals the label.
pub fn binary_accuracy(predicted: &[f64], expected: &[f64]) -> f64 {
    if predicted.is_empty() {
        return 0.0;
    }
    let correct = predicted.iter().zip(expected.iter())
        .filter(|(p, y)| class_of(**p) == **y)
        .count();
    correct as f64 / predicted.len() as f64
}

impl BinaryClassifier {
    /// Switches to evaluation mode and scores the full train and test sets.
    /// Returns `(train_accuracy, test_accuracy)`.
    pub fn evaluate(
        &mut self,
        x_train: &Matrix,
        x_test: &Matrix,
        y_train: &[f64],
        y_test: &[f64],
    ) -> Result<(f64, f64)> {
        self.eval();
        let train_acc = self.score(x_train, y_train, "train")?;
        let test_acc = self.score(x_test, y_test, "test")?;
        Ok((train_acc, test_acc))
    }

    fn score(&self, x: &Matrix, y: &[f64], which: &str) -> Result<f64> {
        if x.rows != y.len() {
            bail!("{} set has {} rows but {} labels", which, x.rows, y.len());
        }
        if x.rows == 0 {
            bail!("cannot score an empty {} set", which);
        }
        Ok(binary_accuracy(&self.predict_proba(x), y))
    }
}
