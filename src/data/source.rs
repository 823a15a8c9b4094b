//! Loading the raw tabular data the tuner consumes.
use std::path::Path;

use anyhow::{anyhow, bail, Context as _, Result};
use csv::ReaderBuilder;
use rand::Rng;
use tracing::info;

use crate::math::matrix::Matrix;

/// Training features and labels, plus unlabelled test features when a test
/// file was given.
#[derive(Debug, Clone)]
pub struct RawData {
    pub feature_names: Vec<String>,
    pub x_train: Matrix,
    pub y_train: Vec<f64>,
    pub x_test: Option<Matrix>,
}

/// Reads a headed training CSV (and optionally a test CSV with the same
/// feature columns). `label_column` is split off the training rows and
/// dropped from the test rows if present. Every other column must parse as `f64`.
pub fn read_and_split_data(
    train_path: &Path,
    test_path: Option<&Path>,
    label_column: &str,
) -> Result<RawData> {
    let (header, rows) = read_numeric_csv(train_path)?;
    let label_idx = header.iter()
        .position(|h| h == label_column)
        .ok_or_else(|| anyhow!("{}: no column named '{}'", train_path.display(), label_column))?;

    let feature_names: Vec<String> = header.iter()
        .enumerate()
        .filter(|&(i, _)| i != label_idx)
        .map(|(_, h)| h.clone())
        .collect();

    let mut features = Vec::with_capacity(rows.len());
    let mut labels = Vec::with_capacity(rows.len());
    for mut row in rows {
        labels.push(row.remove(label_idx));
        features.push(row);
    }
    if features.is_empty() {
        bail!("{}: no data rows", train_path.display());
    }
    info!(rows = features.len(), features = feature_names.len(), "loaded training data from {}", train_path.display());

    let x_test = match test_path {
        Some(path) => {
            let (test_header, test_rows) = read_numeric_csv(path)?;
            let drop = test_header.iter().position(|h| h == label_column);
            let kept: Vec<&String> = test_header.iter()
                .enumerate()
                .filter(|&(i, _)| Some(i) != drop)
                .map(|(_, h)| h)
                .collect();
            if kept.len() != feature_names.len() || kept.iter().zip(&feature_names).any(|(a, b)| *a != b) {
                bail!("{}: feature columns do not match the training file", path.display());
            }
            let rows: Vec<Vec<f64>> = test_rows.into_iter()
                .map(|mut row| {
                    if let Some(i) = drop {
                        row.remove(i);
                    }
                    row
                })
                .collect();
            if rows.is_empty() {
                bail!("{}: no data rows", path.display());
            }
            info!(rows = rows.len(), "loaded test data from {}", path.display());
            Some(Matrix::from_data(rows))
        }
        None => None,
    };

    Ok(RawData {
        feature_names,
        x_train: Matrix::from_data(features),
        y_train: labels,
        x_test,
    })
}

fn read_numeric_csv(path: &Path) -> Result<(Vec<String>, Vec<Vec<f64>>)> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let header: Vec<String> = rdr.headers()
        .with_context(|| format!("{}: unreadable header", path.display()))?
        .iter()
        .map(str::to_owned)
        .collect();

    let mut rows = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("{}: CSV parse error", path.display()))?;
        let row = record.iter()
            .enumerate()
            .map(|(col, cell)| {
                cell.parse::<f64>().map_err(|_| {
                    anyhow!(
                        "{}: row {} column '{}' is not a number: {:?}",
                        path.display(),
                        line + 1,
                        header.get(col).map_or("?", String::as_str),
                        cell
                    )
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }
    Ok((header, rows))
}

/// Generates `n` labelled samples in two Gaussian-ish blobs with `features`
/// dimensions. Class 0 centers at 0.3 and class 1 at 0.7 on every axis, and
/// classes alternate by row, so any prefix is balanced.
pub fn two_blobs<R: Rng>(n: usize, features: usize, rng: &mut R) -> (Matrix, Vec<f64>) {
    let centers = [0.3f64, 0.7f64];
    let mut inputs = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let class = i % 2;
        let row = (0..features)
            .map(|_| {
                // Sum of uniforms: cheap bell-shaped spread around the center.
                let spread: f64 = (0..3).map(|_| rng.gen_range(-0.1..0.1)).sum();
                (centers[class] + spread).clamp(0.0, 1.0)
            })
            .collect();
        inputs.push(row);
        labels.push(class as f64);
    }
    (Matrix::from_data(inputs), labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn blobs_are_balanced_and_bounded() {
        let mut rng = StdRng::seed_from_u64(5);
        let (x, y) = two_blobs(100, 5, &mut rng);
        assert_eq!((x.rows, x.cols), (100, 5));
        assert_eq!(y.iter().filter(|&&l| l == 1.0).count(), 50);
        assert!(x.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_and_split_data(Path::new("/definitely/not/here.csv"), None, "label");
        assert!(err.is_err());
    }
}
