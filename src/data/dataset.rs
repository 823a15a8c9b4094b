use anyhow::{bail, Result};

use crate::math::matrix::Matrix;

/// One row of a `TabularDataset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample<'a> {
    Labeled(&'a [f64], f64),
    Unlabeled(&'a [f64]),
}

impl<'a> Sample<'a> {
    pub fn features(&self) -> &'a [f64] {
        match *self {
            Sample::Labeled(x, _) | Sample::Unlabeled(x) => x,
        }
    }

    pub fn label(&self) -> Option<f64> {
        match *self {
            Sample::Labeled(_, y) => Some(y),
            Sample::Unlabeled(_) => None,
        }
    }
}

/// Feature rows with optional labels, indexable by row position.
#[derive(Debug, Clone)]
pub struct TabularDataset {
    features: Matrix,
    labels: Option<Vec<f64>>,
}

impl TabularDataset {
    /// Fails when labels are given and their count differs from the row count.
    pub fn new(features: Matrix, labels: Option<Vec<f64>>) -> Result<TabularDataset> {
        if let Some(labels) = &labels {
            if labels.len() != features.rows {
                bail!(
                    "dataset has {} feature rows but {} labels",
                    features.rows,
                    labels.len()
                );
            }
        }
        Ok(TabularDataset { features, labels })
    }

    pub fn labeled(features: Matrix, labels: Vec<f64>) -> Result<TabularDataset> {
        TabularDataset::new(features, Some(labels))
    }

    pub fn unlabeled(features: Matrix) -> TabularDataset {
        TabularDataset { features, labels: None }
    }

    pub fn has_labels(&self) -> bool {
        self.labels.is_some()
    }

    pub fn len(&self) -> usize {
        self.features.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn feature_count(&self) -> usize {
        self.features.cols
    }

    /// Row `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<Sample<'_>> {
        let x = self.features.data.get(index)?;
        Some(match &self.labels {
            Some(labels) => Sample::Labeled(x, labels[index]),
            None => Sample::Unlabeled(x),
        })
    }

    pub fn features(&self) -> &Matrix {
        &self.features
    }

    pub fn labels(&self) -> Option<&[f64]> {
        self.labels.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn unlabeled_rows_carry_only_features() {
        let ds = TabularDataset::unlabeled(Matrix::from_data(vec![vec![1.0, 2.0]]));
        assert!(!ds.has_labels());
        assert_eq!(ds.get(0), Some(Sample::Unlabeled(&[1.0, 2.0][..])));
        assert_eq!(ds.get(0).and_then(|s| s.label()), None);
    }

    #[test]
    fn mismatched_label_count_is_rejected() {
        let features = Matrix::zeros(3, 2);
        assert!(TabularDataset::labeled(features, vec![0.0, 1.0]).is_err());
    }

    #[test]
    fn out_of_range_index_is_none() {
        let ds = TabularDataset::labeled(Matrix::zeros(2, 1), vec![0.0, 1.0]).unwrap();
        assert!(ds.get(2).is_none());
    }

    proptest! {
        #[test]
        fn indexing_returns_matching_pairs(
            rows in proptest::collection::vec((proptest::collection::vec(-10.0..10.0f64, 3), 0u8..2), 1..40)
        ) {
            let features = Matrix::from_data(rows.iter().map(|(x, _)| x.clone()).collect());
            let labels: Vec<f64> = rows.iter().map(|(_, y)| *y as f64).collect();
            let ds = TabularDataset::labeled(features, labels.clone()).unwrap();

            prop_assert_eq!(ds.len(), rows.len());
            for (i, (x, _)) in rows.iter().enumerate() {
                let sample = ds.get(i).unwrap();
                prop_assert_eq!(sample.features(), x.as_slice());
                prop_assert_eq!(sample.label(), Some(labels[i]));
            }
        }
    }
}
