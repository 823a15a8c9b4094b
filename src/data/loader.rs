use anyhow::{bail, Result};
use rand::{rngs::StdRng, seq::SliceRandom};

use crate::data::dataset::TabularDataset;
use crate::math::matrix::Matrix;

/// One mini-batch: stacked feature rows and, for labelled data, their labels.
#[derive(Debug, Clone)]
pub struct Batch {
    pub inputs: Matrix,
    pub labels: Option<Vec<f64>>,
}

/// Splits a dataset into mini-batches, reshuffling on every pass when asked to.
#[derive(Debug, Clone)]
pub struct DataLoader {
    dataset: TabularDataset,
    batch_size: usize,
    shuffle: bool,
    rng: StdRng,
}

impl DataLoader {
    pub fn new(dataset: TabularDataset, batch_size: usize, shuffle: bool, rng: StdRng) -> Result<DataLoader> {
        if batch_size == 0 {
            bail!("batch_size must be at least 1");
        }
        Ok(DataLoader { dataset, batch_size, shuffle, rng })
    }

    pub fn dataset(&self) -> &TabularDataset {
        &self.dataset
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn has_labels(&self) -> bool {
        self.dataset.has_labels()
    }

    /// Number of batches per pass; the last one may be short.
    pub fn len(&self) -> usize {
        self.dataset.len().div_ceil(self.batch_size)
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// One full pass over the dataset.
    pub fn batches(&mut self) -> Vec<Batch> {
        let mut order: Vec<usize> = (0..self.dataset.len()).collect();
        if self.shuffle {
            order.shuffle(&mut self.rng);
        }

        order.chunks(self.batch_size)
            .map(|chunk| Batch {
                inputs: self.dataset.features().select_rows(chunk),
                labels: self.dataset.labels()
                    .map(|labels| chunk.iter().map(|&i| labels[i]).collect()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn dataset(n: usize) -> TabularDataset {
        let features = Matrix::from_data((0..n).map(|i| vec![i as f64]).collect());
        let labels = (0..n).map(|i| (i % 2) as f64).collect();
        TabularDataset::labeled(features, labels).unwrap()
    }

    #[test]
    fn last_batch_is_short() {
        let mut loader = DataLoader::new(dataset(10), 4, false, StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(loader.len(), 3);
        let sizes: Vec<usize> = loader.batches().iter().map(|b| b.inputs.rows).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
    }

    #[test]
    fn shuffled_pass_keeps_features_and_labels_paired() {
        let mut loader = DataLoader::new(dataset(25), 8, true, StdRng::seed_from_u64(9)).unwrap();
        let mut seen = Vec::new();
        for batch in loader.batches() {
            let labels = batch.labels.unwrap();
            for (row, label) in batch.inputs.data.iter().zip(labels) {
                assert_eq!((row[0] as usize % 2) as f64, label);
                seen.push(row[0] as usize);
            }
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..25).collect::<Vec<_>>());
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        assert!(DataLoader::new(dataset(3), 0, false, StdRng::seed_from_u64(0)).is_err());
    }
}
