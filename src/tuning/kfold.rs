use anyhow::{bail, Result};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tracing::warn;

/// Row positions of one cross-validation split, each list ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldSplit {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
}

/// K-fold splitter that keeps the class balance of binary labels in every
/// fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StratifiedKFold {
    pub n_splits: usize,
    pub shuffle: bool,
    pub seed: u64,
}

impl Default for StratifiedKFold {
    fn default() -> Self {
        StratifiedKFold { n_splits: 10, shuffle: true, seed: 1 }
    }
}

impl StratifiedKFold {
    pub fn new(n_splits: usize, shuffle: bool, seed: u64) -> StratifiedKFold {
        StratifiedKFold { n_splits, shuffle, seed }
    }

    /// Splits rows `0..labels.len()` into `n_splits` train/validation pairs.
    /// The same labels and seed always give the same splits.
    pub fn split(&self, labels: &[f64]) -> Result<Vec<FoldSplit>> {
        if self.n_splits < 2 {
            bail!("n_splits must be at least 2, got {}", self.n_splits);
        }
        if labels.len() < self.n_splits {
            bail!("cannot make {} splits from {} rows", self.n_splits, labels.len());
        }

        let mut classes: [Vec<usize>; 2] = [Vec::new(), Vec::new()];
        for (i, &y) in labels.iter().enumerate() {
            match y {
                y if y == 0.0 => classes[0].push(i),
                y if y == 1.0 => classes[1].push(i),
                other => bail!("row {} has label {}, expected 0 or 1", i, other),
            }
        }

        let smallest = classes.iter().map(Vec::len).filter(|&n| n > 0).min().unwrap_or(0);
        if smallest < self.n_splits {
            warn!(
                "the least populated class has only {} members, fewer than n_splits={}",
                smallest, self.n_splits
            );
        }

        if self.shuffle {
            let mut rng = StdRng::seed_from_u64(self.seed);
            for members in &mut classes {
                members.shuffle(&mut rng);
            }
        }

        // Deal rows round-robin; the counter carries over between classes so
        // fold sizes never differ by more than one.
        let mut fold_of = vec![0usize; labels.len()];
        for (position, &row) in classes.iter().flatten().enumerate() {
            fold_of[row] = position % self.n_splits;
        }

        let splits = (0..self.n_splits)
            .map(|fold| {
                let (validation, train): (Vec<usize>, Vec<usize>) =
                    (0..labels.len()).partition(|&row| fold_of[row] == fold);
                FoldSplit { train, validation }
            })
            .collect();
        Ok(splits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn labels(zeros: usize, ones: usize) -> Vec<f64> {
        let mut y = vec![0.0; zeros];
        y.extend(vec![1.0; ones]);
        y
    }

    #[test]
    fn balanced_data_gives_balanced_folds() {
        let y = labels(50, 50);
        let splits = StratifiedKFold::default().split(&y).unwrap();
        assert_eq!(splits.len(), 10);
        for split in &splits {
            assert_eq!(split.validation.len(), 10);
            let ones = split.validation.iter().filter(|&&i| y[i] == 1.0).count();
            assert_eq!(ones, 5);
        }
    }

    #[test]
    fn same_seed_same_splits() {
        let y = labels(30, 20);
        let a = StratifiedKFold::new(5, true, 7).split(&y).unwrap();
        let b = StratifiedKFold::new(5, true, 7).split(&y).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn non_binary_labels_are_rejected() {
        assert!(StratifiedKFold::new(2, false, 0).split(&[0.0, 1.0, 2.0, 1.0]).is_err());
    }

    #[test]
    fn too_few_rows_is_an_error() {
        assert!(StratifiedKFold::new(10, true, 1).split(&labels(3, 3)).is_err());
        assert!(StratifiedKFold::new(1, true, 1).split(&labels(3, 3)).is_err());
    }

    proptest! {
        #[test]
        fn folds_partition_the_rows(
            zeros in 0usize..60,
            ones in 0usize..60,
            n_splits in 2usize..12,
            seed in any::<u64>(),
        ) {
            prop_assume!(zeros + ones >= n_splits);
            let y = labels(zeros, ones);
            let splits = StratifiedKFold::new(n_splits, true, seed).split(&y).unwrap();

            let mut seen = vec![0usize; y.len()];
            for split in &splits {
                prop_assert_eq!(split.train.len() + split.validation.len(), y.len());
                prop_assert!(split.validation.windows(2).all(|w| w[0] < w[1]));
                for &i in &split.validation {
                    seen[i] += 1;
                }
                // Per-class counts differ by at most one across folds.
                let class_ones = split.validation.iter().filter(|&&i| y[i] == 1.0).count();
                prop_assert!(class_ones * n_splits <= ones + n_splits);
                prop_assert!(class_ones * n_splits + n_splits >= ones);
            }
            prop_assert!(seen.iter().all(|&c| c == 1));
        }
    }
}
