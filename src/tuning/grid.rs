use std::fmt;

use anyhow::{bail, Result};
use itertools::iproduct;
use serde::{Serialize, Deserialize};

use crate::network::spec::ClassifierSpec;

/// One grid point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hyperparams {
    pub input_size: usize,
    pub hidden_sizes: [usize; 2],
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
}

impl Hyperparams {
    pub fn classifier_spec(&self) -> ClassifierSpec {
        ClassifierSpec::new(self.input_size, self.hidden_sizes)
    }
}

impl fmt::Display for Hyperparams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "input_size:{} | hidden_size:{:?} | epochs:{} | batch_size:{} | learning_rate:{}",
            self.input_size, self.hidden_sizes, self.epochs, self.batch_size, self.learning_rate
        )
    }
}

/// Value lists for each tuned dimension. The search covers their full
/// Cartesian product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamGrid {
    pub input_sizes: Vec<usize>,
    pub hidden_sizes: Vec<[usize; 2]>,
    pub epochs: Vec<usize>,
    pub batch_sizes: Vec<usize>,
    pub learning_rates: Vec<f64>,
}

impl ParamGrid {
    /// The stock search space for `input_size` features.
    pub fn default_for(input_size: usize) -> ParamGrid {
        ParamGrid {
            input_sizes: vec![input_size],
            hidden_sizes: vec![
                [16, 16], [32, 32], [64, 64], [128, 128],
                [16, 8], [32, 16], [64, 32], [128, 64],
            ],
            epochs: vec![4, 8, 16, 32],
            batch_sizes: vec![16, 32, 64, 128],
            learning_rates: vec![0.001, 0.01, 0.1],
        }
    }

    /// A grid holding exactly `params`.
    pub fn single(params: Hyperparams) -> ParamGrid {
        ParamGrid {
            input_sizes: vec![params.input_size],
            hidden_sizes: vec![params.hidden_sizes],
            epochs: vec![params.epochs],
            batch_sizes: vec![params.batch_size],
            learning_rates: vec![params.learning_rate],
        }
    }

    /// Number of combinations.
    pub fn len(&self) -> usize {
        self.input_sizes.len()
            * self.hidden_sizes.len()
            * self.epochs.len()
            * self.batch_sizes.len()
            * self.learning_rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every combination, input size outermost and learning rate innermost.
    pub fn combinations(&self) -> impl Iterator<Item = Hyperparams> + '_ {
        iproduct!(
            self.input_sizes.iter(),
            self.hidden_sizes.iter(),
            self.epochs.iter(),
            self.batch_sizes.iter(),
            self.learning_rates.iter()
        )
        .map(|(&input_size, &hidden_sizes, &epochs, &batch_size, &learning_rate)| Hyperparams {
            input_size,
            hidden_sizes,
            epochs,
            batch_size,
            learning_rate,
        })
    }

    pub fn validate(&self) -> Result<()> {
        let dims = [
            ("input_sizes", self.input_sizes.len()),
            ("hidden_sizes", self.hidden_sizes.len()),
            ("epochs", self.epochs.len()),
            ("batch_sizes", self.batch_sizes.len()),
            ("learning_rates", self.learning_rates.len()),
        ];
        if let Some((name, _)) = dims.iter().find(|(_, len)| *len == 0) {
            bail!("grid dimension '{}' has no values", name);
        }
        if self.input_sizes.contains(&0) {
            bail!("input sizes must be at least 1");
        }
        if let Some(h) = self.hidden_sizes.iter().find(|h| h.contains(&0)) {
            bail!("hidden sizes must be at least 1, got {:?}", h);
        }
        if self.epochs.contains(&0) {
            bail!("epoch counts must be at least 1");
        }
        if self.batch_sizes.contains(&0) {
            bail!("batch sizes must be at least 1");
        }
        if let Some(lr) = self.learning_rates.iter().find(|lr| !(lr.is_finite() && **lr > 0.0)) {
            bail!("learning rates must be positive and finite, got {}", lr);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_has_384_combinations() {
        let grid = ParamGrid::default_for(12);
        assert_eq!(grid.len(), 8 * 4 * 4 * 3);
        assert_eq!(grid.combinations().count(), grid.len());
        assert!(grid.validate().is_ok());
    }

    #[test]
    fn enumeration_runs_learning_rate_fastest() {
        let grid = ParamGrid {
            input_sizes: vec![3],
            hidden_sizes: vec![[4, 4], [8, 2]],
            epochs: vec![1],
            batch_sizes: vec![2],
            learning_rates: vec![0.1, 0.01],
        };
        let combos: Vec<(usize, f64)> = grid.combinations()
            .map(|p| (p.hidden_sizes[0], p.learning_rate))
            .collect();
        assert_eq!(combos, vec![(4, 0.1), (4, 0.01), (8, 0.1), (8, 0.01)]);
    }

    #[test]
    fn single_grid_yields_its_point() {
        let p = Hyperparams { input_size: 5, hidden_sizes: [16, 16], epochs: 1, batch_size: 16, learning_rate: 0.01 };
        let combos: Vec<Hyperparams> = ParamGrid::single(p).combinations().collect();
        assert_eq!(combos, vec![p]);
    }

    #[test]
    fn invalid_grids_are_rejected() {
        let mut grid = ParamGrid::default_for(4);
        grid.epochs.clear();
        assert!(grid.validate().is_err());

        let mut grid = ParamGrid::default_for(4);
        grid.learning_rates.push(-0.5);
        assert!(grid.validate().is_err());

        let mut grid = ParamGrid::default_for(4);
        grid.batch_sizes.push(0);
        assert!(grid.validate().is_err());
    }

    #[test]
    fn display_lists_every_dimension() {
        let p = Hyperparams { input_size: 5, hidden_sizes: [16, 8], epochs: 4, batch_size: 32, learning_rate: 0.001 };
        assert_eq!(
            p.to_string(),
            "input_size:5 | hidden_size:[16, 8] | epochs:4 | batch_size:32 | learning_rate:0.001"
        );
    }
}
