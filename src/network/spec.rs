use anyhow::{bail, Result};
use serde::{Serialize, Deserialize};

/// Layer sizes of a `BinaryClassifier`: `input_size → hidden[0] → hidden[1] → 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassifierSpec {
    pub input_size: usize,
    pub hidden_sizes: [usize; 2],
}

impl ClassifierSpec {
    pub fn new(input_size: usize, hidden_sizes: [usize; 2]) -> ClassifierSpec {
        ClassifierSpec { input_size, hidden_sizes }
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_size == 0 {
            bail!("input_size must be at least 1");
        }
        if self.hidden_sizes.contains(&0) {
            bail!("hidden sizes must be at least 1, got {:?}", self.hidden_sizes);
        }
        Ok(())
    }

    /// Total trainable weights and biases.
    pub fn parameter_count(&self) -> usize {
        let [h1, h2] = self.hidden_sizes;
        (self.input_size + 1) * h1 + (h1 + 1) * h2 + (h2 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_count_covers_all_three_layers() {
        // (5+1)*16 + (16+1)*8 + (8+1)*1
        assert_eq!(ClassifierSpec::new(5, [16, 8]).parameter_count(), 96 + 136 + 9);
    }

    #[test]
    fn zero_widths_are_invalid() {
        assert!(ClassifierSpec::new(0, [4, 4]).validate().is_err());
        assert!(ClassifierSpec::new(3, [4, 0]).validate().is_err());
        assert!(ClassifierSpec::new(3, [4, 4]).validate().is_ok());
    }
}
