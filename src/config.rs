use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context as _, Result};
use serde::{Serialize, Deserialize};

use crate::tuning::{FoldInit, ParamGrid, StratifiedKFold, TuningOptions};

fn default_n_splits() -> usize { 10 }
fn default_seed() -> u64 { 1 }
fn default_shuffle() -> bool { true }
fn default_top() -> usize { 10 }

/// Settings for a tuning run. Every field may be omitted from the JSON file;
/// a missing grid means the stock grid for the loaded feature count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningConfig {
    #[serde(default)]
    pub grid: Option<ParamGrid>,
    #[serde(default = "default_n_splits")]
    pub n_splits: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_shuffle")]
    pub shuffle: bool,
    #[serde(default)]
    pub fold_init: FoldInit,
    /// Rows shown in the final table.
    #[serde(default = "default_top")]
    pub top: usize,
}

impl Default for TuningConfig {
    fn default() -> Self {
        TuningConfig {
            grid: None,
            n_splits: default_n_splits(),
            seed: default_seed(),
            shuffle: default_shuffle(),
            fold_init: FoldInit::default(),
            top: default_top(),
        }
    }
}

impl TuningConfig {
    /// The configured grid, or the stock one sized for `input_size` features.
    pub fn grid_for(&self, input_size: usize) -> ParamGrid {
        self.grid.clone().unwrap_or_else(|| ParamGrid::default_for(input_size))
    }

    pub fn options(&self) -> TuningOptions {
        TuningOptions {
            splitter: StratifiedKFold::new(self.n_splits, self.shuffle, self.seed),
            fold_init: self.fold_init,
        }
    }

    /// Five-way splitter whose first fold serves as an 80/20 holdout, shuffled
    /// and seeded like the tuning splitter.
    pub fn holdout_splitter(&self) -> StratifiedKFold {
        StratifiedKFold::new(5, self.shuffle, self.seed)
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .with_context(|| format!("failed to write {}", path.display()))
    }

    pub fn load_json(path: &Path) -> Result<TuningConfig> {
        let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("{} is not a valid tuning config", path.display()))
    }
}
