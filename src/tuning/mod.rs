pub mod grid;
pub mod kfold;
pub mod orchestrator;
pub mod result;

pub use grid::{Hyperparams, ParamGrid};
pub use kfold::{FoldSplit, StratifiedKFold};
pub use orchestrator::{kfold_tuning, FoldInit, TuningOptions};
pub use result::{FoldScore, TuningResult, TuningResults};
