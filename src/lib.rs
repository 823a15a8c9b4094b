pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod data;
pub mod train;
pub mod tuning;
pub mod report;
pub mod context;
pub mod config;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::dense::Dense;
pub use network::{BinaryClassifier, ClassifierSpec, Mode};
pub use loss::bce::BceLoss;
pub use optim::{Adam, Optimizer, Sgd};
pub use data::{prepare_datasets, read_and_split_data, DataLoader, TabularDataset};
pub use train::{FitConfig, History};
pub use tuning::{kfold_tuning, FoldInit, Hyperparams, ParamGrid, StratifiedKFold, TuningOptions, TuningResults};
pub use context::{Context, Device};
pub use config::TuningConfig;
