pub mod epoch_stats;
pub mod evaluate;
pub mod fit;
pub mod fit_config;
pub mod history;

pub use epoch_stats::EpochStats;
pub use evaluate::{binary_accuracy, class_of};
pub use fit_config::FitConfig;
pub use history::History;
