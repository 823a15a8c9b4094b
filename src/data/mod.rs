pub mod dataset;
pub mod loader;
pub mod prepare;
pub mod source;

pub use dataset::{Sample, TabularDataset};
pub use loader::{Batch, DataLoader};
pub use prepare::{labeled_loader, prepare_datasets};
pub use source::{read_and_split_data, two_blobs, RawData};
