pub mod classifier;
pub mod spec;

pub use classifier::{BinaryClassifier, Mode};
pub use spec::ClassifierSpec;
