use std::sync::{Arc, atomic::AtomicBool};

/// Settings for one `BinaryClassifier::fit` call.
///
/// - `epochs`    : full passes over the training loader
/// - `verbosity` : `0` is silent, `1` logs one summary line per epoch
/// - `stop_flag` : when set from another thread, training ends after the
///                 current epoch
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub epochs: usize,
    pub verbosity: u8,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl FitConfig {
    pub fn new(epochs: usize) -> Self {
        FitConfig { epochs, verbosity: 0, stop_flag: None }
    }

    pub fn verbose(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }
}
