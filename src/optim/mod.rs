pub mod optimizer;
pub mod adam;
pub mod sgd;

pub use optimizer::Optimizer;
pub use adam::Adam;
pub use sgd::Sgd;
