use crate::layers::dense::{Dense, LayerGradients};

/// A parameter update rule applied once per mini-batch.
///
/// `slot` is the layer's position in its model. Stateful optimizers key their
/// per-parameter buffers on it, so a single optimizer must always be stepped
/// with the same model.
pub trait Optimizer {
    fn step(&mut self, slot: usize, layer: &mut Dense, grads: &LayerGradients);

    fn learning_rate(&self) -> f64;
}
