use crate::layers::dense::{Dense, LayerGradients};
use crate::optim::optimizer::Optimizer;

/// Plain stochastic gradient descent: `w -= lr · g`.
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }
}

impl Optimizer for Sgd {
    fn step(&mut self, _slot: usize, layer: &mut Dense, grads: &LayerGradients) {
        layer.apply_gradients(grads, self.learning_rate);
    }

    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }
}
