use crate::layers::dense::{Dense, LayerGradients};
use crate::math::matrix::Matrix;
use crate::optim::optimizer::Optimizer;

/// Adam with bias-corrected first and second moment estimates.
///
/// Moment buffers are created on the first step for each layer slot, which
/// binds the optimizer to whatever parameters the model holds at that point.
pub struct Adam {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    state: Vec<Option<SlotState>>,
}

struct SlotState {
    step: i32,
    m_weights: Matrix,
    v_weights: Matrix,
    m_biases: Matrix,
    v_biases: Matrix,
}

impl Adam {
    pub fn new(learning_rate: f64) -> Adam {
        Adam::with_betas(learning_rate, 0.9, 0.999, 1e-8)
    }

    pub fn with_betas(learning_rate: f64, beta1: f64, beta2: f64, epsilon: f64) -> Adam {
        Adam { learning_rate, beta1, beta2, epsilon, state: Vec::new() }
    }

    /// Number of updates applied to `slot` so far.
    pub fn steps_taken(&self, slot: usize) -> usize {
        self.state.get(slot)
            .and_then(|s| s.as_ref())
            .map_or(0, |s| s.step as usize)
    }
}

impl Optimizer for Adam {
    fn step(&mut self, slot: usize, layer: &mut Dense, grads: &LayerGradients) {
        if self.state.len() <= slot {
            self.state.resize_with(slot + 1, || None);
        }
        let state = self.state[slot].get_or_insert_with(|| SlotState {
            step: 0,
            m_weights: Matrix::zeros(layer.weights.rows, layer.weights.cols),
            v_weights: Matrix::zeros(layer.weights.rows, layer.weights.cols),
            m_biases: Matrix::zeros(layer.biases.rows, layer.biases.cols),
            v_biases: Matrix::zeros(layer.biases.rows, layer.biases.cols),
        });
        state.step += 1;

        let correction1 = 1.0 - self.beta1.powi(state.step);
        let correction2 = 1.0 - self.beta2.powi(state.step);
        let hyper = (self.learning_rate, self.beta1, self.beta2, self.epsilon, correction1, correction2);

        update(&mut layer.weights, &grads.weights, &mut state.m_weights, &mut state.v_weights, hyper);
        update(&mut layer.biases, &grads.biases, &mut state.m_biases, &mut state.v_biases, hyper);
    }

    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }
}

fn update(
    param: &mut Matrix,
    grad: &Matrix,
    m: &mut Matrix,
    v: &mut Matrix,
    (lr, beta1, beta2, eps, correction1, correction2): (f64, f64, f64, f64, f64, f64),
) {
    let entries = param.iter_mut()
        .zip(grad.iter())
        .zip(m.iter_mut().zip(v.iter_mut()));
    for ((p, &g), (m_i, v_i)) in entries {
        *m_i = beta1 * *m_i + (1.0 - beta1) * g;
        *v_i = beta2 * *v_i + (1.0 - beta2) * g * g;
        let m_hat = *m_i / correction1;
        let v_hat = *v_i / correction2;
        *p -= lr * m_hat / (v_hat.sqrt() + eps);
    }
}
