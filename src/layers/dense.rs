use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::{math::matrix::Matrix, activation::activation::ActivationFunction};

/// Fully-connected layer computing `activation(x · W + b)` over a batch.
///
/// `weights` has shape (input_size, size) and `biases` shape (1, size), so a
/// batch of row-vector samples multiplies from the left.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dense{
    pub weights: Matrix,
    pub biases: Matrix,
    pub activator: ActivationFunction,
    /// Last batch seen by `forward`, needed for the weight gradient.
    #[serde(skip)]
    input: Matrix,
    /// Pre-activation values (z = xW + b) needed for the correct derivative.
    #[serde(skip)]
    pre_activation: Matrix,
}

/// Gradients of the batch loss w.r.t. one layer's parameters.
#[derive(Debug, Clone)]
pub struct LayerGradients {
    pub weights: Matrix,
    pub biases: Matrix,
}

impl Dense {
    pub fn new<R: Rng>(
        size: usize,
        input_size: usize,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> Dense {
        Dense {
            weights: Matrix::fan_in_uniform(input_size, size, input_size, rng),
            biases: Matrix::fan_in_uniform(1, size, input_size, rng),
            activator: activation,
            input: Matrix::default(),
            pre_activation: Matrix::default(),
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    pub fn size(&self) -> usize {
        self.weights.cols
    }

    /// Linear part only: `x · W + b`.
    pub fn logits(&self, input: &Matrix) -> Matrix {
        input.dot(&self.weights).add_row(&self.biases)
    }

    /// Forward pass that records what the backward pass needs.
    pub fn forward(&mut self, input: &Matrix) -> Matrix {
        let z = self.logits(input);
        let a = z.map(|x| self.activator.function(x));
        self.input = input.clone();
        self.pre_activation = z;
        a
    }

    /// Forward pass with no recorded state.
    pub fn infer(&self, input: &Matrix) -> Matrix {
        let activator = self.activator;
        self.logits(input).map(|x| activator.function(x))
    }

    /// Backward pass from `∂L/∂a` (error in activation space).
    /// Returns this layer's gradients and `∂L/∂x` for the layer below.
    pub fn backward(&self, grad_output: &Matrix) -> (LayerGradients, Matrix) {
        // Use pre-activation z so that derivative(z) = σ'(z) is computed correctly
        let act_derivative = self.pre_activation.map(|x| self.activator.derivative(x));
        let delta = grad_output.hadamard(&act_derivative);
        self.backward_from_logits(&delta)
    }

    /// Backward pass from `∂L/∂z`, for callers that fused the activation
    /// derivative into the loss gradient.
    pub fn backward_from_logits(&self, delta: &Matrix) -> (LayerGradients, Matrix) {
        assert_eq!(
            delta.rows, self.input.rows,
            "backward called without a matching forward pass"
        );
        let grads = LayerGradients {
            weights: self.input.transpose().dot(delta),
            biases: delta.sum_rows(),
        };
        let grad_input = delta.dot(&self.weights.transpose());
        (grads, grad_input)
    }

    /// Applies pre-computed gradients scaled by lr.
    pub fn apply_gradients(&mut self, grads: &LayerGradients, lr: f64) {
        self.weights = &self.weights - &grads.weights.scale(lr);
        self.biases = &self.biases - &grads.biases.scale(lr);
    }

    /// Drops the recorded batch so no stale state outlives a training pass.
    pub fn clear_cache(&mut self) {
        self.input = Matrix::default();
        self.pre_activation = Matrix::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn identity_like_layer() -> Dense {
        let mut rng = StdRng::seed_from_u64(0);
        let mut layer = Dense::new(2, 2, ActivationFunction::ReLU, &mut rng);
        layer.weights = Matrix::from_data(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        layer.biases = Matrix::from_data(vec![vec![0.0, 0.0]]);
        layer
    }

    #[test]
    fn forward_and_infer_agree() {
        let mut layer = identity_like_layer();
        let x = Matrix::from_data(vec![vec![1.0, -2.0], vec![-0.5, 3.0]]);
        let a = layer.forward(&x);
        assert_eq!(a, layer.infer(&x));
        assert_eq!(a.data, vec![vec![1.0, 0.0], vec![0.0, 3.0]]);
    }

    #[test]
    fn backward_masks_inactive_relu_units() {
        let mut layer = identity_like_layer();
        let x = Matrix::from_data(vec![vec![1.0, -2.0]]);
        layer.forward(&x);
        let (grads, grad_input) = layer.backward(&Matrix::from_data(vec![vec![1.0, 1.0]]));
        assert_eq!(grads.biases.data, vec![vec![1.0, 0.0]]);
        assert_eq!(grads.weights.data, vec![vec![1.0, 0.0], vec![-2.0, 0.0]]);
        assert_eq!(grad_input.data, vec![vec![1.0, 0.0]]);
    }

    #[test]
    fn apply_gradients_steps_against_the_gradient() {
        let mut layer = identity_like_layer();
        let grads = LayerGradients {
            weights: Matrix::from_data(vec![vec![1.0, 0.0], vec![0.0, 0.0]]),
            biases: Matrix::from_data(vec![vec![0.0, 2.0]]),
        };
        layer.apply_gradients(&grads, 0.5);
        assert_eq!(layer.weights.data[0][0], 0.5);
        assert_eq!(layer.biases.data[0][1], -1.0);
    }
}
