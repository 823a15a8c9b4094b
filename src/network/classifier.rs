use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

use anyhow::Result;
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::layers::dense::{Dense, LayerGradients};
use crate::math::matrix::Matrix;
use crate::network::spec::ClassifierSpec;
use crate::optim::optimizer::Optimizer;

/// Whether the model is recording activations for a backward pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Train,
    Eval,
}

/// Two ReLU hidden layers and a single sigmoid output unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryClassifier {
    pub spec: ClassifierSpec,
    pub fc1: Dense,
    pub fc2: Dense,
    pub fc_out: Dense,
    #[serde(skip)]
    mode: Mode,
}

impl BinaryClassifier {
    pub fn new<R: Rng>(spec: ClassifierSpec, rng: &mut R) -> Result<BinaryClassifier> {
        spec.validate()?;
        let [h1, h2] = spec.hidden_sizes;
        Ok(BinaryClassifier {
            spec,
            fc1: Dense::new(h1, spec.input_size, ActivationFunction::ReLU, rng),
            fc2: Dense::new(h2, h1, ActivationFunction::ReLU, rng),
            fc_out: Dense::new(1, h2, ActivationFunction::Sigmoid, rng),
            mode: Mode::Train,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn train(&mut self) {
        self.mode = Mode::Train;
    }

    /// Switches to inference; recorded activations are dropped.
    pub fn eval(&mut self) {
        self.mode = Mode::Eval;
        for layer in self.layers_mut() {
            layer.clear_cache();
        }
    }

    /// Probabilities for a batch, shape (batch, 1). In training mode each
    /// layer keeps what `backward` needs.
    pub fn forward(&mut self, inputs: &Matrix) -> Matrix {
        match self.mode {
            Mode::Train => {
                let h1 = self.fc1.forward(inputs);
                let h2 = self.fc2.forward(&h1);
                self.fc_out.forward(&h2)
            }
            Mode::Eval => self.infer(inputs),
        }
    }

    /// Forward pass that never records state, regardless of mode.
    pub fn infer(&self, inputs: &Matrix) -> Matrix {
        let h1 = self.fc1.infer(inputs);
        let h2 = self.fc2.infer(&h1);
        self.fc_out.infer(&h2)
    }

    /// One probability per row.
    pub fn predict_proba(&self, inputs: &Matrix) -> Vec<f64> {
        self.infer(inputs).column_values()
    }

    /// Backpropagates `∂L/∂z` at the output logits through all three layers.
    /// Gradients are returned input layer first.
    pub(crate) fn backward(&self, output_delta: &Matrix) -> [LayerGradients; 3] {
        debug_assert_eq!(self.mode, Mode::Train, "backward requires training mode");
        let (g_out, grad_h2) = self.fc_out.backward_from_logits(output_delta);
        let (g2, grad_h1) = self.fc2.backward(&grad_h2);
        let (g1, _) = self.fc1.backward(&grad_h1);
        [g1, g2, g_out]
    }

    /// Hands every layer's gradients to `optimizer`, one slot per layer.
    pub(crate) fn apply<O: Optimizer + ?Sized>(&mut self, optimizer: &mut O, grads: &[LayerGradients; 3]) {
        for (slot, (layer, g)) in self.layers_mut().into_iter().zip(grads.iter()).enumerate() {
            optimizer.step(slot, layer, g);
        }
    }

    pub fn layers(&self) -> [&Dense; 3] {
        [&self.fc1, &self.fc2, &self.fc_out]
    }

    pub fn layers_mut(&mut self) -> [&mut Dense; 3] {
        [&mut self.fc1, &mut self.fc2, &mut self.fc_out]
    }

    /// Serializes the classifier weights to a pretty-printed JSON file.
    pub fn save_json(&self, path: &Path) -> io::Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }

    /// Deserializes a classifier previously written by `save_json`. It comes
    /// back in training mode.
    pub fn load_json(path: &Path) -> io::Result<BinaryClassifier> {
        let reader = BufReader::new(File::open(path)?);
        serde_json::from_reader(reader)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn model() -> BinaryClassifier {
        let mut rng = StdRng::seed_from_u64(11);
        BinaryClassifier::new(ClassifierSpec::new(4, [8, 4]), &mut rng).unwrap()
    }

    #[test]
    fn layer_shapes_follow_the_spec() {
        let m = model();
        let shapes: Vec<(usize, usize)> = m.layers().iter().map(|l| (l.input_size(), l.size())).collect();
        assert_eq!(shapes, vec![(4, 8), (8, 4), (4, 1)]);
    }

    #[test]
    fn forward_yields_one_probability_per_row() {
        let mut m = model();
        let x = Matrix::from_data(vec![vec![100.0, -50.0, 3.0, 0.0]; 5]);
        let out = m.forward(&x);
        assert_eq!((out.rows, out.cols), (5, 1));
        assert!(out.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn modes_switch_explicitly() {
        let mut m = model();
        assert_eq!(m.mode(), Mode::Train);
        m.eval();
        assert_eq!(m.mode(), Mode::Eval);
        m.train();
        assert_eq!(m.mode(), Mode::Train);
    }

    #[test]
    fn eval_forward_matches_train_forward() {
        let mut m = model();
        let x = Matrix::from_data(vec![vec![0.1, 0.2, 0.3, 0.4], vec![1.0, 0.0, -1.0, 0.5]]);
        let trained = m.forward(&x);
        m.eval();
        assert_eq!(trained, m.forward(&x));
    }

    #[test]
    fn json_round_trip_preserves_predictions() {
        let m = model();
        let path = std::env::temp_dir().join(format!("ferrite-tune-model-{}.json", std::process::id()));
        m.save_json(&path).unwrap();
        let loaded = BinaryClassifier::load_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let x = Matrix::from_data(vec![vec![0.5, -0.5, 0.25, 1.0]]);
        let (a, b) = (m.predict_proba(&x)[0], loaded.predict_proba(&x)[0]);
        assert!((a - b).abs() < 1e-9);
        assert_eq!(loaded.mode(), Mode::Train);
    }
}
