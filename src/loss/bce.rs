/// Binary cross-entropy over a batch of sigmoid probabilities.
pub struct BceLoss;

/// Lower bound applied to each log term so a saturated prediction costs 100
/// instead of infinity.
const LOG_FLOOR: f64 = -100.0;

impl BceLoss {
    pub fn new() -> BceLoss {
        BceLoss
    }

    /// Scalar BCE: -mean(y·log(p) + (1-y)·log(1-p))
    pub fn loss(&self, predicted: &[f64], expected: &[f64]) -> f64 {
        assert_eq!(predicted.len(), expected.len(), "prediction/label length mismatch");
        if predicted.is_empty() {
            return 0.0;
        }
        let n = predicted.len() as f64;
        predicted.iter().zip(expected.iter())
            .map(|(p, y)| {
                let log_p = p.ln().max(LOG_FLOOR);
                let log_q = (1.0 - p).ln().max(LOG_FLOOR);
                -(y * log_p + (1.0 - y) * log_q)
            })
            .sum::<f64>() / n
    }

    /// Gradient of the batch-mean loss w.r.t. the sigmoid's input logits.
    ///
    /// Sigmoid and BCE compose to `(p - y) / n`, so the output layer should
    /// take this through `Dense::backward_from_logits` rather than multiply by
    /// σ'(z) again.
    pub fn logit_gradient(&self, predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        let n = predicted.len().max(1) as f64;
        predicted.iter().zip(expected.iter())
            .map(|(p, y)| (p - y) / n)
            .collect()
    }
}

impl Default for BceLoss {
    fn default() -> Self {
        BceLoss::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_predictions_cost_nothing() {
        let loss = BceLoss::new().loss(&[1.0, 0.0], &[1.0, 0.0]);
        assert!(loss.abs() < 1e-12);
    }

    #[test]
    fn coin_flip_costs_ln_two() {
        let loss = BceLoss::new().loss(&[0.5, 0.5], &[1.0, 0.0]);
        assert!((loss - std::f64::consts::LN_2).abs() < 1e-12);
    }

    #[test]
    fn confident_mistakes_are_clamped() {
        let loss = BceLoss::new().loss(&[0.0], &[1.0]);
        assert_eq!(loss, 100.0);
    }

    #[test]
    fn logit_gradient_is_batch_averaged() {
        let g = BceLoss::new().logit_gradient(&[0.75, 0.25], &[1.0, 1.0]);
        assert_eq!(g, vec![-0.125, -0.375]);
    }
}
