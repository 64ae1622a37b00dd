use cavernaut_engine::Movement;
use rand::Rng;
use rand_distr::{Distribution as _, Normal};
use serde::{Deserialize, Serialize};

/// Number of output units, one score per movement class.
pub const OUTPUT_LEN: usize = Movement::LEN;

const LEARNING_RATE: f64 = 0.05;
/// Training short-circuits once the batch MSE drops below this.
const ERROR_THRESHOLD: f64 = 1e-3;

/// Small feed-forward network mapping feature vectors to movement scores.
///
/// One sigmoid hidden layer of `max(1, input / 2)` units feeding three linear
/// outputs. Weights are stored flat, row-major per destination unit with the
/// bias as the last entry of each row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    input_len: usize,
    hidden_len: usize,
    hidden_weights: Vec<f64>,
    output_weights: Vec<f64>,
}

impl Network {
    /// Creates a network with Gaussian weights scaled by fan-in.
    #[must_use]
    pub fn new(input_len: usize, rng: &mut impl Rng) -> Self {
        let hidden_len = (input_len / 2).max(1);
        let hidden_weights = init_weights(hidden_len * (input_len + 1), input_len, rng);
        let output_weights = init_weights(OUTPUT_LEN * (hidden_len + 1), hidden_len, rng);
        Self {
            input_len,
            hidden_len,
            hidden_weights,
            output_weights,
        }
    }

    #[must_use]
    pub fn input_len(&self) -> usize {
        self.input_len
    }

    /// Raw movement-class scores for one feature vector.
    ///
    /// # Panics
    ///
    /// Panics if `input` does not match the network's input length; a length
    /// mismatch is a programming error, never recoverable data.
    #[must_use]
    pub fn forward(&self, input: &[f64]) -> [f64; OUTPUT_LEN] {
        assert_eq!(
            input.len(),
            self.input_len,
            "feature vector length mismatch"
        );
        let hidden = self.hidden_activations(input);
        self.output_activations(&hidden)
    }

    /// Full-batch gradient descent against the given targets.
    ///
    /// Runs up to `epochs` iterations over the whole batch, stopping early
    /// once the MSE falls below the error threshold. Returns the final MSE
    /// (0.0 for an empty batch).
    pub fn train(&mut self, inputs: &[Vec<f64>], targets: &[[f64; OUTPUT_LEN]], epochs: usize) -> f64 {
        assert_eq!(inputs.len(), targets.len());
        if inputs.is_empty() {
            return 0.0;
        }

        let mut mse = f64::INFINITY;
        for _ in 0..epochs {
            mse = self.train_epoch(inputs, targets);
            if mse < ERROR_THRESHOLD {
                break;
            }
        }
        mse
    }

    #[expect(clippy::cast_precision_loss)]
    fn train_epoch(&mut self, inputs: &[Vec<f64>], targets: &[[f64; OUTPUT_LEN]]) -> f64 {
        let hidden_stride = self.input_len + 1;
        let output_stride = self.hidden_len + 1;
        let mut hidden_grad = vec![0.0; self.hidden_weights.len()];
        let mut output_grad = vec![0.0; self.output_weights.len()];
        let mut squared_error = 0.0;

        for (input, target) in inputs.iter().zip(targets) {
            let hidden = self.hidden_activations(input);
            let output = self.output_activations(&hidden);

            // Linear outputs under MSE: delta is just the residual.
            let output_delta: [f64; OUTPUT_LEN] =
                std::array::from_fn(|k| output[k] - target[k]);
            squared_error += output_delta.iter().map(|d| d * d).sum::<f64>();

            for (k, &delta) in output_delta.iter().enumerate() {
                let row = &mut output_grad[k * output_stride..][..output_stride];
                for (g, &h) in row[..self.hidden_len].iter_mut().zip(&hidden) {
                    *g += delta * h;
                }
                row[self.hidden_len] += delta;
            }

            for (j, &h) in hidden.iter().enumerate() {
                let back: f64 = output_delta
                    .iter()
                    .enumerate()
                    .map(|(k, &delta)| delta * self.output_weights[k * output_stride + j])
                    .sum();
                let delta = back * h * (1.0 - h);
                let row = &mut hidden_grad[j * hidden_stride..][..hidden_stride];
                for (g, &x) in row[..self.input_len].iter_mut().zip(input) {
                    *g += delta * x;
                }
                row[self.input_len] += delta;
            }
        }

        let scale = LEARNING_RATE / inputs.len() as f64;
        for (w, g) in self.hidden_weights.iter_mut().zip(&hidden_grad) {
            *w -= scale * g;
        }
        for (w, g) in self.output_weights.iter_mut().zip(&output_grad) {
            *w -= scale * g;
        }

        squared_error / (inputs.len() * OUTPUT_LEN) as f64
    }

    fn hidden_activations(&self, input: &[f64]) -> Vec<f64> {
        debug_assert_eq!(input.len(), self.input_len);
        let stride = self.input_len + 1;
        (0..self.hidden_len)
            .map(|j| {
                let row = &self.hidden_weights[j * stride..][..stride];
                let sum: f64 = row[..self.input_len]
                    .iter()
                    .zip(input)
                    .map(|(w, x)| w * x)
                    .sum::<f64>()
                    + row[self.input_len];
                sigmoid(sum)
            })
            .collect()
    }

    fn output_activations(&self, hidden: &[f64]) -> [f64; OUTPUT_LEN] {
        let stride = self.hidden_len + 1;
        std::array::from_fn(|k| {
            let row = &self.output_weights[k * stride..][..stride];
            row[..self.hidden_len]
                .iter()
                .zip(hidden)
                .map(|(w, h)| w * h)
                .sum::<f64>()
                + row[self.hidden_len]
        })
    }
}

#[expect(clippy::cast_precision_loss)]
fn init_weights(count: usize, fan_in: usize, rng: &mut impl Rng) -> Vec<f64> {
    let std_dev = (1.0 / fan_in.max(1) as f64).sqrt();
    let normal = Normal::new(0.0, std_dev).expect("standard deviation is finite");
    (0..count).map(|_| normal.sample(rng)).collect()
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn rng() -> Pcg32 {
        Pcg32::from_seed([3; 16])
    }

    #[test]
    fn test_forward_is_deterministic_for_a_given_seed() {
        let network = Network::new(4, &mut rng());
        let other = Network::new(4, &mut rng());
        let input = [0.5, -0.5, 1.0, 0.0];
        assert_eq!(network.forward(&input), other.forward(&input));
    }

    #[test]
    #[should_panic(expected = "feature vector length mismatch")]
    fn test_forward_rejects_wrong_input_length() {
        let network = Network::new(4, &mut rng());
        let _ = network.forward(&[1.0, 2.0]);
    }

    #[test]
    fn test_train_on_empty_batch_is_a_no_op() {
        let mut network = Network::new(4, &mut rng());
        let before = network.clone();
        let mse = network.train(&[], &[], 100);
        assert_eq!(mse, 0.0);
        assert_eq!(network.forward(&[0.0; 4]), before.forward(&[0.0; 4]));
    }

    #[test]
    fn test_training_reduces_error_on_separable_classes() {
        let mut network = Network::new(2, &mut rng());
        // First input dimension determines the class outright.
        let inputs = vec![
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![-1.0, 0.0],
            vec![-1.0, 1.0],
        ];
        let targets = vec![
            [1.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, 1.0],
        ];

        let initial = network.train(&inputs, &targets, 1);
        let trained = network.train(&inputs, &targets, 5000);
        assert!(trained < initial, "{trained} should beat {initial}");

        // The dominant score should track the class after training.
        let up = network.forward(&[1.0, 0.5]);
        assert!(up[0] > up[1] && up[0] > up[2], "{up:?}");
        let down = network.forward(&[-1.0, 0.5]);
        assert!(down[2] > down[0] && down[2] > down[1], "{down:?}");
    }

    #[test]
    fn test_serialization_round_trip_preserves_outputs() {
        let network = Network::new(4, &mut rng());
        let json = serde_json::to_string(&network).unwrap();
        let restored: Network = serde_json::from_str(&json).unwrap();
        let input = [0.1, 0.2, 0.3, 0.4];
        assert_eq!(network.forward(&input), restored.forward(&input));
    }
}
