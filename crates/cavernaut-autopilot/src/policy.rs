use cavernaut_engine::Movement;
use cavernaut_training::TrainingSample;
use rand::{Rng as _, SeedableRng as _, seq::IndexedRandom as _};
use rand_pcg::Pcg32;

use crate::{
    features::TERMINAL_FLAG_INDEX,
    network::{Network, OUTPUT_LEN},
};

/// Decision-making capability: choose movements, learn from experience.
///
/// The neural and random variants are interchangeable implementations picked
/// at construction time.
pub trait Policy {
    /// Chooses the next movement for the given feature vector.
    fn decide(&mut self, features: &[f64]) -> Movement;

    /// Fits the policy to recorded samples. An empty slice is a no-op.
    fn train(&mut self, samples: &[TrainingSample], epochs: usize);
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn decide(&mut self, features: &[f64]) -> Movement {
        (**self).decide(features)
    }

    fn train(&mut self, samples: &[TrainingSample], epochs: usize) {
        (**self).train(samples, epochs);
    }
}

const INITIAL_TEMPERATURE: f64 = 1.0;
const MIN_TEMPERATURE: f64 = 0.5;
const MAX_TEMPERATURE: f64 = 2.0;
const TEMPERATURE_STEP: f64 = 0.1;

/// Network-backed policy with temperature-scaled softmax exploration.
#[derive(Debug, Clone)]
pub struct NeuralPolicy {
    network: Network,
    rng: Pcg32,
    temperature: f64,
    last_choice: Option<Movement>,
}

impl NeuralPolicy {
    /// Creates a freshly initialized policy for the given input length.
    #[must_use]
    pub fn new(input_len: usize) -> Self {
        Self::with_rng(input_len, Pcg32::from_rng(&mut rand::rng()))
    }

    /// Like [`Self::new`], but with an explicit RNG for deterministic
    /// weight initialization and exploration.
    #[must_use]
    pub fn with_rng(input_len: usize, mut rng: Pcg32) -> Self {
        let network = Network::new(input_len, &mut rng);
        Self::from_network(network, rng)
    }

    /// Wraps an existing (e.g. previously saved) network.
    #[must_use]
    pub fn from_network(network: Network, rng: Pcg32) -> Self {
        Self {
            network,
            rng,
            temperature: INITIAL_TEMPERATURE,
            last_choice: None,
        }
    }

    #[must_use]
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Current exploration temperature.
    #[must_use]
    pub fn temperature(&self) -> f64 {
        self.temperature
    }
}

impl Policy for NeuralPolicy {
    fn decide(&mut self, features: &[f64]) -> Movement {
        let scores = self.network.forward(features);
        let probabilities = softmax(&scores, self.temperature);
        let index = sample_index(&probabilities, self.rng.random());
        let movement = Movement::from_class_index(index);

        // Repeating the previous choice heats exploration up; switching
        // cools it back toward exploitation.
        self.temperature = if self.last_choice == Some(movement) {
            (self.temperature + TEMPERATURE_STEP).min(MAX_TEMPERATURE)
        } else {
            (self.temperature - TEMPERATURE_STEP).max(MIN_TEMPERATURE)
        };
        self.last_choice = Some(movement);
        movement
    }

    fn train(&mut self, samples: &[TrainingSample], epochs: usize) {
        if samples.is_empty() {
            return;
        }
        let inputs: Vec<Vec<f64>> = samples.iter().map(|s| s.features().to_vec()).collect();
        let targets: Vec<[f64; OUTPUT_LEN]> = samples.iter().map(training_target).collect();
        self.network.train(&inputs, &targets, epochs);
    }
}

/// One-hot training target for a recorded sample.
///
/// A terminal observation records the fatal move, not a move worth imitating,
/// so it is re-labeled as straight flight regardless of the recorded label.
#[must_use]
pub fn training_target(sample: &TrainingSample) -> [f64; OUTPUT_LEN] {
    let terminal = sample
        .features()
        .get(TERMINAL_FLAG_INDEX)
        .is_some_and(|&flag| flag > 0.5);
    if terminal {
        Movement::Straight.to_one_hot()
    } else {
        sample.label().to_one_hot()
    }
}

fn softmax(scores: &[f64; OUTPUT_LEN], temperature: f64) -> [f64; OUTPUT_LEN] {
    let mut values = scores.map(|score| (score / temperature).exp());
    let sum: f64 = values.iter().sum();
    for value in &mut values {
        *value /= sum;
    }
    values
}

/// Walks the cumulative distribution for the first index exceeding `draw`.
///
/// Falls back to the last class when rounding leaves the cumulative sum below
/// the draw, or when the distribution degenerated to non-finite values.
fn sample_index(probabilities: &[f64; OUTPUT_LEN], draw: f64) -> usize {
    let mut cumulative = 0.0;
    for (index, probability) in probabilities.iter().enumerate() {
        cumulative += probability;
        if !cumulative.is_finite() {
            break;
        }
        if draw < cumulative {
            return index;
        }
    }
    OUTPUT_LEN - 1
}

/// Uniformly random policy, the fallback when no network is trained.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: Pcg32,
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(Pcg32::from_rng(&mut rand::rng()))
    }

    #[must_use]
    pub fn with_rng(rng: Pcg32) -> Self {
        Self { rng }
    }
}

impl Policy for RandomPolicy {
    fn decide(&mut self, _features: &[f64]) -> Movement {
        *Movement::ALL
            .choose(&mut self.rng)
            .expect("movement set is never empty")
    }

    fn train(&mut self, _samples: &[TrainingSample], _epochs: usize) {}
}
