use cavernaut_engine::Movement;

/// Immutable carrier for one recorded observation.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSample {
    features: Vec<f64>,
    label: Movement,
}

impl TrainingSample {
    #[must_use]
    pub fn new(features: Vec<f64>, label: Movement) -> Self {
        Self { features, label }
    }

    #[must_use]
    pub fn features(&self) -> &[f64] {
        &self.features
    }

    #[must_use]
    pub fn label(&self) -> Movement {
        self.label
    }
}
