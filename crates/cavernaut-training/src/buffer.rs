use cavernaut_engine::Movement;

use crate::sample::TrainingSample;

/// Ordered collection of training samples.
///
/// Two instances exist at runtime: one scoped to the in-progress flight and
/// one holding the retained corpus of good flights. Samples move between them
/// only through [`Self::merge_into`].
#[derive(Debug, Clone, Default)]
pub struct TrainingBuffer {
    samples: Vec<TrainingSample>,
}

impl TrainingBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, sample: TrainingSample) {
        self.samples.push(sample);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn samples(&self) -> &[TrainingSample] {
        &self.samples
    }

    /// The most recently added sample, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&TrainingSample> {
        self.samples.last()
    }

    /// Moves every sample into `other`, preserving insertion order and
    /// leaving this buffer empty.
    pub fn merge_into(&mut self, other: &mut TrainingBuffer) {
        other.samples.append(&mut self.samples);
    }

    /// Dense row-major snapshot in insertion order: feature matrix plus
    /// one-hot labels, ready for bulk training or persistence.
    #[must_use]
    pub fn export(&self) -> (Vec<Vec<f64>>, Vec<[f64; Movement::LEN]>) {
        let features = self.samples.iter().map(|s| s.features().to_vec()).collect();
        let labels = self.samples.iter().map(|s| s.label().to_one_hot()).collect();
        (features, labels)
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(value: f64, label: Movement) -> TrainingSample {
        TrainingSample::new(vec![value; 4], label)
    }

    #[test]
    fn test_merge_into_drains_source_into_destination() {
        let mut flight = TrainingBuffer::new();
        let mut corpus = TrainingBuffer::new();
        corpus.add(sample(0.0, Movement::Straight));
        flight.add(sample(1.0, Movement::Up));
        flight.add(sample(2.0, Movement::Down));

        flight.merge_into(&mut corpus);

        assert!(flight.is_empty());
        assert_eq!(corpus.len(), 3);
        // Merged samples keep their order, appended after existing ones.
        assert_eq!(corpus.samples()[1].features()[0], 1.0);
        assert_eq!(corpus.samples()[2].features()[0], 2.0);
    }

    #[test]
    fn test_export_reflects_insertion_order() {
        let mut buffer = TrainingBuffer::new();
        buffer.add(sample(1.0, Movement::Up));
        buffer.add(sample(2.0, Movement::Straight));
        buffer.add(sample(3.0, Movement::Down));

        let (features, labels) = buffer.export();
        assert_eq!(features.len(), 3);
        assert_eq!(
            features.iter().map(|row| row[0]).collect::<Vec<_>>(),
            [1.0, 2.0, 3.0]
        );
        assert_eq!(labels[0], Movement::Up.to_one_hot());
        assert_eq!(labels[1], Movement::Straight.to_one_hot());
        assert_eq!(labels[2], Movement::Down.to_one_hot());
    }

    #[test]
    fn test_latest_and_clear() {
        let mut buffer = TrainingBuffer::new();
        assert!(buffer.latest().is_none());
        buffer.add(sample(1.0, Movement::Up));
        buffer.add(sample(2.0, Movement::Down));
        assert_eq!(buffer.latest().unwrap().features()[0], 2.0);

        buffer.clear();
        assert!(buffer.is_empty());
        assert!(buffer.latest().is_none());
    }
}
