use std::time::Duration;

use cavernaut_engine::{FlightSession, Movement};
use cavernaut_training::{SampleRow, SampleSink, TrainingBuffer, TrainingSample};

use crate::{features::extract_features, policy::Policy};

/// A feature sample is recorded every this many ticks.
pub const SAMPLE_EVERY_TICKS: u64 = 3;
/// The latest sample is handed to the persistence sink every this many ticks.
pub const PERSIST_EVERY_TICKS: u64 = 10;
/// Flights at or below this length restart immediately instead of showing
/// game over; they are treated as noise.
pub const SHORT_FLIGHT_THRESHOLD: Duration = Duration::from_secs(10);
/// A flight whose quality score clears this is good regardless of best time.
pub const GOOD_SCORE_THRESHOLD: f64 = 30.0;

/// Default number of training epochs per retrain.
pub const DEFAULT_TRAIN_EPOCHS: usize = 500;

/// Drives the whole simulate-then-learn loop, one step per external tick.
///
/// Owns the flight session, both training buffers, and (in autopilot mode)
/// the policy. The per-tick order is fixed: advance terrain, pick and apply a
/// movement, record a sample every [`SAMPLE_EVERY_TICKS`], persist the latest
/// sample every [`PERSIST_EVERY_TICKS`], and run flight-end handling when a
/// crash fires.
///
/// Everything here runs on the tick thread; only the sample sink crosses a
/// thread boundary, and it receives owned snapshots.
pub struct FlightController<P> {
    session: FlightSession,
    policy: Option<P>,
    sink: Option<Box<dyn SampleSink>>,
    current_flight: TrainingBuffer,
    retained: TrainingBuffer,
    train_epochs: usize,
    best_time: Duration,
    last_flight_good: bool,
    pending_movement: Option<Movement>,
    flights: u64,
}

impl FlightController<crate::policy::RandomPolicy> {
    /// Manual mode: movements come from [`Self::steer_input`], defaulting to
    /// straight flight. Samples are still recorded and persisted, but no
    /// training happens.
    #[must_use]
    pub fn manual(session: FlightSession) -> Self {
        Self::build(session, None, DEFAULT_TRAIN_EPOCHS)
    }
}

impl<P: Policy> FlightController<P> {
    /// Autopilot mode: `policy` decides every movement and is retrained on
    /// the retained corpus at flight boundaries.
    #[must_use]
    pub fn autopilot(session: FlightSession, policy: P, train_epochs: usize) -> Self {
        Self::build(session, Some(policy), train_epochs)
    }

    fn build(session: FlightSession, policy: Option<P>, train_epochs: usize) -> Self {
        Self {
            session,
            policy,
            sink: None,
            current_flight: TrainingBuffer::new(),
            retained: TrainingBuffer::new(),
            train_epochs,
            best_time: Duration::ZERO,
            last_flight_good: false,
            pending_movement: None,
            flights: 0,
        }
    }

    /// Attaches a persistence sink for sampled rows.
    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn SampleSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    #[must_use]
    pub fn session(&self) -> &FlightSession {
        &self.session
    }

    #[must_use]
    pub fn is_autopilot(&self) -> bool {
        self.policy.is_some()
    }

    #[must_use]
    pub fn best_time(&self) -> Duration {
        self.best_time
    }

    /// Completed flights since construction.
    #[must_use]
    pub fn flights(&self) -> u64 {
        self.flights
    }

    /// Whether the previous flight qualified as good.
    #[must_use]
    pub fn last_flight_good(&self) -> bool {
        self.last_flight_good
    }

    #[must_use]
    pub fn current_flight(&self) -> &TrainingBuffer {
        &self.current_flight
    }

    /// Corpus of samples retained from good flights.
    #[must_use]
    pub fn retained(&self) -> &TrainingBuffer {
        &self.retained
    }

    /// Queues a manual movement for the next tick. Ignored in autopilot mode.
    pub fn steer_input(&mut self, movement: Movement) {
        if self.policy.is_none() {
            self.pending_movement = Some(movement);
        }
    }

    /// Recovers the policy, e.g. to save its weights after a run.
    #[must_use]
    pub fn into_policy(self) -> Option<P> {
        self.policy
    }

    /// One simulation step. Does nothing while awaiting a reset.
    pub fn tick(&mut self) {
        if !self.session.session_state().is_flying() {
            return;
        }

        self.session.advance();

        if self.session.session_state().is_flying() {
            let movement = self.choose_movement();
            self.session.steer(movement);
        }

        if self.session.session_state().is_ended() {
            self.handle_flight_end();
            return;
        }

        if self.session.ticks() % SAMPLE_EVERY_TICKS == 0 {
            self.record_sample();
        }
        if self.session.ticks() % PERSIST_EVERY_TICKS == 0 {
            self.persist_latest();
        }
    }

    /// Starts the next flight, retraining first when experience is available.
    ///
    /// Training blocks the tick loop; that stall is intentional and only ever
    /// happens at a flight boundary.
    pub fn reset(&mut self) {
        if let Some(policy) = &mut self.policy
            && !self.retained.is_empty()
        {
            policy.train(self.retained.samples(), self.train_epochs);
            self.retained.clear();
        }
        self.current_flight.clear();
        self.pending_movement = None;
        self.session.reset();
    }

    fn choose_movement(&mut self) -> Movement {
        if let Some(policy) = &mut self.policy {
            let features =
                extract_features(self.session.state(), false, self.last_flight_good);
            policy.decide(&features)
        } else {
            self.pending_movement.take().unwrap_or_default()
        }
    }

    fn record_sample(&mut self) {
        let features = extract_features(
            self.session.state(),
            self.session.is_terminal(),
            self.last_flight_good,
        );
        let label = self.session.state().last_movement();
        self.current_flight.add(TrainingSample::new(features, label));
    }

    fn persist_latest(&self) {
        if let (Some(sink), Some(sample)) = (&self.sink, self.current_flight.latest()) {
            sink.submit(SampleRow {
                features: sample.features().to_vec(),
                label: sample.label(),
                good: self.last_flight_good,
            });
        }
    }

    fn handle_flight_end(&mut self) {
        self.flights += 1;
        let elapsed = self.session.elapsed();
        let score = self.session.quality_score();

        self.last_flight_good = elapsed > self.best_time || score > GOOD_SCORE_THRESHOLD;

        // Final observation of the flight, terminal flag raised.
        self.record_sample();

        if self.last_flight_good {
            self.best_time = self.best_time.max(elapsed);
            self.current_flight.merge_into(&mut self.retained);
        } else {
            self.current_flight.clear();
        }

        if elapsed <= SHORT_FLIGHT_THRESHOLD {
            self.reset();
        }
        // Otherwise stay ended until the external reset trigger fires.
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use cavernaut_engine::{SessionState, TerrainSeed};

    use crate::features::{FEATURE_LEN, TERMINAL_FLAG_INDEX};

    use super::*;

    fn seeded_session() -> FlightSession {
        FlightSession::with_seed(TerrainSeed([1; 16]))
    }

    /// Crashes a fresh flight by holding "up" from the center row; the crash
    /// lands on tick 12 (1.2s), well under the short-flight threshold.
    fn crash_quickly<P: Policy>(controller: &mut FlightController<P>) {
        for _ in 0..12 {
            controller.steer_input(Movement::Up);
            controller.tick();
        }
    }

    /// Policy stub that flies straight and records training calls.
    struct StraightPolicy {
        train_calls: Vec<usize>,
    }

    impl Policy for StraightPolicy {
        fn decide(&mut self, _features: &[f64]) -> Movement {
            Movement::Straight
        }

        fn train(&mut self, samples: &[TrainingSample], _epochs: usize) {
            self.train_calls.push(samples.len());
        }
    }

    /// Synchronous sink stub capturing submitted rows.
    #[derive(Clone, Default)]
    struct MemorySink {
        rows: Arc<Mutex<Vec<SampleRow>>>,
    }

    impl SampleSink for MemorySink {
        fn submit(&self, row: SampleRow) {
            self.rows.lock().unwrap().push(row);
        }
    }

    #[test]
    fn test_short_flight_auto_resets() {
        let mut controller = FlightController::manual(seeded_session());
        crash_quickly(&mut controller);

        // No game-over state: the controller reset itself immediately.
        assert_eq!(controller.session().session_state(), SessionState::Flying);
        assert_eq!(controller.session().ticks(), 0);
        assert_eq!(controller.flights(), 1);
    }

    #[test]
    fn test_first_flight_beats_zero_best_time_and_is_retained() {
        let mut controller = FlightController::manual(seeded_session());
        crash_quickly(&mut controller);

        assert!(controller.last_flight_good());
        assert_eq!(controller.best_time(), Duration::from_millis(1200));
        // Samples from ticks 3, 6, 9 plus the terminal one from tick 12.
        assert_eq!(controller.retained().len(), 4);
        assert!(controller.current_flight().is_empty());
    }

    #[test]
    fn test_terminal_flag_is_raised_only_on_final_sample() {
        let mut controller = FlightController::manual(seeded_session());
        crash_quickly(&mut controller);

        let samples = controller.retained().samples();
        let flags: Vec<f64> = samples
            .iter()
            .map(|s| s.features()[TERMINAL_FLAG_INDEX])
            .collect();
        assert_eq!(flags, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_autopilot_trains_on_retained_corpus_at_reset() {
        let policy = StraightPolicy { train_calls: vec![] };
        let mut controller =
            FlightController::autopilot(seeded_session(), policy, DEFAULT_TRAIN_EPOCHS);

        // Straight flight from the center never leaves the grid; the crash
        // comes from the cavern walls wandering across row 11 instead. Cap
        // the loop generously.
        for _ in 0..5_000 {
            controller.tick();
            if controller.flights() > 0 {
                break;
            }
        }
        assert!(controller.flights() > 0, "flight never ended");
        if controller.session().session_state().is_ended() {
            // Long flights wait for the external reset trigger.
            controller.reset();
        }

        let policy = controller.into_policy().unwrap();
        assert_eq!(policy.train_calls.len(), 1);
        assert!(policy.train_calls[0] > 0);
    }

    #[test]
    fn test_retained_corpus_cleared_after_training() {
        let policy = StraightPolicy { train_calls: vec![] };
        let mut controller =
            FlightController::autopilot(seeded_session(), policy, DEFAULT_TRAIN_EPOCHS);
        for _ in 0..5_000 {
            controller.tick();
            if controller.flights() > 0 {
                break;
            }
        }
        if controller.session().session_state().is_ended() {
            controller.reset();
        }
        assert!(controller.retained().is_empty());
        assert!(controller.current_flight().is_empty());
    }

    #[test]
    fn test_samples_recorded_every_third_tick() {
        let mut controller = FlightController::manual(seeded_session());
        for _ in 0..9 {
            controller.tick();
        }
        assert_eq!(controller.current_flight().len(), 3);
        for sample in controller.current_flight().samples() {
            assert_eq!(sample.features().len(), FEATURE_LEN);
        }
    }

    #[test]
    fn test_latest_sample_persisted_every_tenth_tick() {
        let sink = MemorySink::default();
        let mut controller = FlightController::manual(seeded_session()).with_sink(Box::new(sink.clone()));

        // No collision can reach the player column within the first 14 ticks,
        // so ten straight ticks always survive.
        for _ in 0..10 {
            controller.tick();
        }

        let rows = sink.rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        // The row snapshots the tick-9 sample.
        assert_eq!(rows[0].features.len(), FEATURE_LEN);
        assert_eq!(rows[0].label, Movement::Straight);
    }

    #[test]
    fn test_manual_movements_apply_once() {
        let mut controller = FlightController::manual(seeded_session());
        controller.steer_input(Movement::Down);
        controller.tick();
        assert_eq!(controller.session().state().player_row(), 12);
        // Without fresh input the plane flies straight.
        controller.tick();
        assert_eq!(controller.session().state().player_row(), 12);
    }
}
