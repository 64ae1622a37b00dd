use std::time::Duration;

use crate::core::{
    movement::Movement,
    terrain::{TerrainGenerator, TerrainSeed},
};

use super::state::FlightState;

/// Interval between simulation ticks.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Quality score awarded per survived tick.
pub const SCORE_PER_TICK: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Flying,
    Ended,
}

/// Why a flight ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum CrashCause {
    #[display("flew out of bounds")]
    OutOfBounds,
    #[display("hit the cavern wall")]
    Collision,
}

/// One life of the plane, from reset to crash.
///
/// Drives the terrain generator and flight state through the two per-tick
/// steps: [`Self::advance`] (scroll plus collision check) and [`Self::steer`]
/// (move plus bounds and collision checks). Whichever check fires first ends
/// the flight; both run every tick.
#[derive(Debug, Clone)]
pub struct FlightSession {
    state: FlightState,
    terrain: TerrainGenerator,
    session_state: SessionState,
    ticks: u64,
    crash_cause: Option<CrashCause>,
}

impl Default for FlightSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FlightSession {
    #[must_use]
    pub fn new() -> Self {
        Self::with_terrain(TerrainGenerator::new())
    }

    /// Like [`Self::new`], but with a deterministic cavern.
    #[must_use]
    pub fn with_seed(seed: TerrainSeed) -> Self {
        Self::with_terrain(TerrainGenerator::with_seed(seed))
    }

    fn with_terrain(terrain: TerrainGenerator) -> Self {
        Self {
            state: FlightState::new(),
            terrain,
            session_state: SessionState::Flying,
            ticks: 0,
            crash_cause: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> &FlightState {
        &self.state
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Whether the most recent observation is a crash state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.crash_cause.is_some()
    }

    #[must_use]
    pub fn crash_cause(&self) -> Option<CrashCause> {
        self.crash_cause
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        // saturates past u32::MAX ticks (~13 years of flight)
        TICK_INTERVAL * u32::try_from(self.ticks).unwrap_or(u32::MAX)
    }

    /// Flight quality, monotonic in survived ticks.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn quality_score(&self) -> f64 {
        self.ticks as f64 * SCORE_PER_TICK
    }

    /// One generation step: count the tick, carve and recycle a column, and
    /// check the plane against the refreshed board.
    pub fn advance(&mut self) {
        if self.session_state.is_ended() {
            return;
        }
        self.ticks += 1;
        let column = self.terrain.advance();
        self.state.scroll(column);
        if self.state.is_colliding() {
            self.end(CrashCause::Collision);
        }
    }

    /// Applies one steering input, ending the flight on a crash.
    pub fn steer(&mut self, movement: Movement) {
        if self.session_state.is_ended() {
            return;
        }
        self.state.apply_move(movement);
        if self.state.is_out_of_bounds() {
            self.end(CrashCause::OutOfBounds);
        } else if self.state.is_colliding() {
            self.end(CrashCause::Collision);
        }
    }

    fn end(&mut self, cause: CrashCause) {
        self.crash_cause = Some(cause);
        self.session_state = SessionState::Ended;
    }

    /// Starts the next flight: open cavern, centered plane, zeroed clock.
    ///
    /// The terrain boundaries keep their current values so the cavern resumes
    /// where it left off.
    pub fn reset(&mut self) {
        self.state.reset();
        self.session_state = SessionState::Flying;
        self.ticks = 0;
        self.crash_cause = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::terrain::TerrainSeed;

    fn seeded_session() -> FlightSession {
        FlightSession::with_seed(TerrainSeed([1; 16]))
    }

    #[test]
    fn test_steering_up_from_center_crashes_on_twelfth_move() {
        let mut session = seeded_session();
        // Row 11 -> row 0 takes 11 moves; the 12th would reach row -1.
        for _ in 0..11 {
            session.steer(Movement::Up);
            assert!(session.session_state().is_flying());
        }
        session.steer(Movement::Up);
        assert!(session.session_state().is_ended());
        assert_eq!(session.crash_cause(), Some(CrashCause::OutOfBounds));
    }

    #[test]
    fn test_advance_counts_ticks_and_scrolls() {
        let mut session = seeded_session();
        // 14 advances: the first carved column reaches the plane on the 15th,
        // so no crash is possible yet regardless of seed.
        for expected in 1..=14 {
            session.advance();
            assert_eq!(session.ticks(), expected);
        }
        assert!(session.session_state().is_flying());
    }

    #[test]
    fn test_elapsed_and_score_follow_ticks() {
        let mut session = seeded_session();
        for _ in 0..9 {
            session.advance();
        }
        assert_eq!(session.elapsed(), Duration::from_millis(900));
        assert!((session.quality_score() - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_ended_session_ignores_further_input() {
        let mut session = seeded_session();
        for _ in 0..12 {
            session.steer(Movement::Up);
        }
        let ticks = session.ticks();
        session.advance();
        session.steer(Movement::Down);
        assert_eq!(session.ticks(), ticks);
        assert!(session.session_state().is_ended());
    }

    #[test]
    fn test_reset_returns_to_flying() {
        let mut session = seeded_session();
        for _ in 0..12 {
            session.steer(Movement::Up);
        }
        session.reset();
        assert!(session.session_state().is_flying());
        assert!(!session.is_terminal());
        assert_eq!(session.ticks(), 0);
        assert_eq!(session.state().player_row(), crate::START_ROW);
    }
}
