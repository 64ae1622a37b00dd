use crate::core::{
    grid::{Column, GRID_HEIGHT, Grid, PLAYER_COLUMN},
    movement::Movement,
};

/// Starting (and reset) row for the plane, roughly mid-cavern.
pub const START_ROW: i32 = 11;

/// The visible cavern plus the plane.
///
/// Owns the rolling column window and the player's row. Per tick it takes one
/// generated column via [`Self::scroll`] and one steering input via
/// [`Self::apply_move`]; the caller checks [`Self::is_out_of_bounds`] and
/// [`Self::is_colliding`] after each, since both terminations are definitive
/// and neither may be skipped.
#[derive(Debug, Clone)]
pub struct FlightState {
    grid: Grid,
    player_row: i32,
    last_movement: Movement,
}

impl Default for FlightState {
    fn default() -> Self {
        Self::new()
    }
}

impl FlightState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            grid: Grid::new(),
            player_row: START_ROW,
            last_movement: Movement::Straight,
        }
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn player_row(&self) -> i32 {
        self.player_row
    }

    #[must_use]
    pub fn last_movement(&self) -> Movement {
        self.last_movement
    }

    /// Recycles the freshly generated column into the window.
    pub fn scroll(&mut self, column: Column) {
        self.grid.recycle(column);
    }

    /// Moves the plane and records the movement.
    ///
    /// The row may leave the grid; that state is reported by
    /// [`Self::is_out_of_bounds`] rather than clamped away.
    pub fn apply_move(&mut self, movement: Movement) {
        self.player_row += movement.row_offset();
        self.last_movement = movement;
    }

    #[must_use]
    pub fn is_out_of_bounds(&self) -> bool {
        self.player_row < 0 || self.player_row >= GRID_HEIGHT as i32
    }

    /// Whether the plane's cell is rock. Only meaningful while in bounds.
    #[must_use]
    pub fn is_colliding(&self) -> bool {
        !self.is_out_of_bounds() && self.grid.is_occupied(PLAYER_COLUMN, self.player_row as usize)
    }

    /// Opens the cavern and re-centers the plane.
    pub fn reset(&mut self) {
        self.grid.clear();
        self.player_row = START_ROW;
        self.last_movement = Movement::Straight;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moves_accumulate_and_record() {
        let mut state = FlightState::new();
        state.apply_move(Movement::Up);
        state.apply_move(Movement::Up);
        state.apply_move(Movement::Down);
        assert_eq!(state.player_row(), START_ROW - 1);
        assert_eq!(state.last_movement(), Movement::Down);
    }

    #[test]
    fn test_out_of_bounds_at_either_edge() {
        let mut state = FlightState::new();
        for _ in 0..START_ROW {
            state.apply_move(Movement::Up);
            assert!(!state.is_out_of_bounds());
        }
        state.apply_move(Movement::Up);
        assert!(state.is_out_of_bounds());

        let mut state = FlightState::new();
        for _ in START_ROW..GRID_HEIGHT as i32 - 1 {
            state.apply_move(Movement::Down);
            assert!(!state.is_out_of_bounds());
        }
        state.apply_move(Movement::Down);
        assert!(state.is_out_of_bounds());
    }

    #[test]
    fn test_collision_against_player_column() {
        let mut state = FlightState::new();
        // Push a solid column all the way to the player column.
        for _ in 0..GRID_HEIGHT + 10 {
            state.scroll(Column::EMPTY);
        }
        assert!(!state.is_colliding());
        for step in 0..GRID_WIDTH_TO_PLAYER {
            state.scroll(Column::SOLID);
            let reached = step == GRID_WIDTH_TO_PLAYER - 1;
            assert_eq!(state.is_colliding(), reached, "step {step}");
        }
    }

    /// Columns a fresh tail column needs to scroll before reaching the plane.
    const GRID_WIDTH_TO_PLAYER: usize = crate::GRID_WIDTH - PLAYER_COLUMN;

    #[test]
    fn test_reset_recenters() {
        let mut state = FlightState::new();
        state.scroll(Column::SOLID);
        state.apply_move(Movement::Down);
        state.reset();
        assert_eq!(state.player_row(), START_ROW);
        assert_eq!(state.last_movement(), Movement::Straight);
        assert!(state.grid().columns().all(|c| c == Column::EMPTY));
    }
}
