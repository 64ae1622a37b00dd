use cavernaut_engine::{FlightState, GRID_HEIGHT, GRID_WIDTH, PLAYER_COLUMN};

/// Columns strictly ahead of the plane; the only terrain the policy sees.
pub const HORIZON_COLUMNS: usize = GRID_WIDTH - PLAYER_COLUMN - 1;

/// Fixed length of every extracted feature vector.
pub const FEATURE_LEN: usize = HORIZON_COLUMNS * GRID_HEIGHT + 4;

/// Index of the terminal flag within a feature vector.
pub const TERMINAL_FLAG_INDEX: usize = FEATURE_LEN - 2;

/// Index of the good-flight flag within a feature vector.
pub const GOOD_FLAG_INDEX: usize = FEATURE_LEN - 1;

/// Projects the flight state into the policy's input vector.
///
/// Layout, in order: the horizon columns flattened column-major (column index
/// ascending, then row index ascending), then the last movement's raw row
/// offset, the player row normalized to `[0, 1)`, the terminal flag, and the
/// good-flight flag. This exact layout is the policy's input contract;
/// changing it invalidates any previously trained network.
#[must_use]
pub fn extract_features(state: &FlightState, terminal: bool, good: bool) -> Vec<f64> {
    let mut features = Vec::with_capacity(FEATURE_LEN);
    for x in PLAYER_COLUMN + 1..GRID_WIDTH {
        let column = state.grid().column(x);
        features.extend(column.occupancy().map(|occupied| f64::from(u8::from(occupied))));
    }
    features.push(f64::from(state.last_movement().row_offset()));
    #[expect(clippy::cast_precision_loss)]
    features.push(f64::from(state.player_row()) / GRID_HEIGHT as f64);
    features.push(if terminal { 1.0 } else { 0.0 });
    features.push(if good { 1.0 } else { 0.0 });
    debug_assert_eq!(features.len(), FEATURE_LEN);
    features
}

#[cfg(test)]
mod tests {
    use cavernaut_engine::{Column, Movement};

    use super::*;

    #[test]
    fn test_vector_has_fixed_length() {
        let state = FlightState::new();
        assert_eq!(extract_features(&state, false, false).len(), FEATURE_LEN);
        assert_eq!(FEATURE_LEN, 284);
    }

    #[test]
    fn test_trailing_scalars() {
        let mut state = FlightState::new();
        state.apply_move(Movement::Up);

        let features = extract_features(&state, true, false);
        assert_eq!(features[FEATURE_LEN - 4], -1.0);
        assert_eq!(features[FEATURE_LEN - 3], 10.0 / 20.0);
        assert_eq!(features[TERMINAL_FLAG_INDEX], 1.0);
        assert_eq!(features[GOOD_FLAG_INDEX], 0.0);

        let features = extract_features(&state, false, true);
        assert_eq!(features[TERMINAL_FLAG_INDEX], 0.0);
        assert_eq!(features[GOOD_FLAG_INDEX], 1.0);
    }

    #[test]
    fn test_player_row_stays_normalized() {
        let state = FlightState::new();
        let features = extract_features(&state, false, false);
        let row = features[FEATURE_LEN - 3];
        assert!((0.0..1.0).contains(&row));
    }

    #[test]
    fn test_horizon_is_column_major_from_player_column() {
        let mut state = FlightState::new();
        // Freshest column lands at x = GRID_WIDTH - 1, the last horizon slot.
        state.scroll(Column::carved(5, 9));

        let features = extract_features(&state, false, false);
        let tail_column = &features[(HORIZON_COLUMNS - 1) * GRID_HEIGHT..][..GRID_HEIGHT];
        for (row, &value) in tail_column.iter().enumerate() {
            let expected = if (5..9).contains(&row) { 0.0 } else { 1.0 };
            assert_eq!(value, expected, "row {row}");
        }
        // Every other horizon column is still open.
        assert!(
            features[..(HORIZON_COLUMNS - 1) * GRID_HEIGHT]
                .iter()
                .all(|&v| v == 0.0)
        );
    }
}
