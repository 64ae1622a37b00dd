use serde::{Deserialize, Serialize};

/// Vertical steering input for the plane.
///
/// The class-index and one-hot mappings defined here are the single source of
/// truth shared by feature labeling, policy output decoding, and training
/// targets. Index order is up / straight / down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Movement {
    Up,
    #[default]
    Straight,
    Down,
}

impl Movement {
    pub const LEN: usize = 3;
    pub const ALL: [Self; Self::LEN] = [Self::Up, Self::Straight, Self::Down];

    /// Row delta applied to the player: -1 (up), 0, or +1 (down).
    #[must_use]
    pub fn row_offset(self) -> i32 {
        match self {
            Self::Up => -1,
            Self::Straight => 0,
            Self::Down => 1,
        }
    }

    #[must_use]
    pub fn from_row_offset(offset: i32) -> Option<Self> {
        match offset {
            -1 => Some(Self::Up),
            0 => Some(Self::Straight),
            1 => Some(Self::Down),
            _ => None,
        }
    }

    /// Output-class index: 0 = up, 1 = straight, 2 = down.
    #[must_use]
    pub fn class_index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Straight => 1,
            Self::Down => 2,
        }
    }

    /// Inverse of [`Self::class_index`].
    ///
    /// Out-of-range indexes collapse to the last class, matching the
    /// cumulative-sampling fallback used during movement selection.
    #[must_use]
    pub fn from_class_index(index: usize) -> Self {
        match index {
            0 => Self::Up,
            1 => Self::Straight,
            _ => Self::Down,
        }
    }

    #[must_use]
    pub fn to_one_hot(self) -> [f64; Self::LEN] {
        let mut encoded = [0.0; Self::LEN];
        encoded[self.class_index()] = 1.0;
        encoded
    }

    /// Decodes a one-hot (or soft) class vector by taking the strongest entry.
    #[must_use]
    pub fn from_one_hot(encoded: &[f64; Self::LEN]) -> Self {
        let index = encoded
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map_or(Self::LEN - 1, |(index, _)| index);
        Self::from_class_index(index)
    }
}
