use std::collections::VecDeque;

/// Number of visible cavern columns.
pub const GRID_WIDTH: usize = 30;
/// Number of cells per column.
pub const GRID_HEIGHT: usize = 20;
/// Fixed column occupied by the plane. Columns behind it are never sampled.
pub const PLAYER_COLUMN: usize = 15;

/// One cavern column as an occupancy bitmask.
///
/// Bit `y` set means the cell at row `y` is rock. Row 0 is the top of the
/// screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column(u32);

impl Column {
    pub const EMPTY: Self = Self(0);
    pub const SOLID: Self = Self((1 << GRID_HEIGHT) - 1);

    /// A solid column with the rows `top..bottom` cleared.
    #[must_use]
    pub fn carved(top: usize, bottom: usize) -> Self {
        debug_assert!(top < bottom && bottom <= GRID_HEIGHT);
        let open = ((1u32 << bottom) - 1) & !((1u32 << top) - 1);
        Self(Self::SOLID.0 & !open)
    }

    #[must_use]
    pub fn is_occupied(self, row: usize) -> bool {
        debug_assert!(row < GRID_HEIGHT);
        self.0 & (1 << row) != 0
    }

    /// Occupancy of all rows, top to bottom.
    pub fn occupancy(self) -> impl Iterator<Item = bool> {
        (0..GRID_HEIGHT).map(move |row| self.is_occupied(row))
    }
}

/// Rolling window of the visible cavern.
///
/// Holds exactly [`GRID_WIDTH`] columns at all times. One column is recycled
/// per tick: the oldest (index 0) is dropped and the freshly generated column
/// appears at index `GRID_WIDTH - 1`.
#[derive(Debug, Clone)]
pub struct Grid {
    columns: VecDeque<Column>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// Creates a fully open grid.
    #[must_use]
    pub fn new() -> Self {
        Self {
            columns: VecDeque::from(vec![Column::EMPTY; GRID_WIDTH]),
        }
    }

    /// Drops the front column and appends `column` at the back.
    pub fn recycle(&mut self, column: Column) {
        self.columns.pop_front();
        self.columns.push_back(column);
        debug_assert_eq!(self.columns.len(), GRID_WIDTH);
    }

    #[must_use]
    pub fn column(&self, x: usize) -> Column {
        self.columns[x]
    }

    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.columns[x].is_occupied(y)
    }

    /// Columns in visible order, oldest first.
    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.columns.iter().copied()
    }

    /// Opens every cell again, keeping the window size.
    pub fn clear(&mut self) {
        self.columns.iter_mut().for_each(|c| *c = Column::EMPTY);
    }
}
