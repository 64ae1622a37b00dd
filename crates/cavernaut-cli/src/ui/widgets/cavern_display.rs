use cavernaut_engine::{FlightState, GRID_HEIGHT, GRID_WIDTH, PLAYER_COLUMN};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::ui::widgets::{Cell, CellDisplay};

#[derive(Debug)]
pub struct CavernDisplay<'a> {
    state: &'a FlightState,
    block: Option<BlockWidget<'a>>,
}

impl<'a> CavernDisplay<'a> {
    pub fn new(state: &'a FlightState) -> Self {
        Self { state, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        u16::try_from(GRID_WIDTH).unwrap() * CellDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(GRID_HEIGHT).unwrap() * CellDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }

    fn cell_at(&self, x: usize, y: usize) -> Cell {
        let plane_row = usize::try_from(self.state.player_row()).ok();
        if x == PLAYER_COLUMN && plane_row == Some(y) {
            Cell::Plane
        } else if self.state.grid().is_occupied(x, y) {
            Cell::Rock
        } else {
            Cell::Air
        }
    }
}

impl Widget for CavernDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &CavernDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints = (0..GRID_WIDTH).map(|_| Constraint::Length(CellDisplay::width()));
        let row_constraints = (0..GRID_HEIGHT).map(|_| Constraint::Length(CellDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout::<GRID_HEIGHT>(&vertical)
            .into_iter()
            .map(|row| row.layout::<GRID_WIDTH>(&horizontal));

        for (y, grid_row) in grid_cells.enumerate() {
            for (x, grid_cell) in grid_row.into_iter().enumerate() {
                CellDisplay::from_cell(self.cell_at(x, y)).render(grid_cell, buf);
            }
        }
    }
}
