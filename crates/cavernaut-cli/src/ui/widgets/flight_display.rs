use cavernaut_engine::{FlightSession, SessionState};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::widgets::{CavernDisplay, FlightStats, FlightStatsDisplay, color, style};

pub struct FlightDisplay<'a> {
    session: &'a FlightSession,
    stats: &'a FlightStats,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> FlightDisplay<'a> {
    pub fn new(session: &'a FlightSession, stats: &'a FlightStats) -> Self {
        Self {
            session,
            stats,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }
}

impl Widget for FlightDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &FlightDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let style = style::DEFAULT;
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        let border_style = match self.session.session_state() {
            SessionState::Flying => color::WHITE,
            SessionState::Ended => color::RED,
        };

        let cavern = CavernDisplay::new(self.session.state())
            .block(Block::bordered().border_style(border_style).style(style));
        let flight_stats = FlightStatsDisplay::new(self.stats).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style::DEFAULT),
        );

        let [cavern_column, stats_column] = Layout::horizontal([
            Constraint::Length(cavern.width()),
            Constraint::Length(flight_stats.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [cavern_area] =
            Layout::vertical([Constraint::Length(cavern.height())]).areas(cavern_column);
        let [stats_area] =
            Layout::vertical([Constraint::Length(flight_stats.height())]).areas(stats_column);

        let cavern_width = cavern.width();
        cavern.render(cavern_area, buf);
        flight_stats.render(stats_area, buf);

        if self.session.session_state() == SessionState::Ended {
            let text = self.session.crash_cause().map_or_else(
                || "CRASHED!!".to_owned(),
                |cause| format!("CRASHED: {cause}"),
            );
            let style = Style::new().fg(color::WHITE).bg(color::RED);
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area =
                cavern_area.centered(Constraint::Length(cavern_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
