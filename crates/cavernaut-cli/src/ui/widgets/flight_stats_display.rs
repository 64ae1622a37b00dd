use std::{iter, time::Duration};

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

/// Snapshot of the numbers shown next to the cavern.
#[derive(Debug, Clone)]
pub struct FlightStats {
    pub mode: &'static str,
    pub elapsed: Duration,
    pub best_time: Duration,
    pub score: f64,
    pub flights: u64,
    pub corpus_samples: usize,
}

pub struct FlightStatsDisplay<'a> {
    stats: &'a FlightStats,
    block: Option<BlockWidget<'a>>,
}

impl<'a> FlightStatsDisplay<'a> {
    pub fn new(stats: &'a FlightStats) -> Self {
        Self { stats, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        20 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(ROWS.len()).unwrap() + super::block_vertical_margin(self.block.as_ref())
    }
}

fn format_duration(dur: Duration) -> String {
    format!(
        "{:0}:{:0>2}.{:0>2}",
        dur.as_secs() / 60,
        dur.as_secs() % 60,
        dur.subsec_millis() / 10
    )
}

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(&'static dyn Fn(&FlightStats) -> String),
    LabelValue(&'static str, &'static dyn Fn(&FlightStats) -> String),
}

const ROWS: &[Row] = &[
    Row::FullLabel("TIME:"),
    Row::FullValue(&|stats| format_duration(stats.elapsed)),
    Row::FullLabel("BEST:"),
    Row::FullValue(&|stats| format_duration(stats.best_time)),
    Row::Empty,
    Row::LabelValue("SCORE:", &|stats| format!("{:.1}", stats.score)),
    Row::LabelValue("FLIGHTS:", &|stats| stats.flights.to_string()),
    Row::LabelValue("CORPUS:", &|stats| stats.corpus_samples.to_string()),
    Row::Empty,
    Row::LabelValue("MODE:", &|stats| stats.mode.to_string()),
];

impl Widget for FlightStatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas[..].iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(self.stats), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.stats), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
