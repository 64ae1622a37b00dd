use std::{io, time::Duration};

use crate::{App, event::TuiEvent, event_loop::EventLoop};

/// Drives an [`App`] through the terminal event loop.
///
/// The runtime owns the timing: the application receives exactly one
/// `update` call per tick, `draw` calls when something changed, and raw
/// crossterm events as they arrive.
#[derive(Default, Debug)]
pub struct Runtime {
    events: EventLoop,
}

impl Runtime {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tick rate in ticks per second.
    pub fn set_tick_rate(&mut self, rate: Option<f64>) {
        self.set_tick_interval(rate.map(|rate| Duration::from_secs_f64(1.0 / rate)));
    }

    /// Sets the tick interval; `None` disables ticks.
    pub fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.events.set_tick_interval(interval);
    }

    /// Runs the application until [`App::should_exit`] returns true.
    ///
    /// Calls `app.init()` once before entering the loop so the application
    /// can configure its tick rate.
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick => app.update(&mut self),
                    TuiEvent::Render => terminal.draw(|frame| app.draw(frame)).map(drop)?,
                    TuiEvent::Crossterm(event) => app.handle_event(&mut self, event),
                }
            }
            Ok(())
        })
    }
}
