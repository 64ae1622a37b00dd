use crossterm::event::Event;
use ratatui::Frame;

use crate::Runtime;

/// A TUI application runnable by [`Runtime::run`].
pub trait App {
    /// One-time setup; the place to configure the tick rate.
    fn init(&mut self, runtime: &mut Runtime);

    /// When this returns true the runtime tears down and returns.
    fn should_exit(&self) -> bool;

    /// Reacts to terminal input (keys, mouse, resize).
    fn handle_event(&mut self, runtime: &mut Runtime, event: Event);

    /// Paints the current state.
    fn draw(&self, frame: &mut Frame);

    /// Advances the simulation by one tick.
    fn update(&mut self, runtime: &mut Runtime);
}
