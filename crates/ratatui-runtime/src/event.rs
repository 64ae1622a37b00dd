use crossterm::event::Event as CrosstermEvent;

/// Events delivered to an [`crate::App`] by the runtime.
#[derive(Debug, Clone, derive_more::IsVariant, derive_more::From)]
pub(super) enum TuiEvent {
    /// Simulation update timing, fired at the configured tick interval.
    Tick,
    /// Screen render timing, fired after state changed.
    Render,
    /// Terminal input such as keys, mouse, and resize.
    Crossterm(CrosstermEvent),
}
