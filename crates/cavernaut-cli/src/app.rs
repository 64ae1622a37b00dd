use cavernaut_autopilot::{FlightController, Policy};
use cavernaut_engine::Movement;
use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};
use ratatui_runtime::{App, Runtime};

use crate::ui::widgets::{FlightDisplay, FlightStats, KeyBinding, KeyBindingDisplay};

/// One tick per 100 ms, the reference simulation rate.
const TICK_RATE: f64 = 10.0;

const MANUAL_BINDINGS: &[KeyBinding] = &[("↑/↓", "Steer"), ("q", "Quit")];
const AUTO_BINDINGS: &[KeyBinding] = &[("q", "Quit")];
const ENDED_BINDINGS: &[KeyBinding] = &[("s", "Fly again"), ("q", "Quit")];

pub struct FlightApp<P> {
    controller: FlightController<P>,
    is_exiting: bool,
}

impl<P: Policy> FlightApp<P> {
    pub fn new(controller: FlightController<P>) -> Self {
        Self {
            controller,
            is_exiting: false,
        }
    }

    pub fn into_controller(self) -> FlightController<P> {
        self.controller
    }

    fn stats(&self) -> FlightStats {
        let session = self.controller.session();
        FlightStats {
            mode: if self.controller.is_autopilot() {
                "autopilot"
            } else {
                "manual"
            },
            elapsed: session.elapsed(),
            best_time: self.controller.best_time(),
            score: session.quality_score(),
            flights: self.controller.flights(),
            corpus_samples: self.controller.retained().len(),
        }
    }

    fn bindings(&self) -> &'static [KeyBinding<'static>] {
        if self.controller.session().session_state().is_ended() {
            ENDED_BINDINGS
        } else if self.controller.is_autopilot() {
            AUTO_BINDINGS
        } else {
            MANUAL_BINDINGS
        }
    }
}

impl<P: Policy> App for FlightApp<P> {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(Some(TICK_RATE));
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: Event) {
        let is_ended = self.controller.session().session_state().is_ended();
        if let Some(event) = event.as_key_event() {
            match event.code {
                KeyCode::Up => self.controller.steer_input(Movement::Up),
                KeyCode::Down => self.controller.steer_input(Movement::Down),
                KeyCode::Char('s') if is_ended => self.controller.reset(),
                KeyCode::Char('q') => self.is_exiting = true,
                _ => {}
            }
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let [flight_area, bindings_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());

        let stats = self.stats();
        frame.render_widget(
            FlightDisplay::new(self.controller.session(), &stats),
            flight_area,
        );
        frame.render_widget(KeyBindingDisplay::new(self.bindings()), bindings_area);
    }

    fn update(&mut self, _runtime: &mut Runtime) {
        self.controller.tick();
    }
}
