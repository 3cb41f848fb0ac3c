//! Polymorphic state stack: each layer paints itself, then gets first
//! refusal on handling an event, deferring downward with [`HandleResult::Pass`].
//! A blocking single-consumer loop drives it instead of an async one.

pub mod base;
pub mod modal;

pub use base::BaseState;
pub use modal::InputModalState;

use ratatui::prelude::{Buffer, Rect};

/// Routing code returned by [`UiStateTrait::handle`].
pub enum HandleResult {
    /// Terminate the foreground loop.
    Exit,
    /// Defer to the state below this one on the stack.
    Pass,
    /// Pop this state off the stack (never valid for the bottom state).
    Pop,
    /// Push a new state on top of the stack.
    Push(Box<dyn UiStateTrait>),
    /// Event was consumed; do not dispatch further and do not repaint twice
    /// this tick.
    Stop,
}

/// One layer of the UI. Named `UiStateTrait` (rather than `State`) to avoid
/// clashing with [`crate::ui::UiState`], the cursor/selection struct it owns.
/// Each implementor owns whatever collaborators (job queue handle, repo
/// model, terminal guard) its handlers need — there is no separate per-call
/// context type; `handle` takes only `&mut self` plus the event.
pub trait UiStateTrait {
    fn paint(&self, area: Rect, buf: &mut Buffer);

    fn handle(&mut self, event: &crate::app::Event) -> HandleResult;

    /// Runs when this state is popped. Default no-op; overridden by states
    /// holding resources that need explicit teardown.
    fn deinit(&mut self) {}
}

/// Ordered stack of states, bottom (`BaseState`) first.
pub struct StateStack {
    layers: Vec<Box<dyn UiStateTrait>>,
}

impl StateStack {
    pub fn new(base: BaseState) -> Self {
        Self {
            layers: vec![Box::new(base)],
        }
    }

    pub fn paint(&self, area: Rect, buf: &mut Buffer) {
        for layer in &self.layers {
            layer.paint(area, buf);
        }
    }

    /// Dispatches `event` top-down, applying the first non-`Pass` result.
    /// Returns `true` if the foreground loop should exit.
    pub fn dispatch(&mut self, event: &crate::app::Event) -> bool {
        let top = self.layers.len() - 1;
        for i in (0..=top).rev() {
            match self.layers[i].handle(event) {
                HandleResult::Pass => continue,
                HandleResult::Stop => return false,
                HandleResult::Exit => return true,
                HandleResult::Push(state) => {
                    self.layers.push(state);
                    return false;
                }
                HandleResult::Pop => {
                    // The bottom (`BaseState`) layer is never popped: its
                    // `handle` never returns `Pop`, so this is only reached
                    // for i > 0.
                    let mut popped = self.layers.remove(i);
                    popped.deinit();
                    return false;
                }
            }
        }
        false
    }
}
