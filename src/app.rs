//! Wires the three worker threads (§4.9) to the foreground paint/handle
//! loop (§4.8). [`AppOrchestrator`] drives "draw, consume one event, route
//! it" with plain OS threads and the two queue primitives in
//! [`crate::queue`] instead of an async runtime — see DESIGN.md for why the
//! rendezvous queue is easier to express that way.

use crate::config::Args;
use crate::error::AppError;
use crate::input::Input;
use crate::queue::{LockstepQueue, UnboundedQueue};
use crate::jobs;
use crate::repo::{ChildRunner, RepoModel, RepoState};
use crate::state::{base::BaseState, StateStack};
use crate::terminal::TerminalGuard;
use ratatui::prelude::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::info;

/// Everything the single-consumer loop dispatches: either a decoded key
/// press, or a freshly loaded repository snapshot (§3).
pub enum Event {
    Input(Input),
    RepoState(RepoState),
}

/// Owns the terminal guard, both queues, and the state stack; runs the
/// foreground loop described in §4.8.
pub struct AppOrchestrator {
    terminal_guard: Arc<TerminalGuard>,
    events: Arc<LockstepQueue<Event>>,
    jobs: Arc<UnboundedQueue<jobs::Job>>,
    repo_model: Arc<RepoModel>,
    stack: StateStack,
}

impl AppOrchestrator {
    pub fn new(args: &Args) -> Result<Self, AppError> {
        let terminal_guard = Arc::new(TerminalGuard::new()?);
        let runner = ChildRunner::new(&args.repo);
        let repo_model = Arc::new(RepoModel::new(runner));

        let events: Arc<LockstepQueue<Event>> = Arc::new(LockstepQueue::new());
        let jobs: Arc<UnboundedQueue<jobs::Job>> = Arc::new(UnboundedQueue::new());

        let initial_repo_state = repo_model.load().ok();
        let base = BaseState::new(jobs.clone(), terminal_guard.clone(), initial_repo_state)
            .with_repo_model(repo_model.clone());

        Ok(Self {
            terminal_guard,
            events,
            jobs,
            repo_model,
            stack: StateStack::new(base),
        })
    }

    /// Spawns the three workers (§4.9) and runs the foreground loop (§4.8)
    /// until a handler returns [`HandleResult::Exit`].
    pub fn run(mut self, refresh_interval: Duration) -> Result<(), AppError> {
        self.spawn_input_worker();
        self.spawn_refresh_worker(refresh_interval);
        self.spawn_job_worker();

        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        let events = self.events.clone();

        loop {
            terminal.draw(|frame| {
                let area = frame.size();
                self.stack.paint(area, frame.buffer_mut());
            })?;

            let should_exit = events.peek_with(|event| self.stack.dispatch(event));
            events.advance();

            if should_exit {
                info!("exit requested, tearing down");
                return Ok(());
            }
        }
    }

    fn spawn_input_worker(&self) {
        let events = self.events.clone();
        thread::spawn(move || loop {
            match crossterm::event::read() {
                Ok(ct_event) => {
                    if let Some(input) = Input::from_terminal_event(&ct_event) {
                        events.put(Event::Input(input));
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "terminal read failed");
                    panic!("terminal input read failed: {e}");
                }
            }
        });
    }

    fn spawn_refresh_worker(&self, interval: Duration) {
        let events = self.events.clone();
        let repo_model = self.repo_model.clone();
        thread::spawn(move || loop {
            thread::sleep(interval);
            if let Some(state) = repo_model.load_for_worker() {
                events.put(Event::RepoState(state));
            }
        });
    }

    fn spawn_job_worker(&self) {
        let jobs = self.jobs.clone();
        let events = self.events.clone();
        let repo_model = self.repo_model.clone();
        thread::spawn(move || jobs::run_worker(jobs, events, repo_model));
    }
}

