//! Background job queue and its worker thread (§4.9). Jobs are plain data
//! enqueued onto an [`UnboundedQueue`] and drained by one dedicated OS
//! thread — there is no generic "spawn a future, run a callback" machinery
//! because every job this crate has is a single synchronous `git`
//! invocation.

use crate::app::Event;
use crate::queue::{LockstepQueue, UnboundedQueue};
use crate::repo::RepoModel;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

/// Work handed from a foreground handler to the job worker thread.
#[derive(Debug, Clone)]
pub enum Job {
    Stage(Vec<PathBuf>),
    Unstage(Vec<PathBuf>),
    Push { remote: String, branch: String },
    Refresh,
}

/// Drains `jobs`, dispatching each to `repo_model`'s runner, then reloads
/// and emits the fresh `RepoState` on `events` so the UI converges. Runs
/// until the process exits; there is no shutdown signal (§5).
pub fn run_worker(
    jobs: Arc<UnboundedQueue<Job>>,
    events: Arc<LockstepQueue<Event>>,
    repo_model: Arc<RepoModel>,
) {
    loop {
        let job = jobs.take();
        let span = tracing::info_span!("job", kind = job_kind(&job));
        let _enter = span.enter();

        match &job {
            Job::Stage(paths) => {
                if let Err(e) = repo_model.runner().stage(paths) {
                    warn!(error = %e, "stage failed");
                }
            }
            Job::Unstage(paths) => {
                if let Err(e) = repo_model.runner().unstage(paths) {
                    warn!(error = %e, "unstage failed");
                }
            }
            Job::Push { remote, branch } => {
                if let Err(e) = repo_model.runner().push(remote, branch) {
                    warn!(error = %e, "push failed");
                }
            }
            Job::Refresh => {}
        }

        if let Some(state) = repo_model.load_for_worker() {
            events.put(Event::RepoState(state));
        }
    }
}

fn job_kind(job: &Job) -> &'static str {
    match job {
        Job::Stage(_) => "stage",
        Job::Unstage(_) => "unstage",
        Job::Push { .. } => "push",
        Job::Refresh => "refresh",
    }
}
