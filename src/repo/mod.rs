//! The repository view model: parsing porcelain-v2 status output and the
//! branch listing into an in-memory [`model::RepoState`].

pub mod model;
mod parse;
mod runner;

pub use model::{BranchRef, ChangeType, FileEntry, RepoState};
pub use runner::ChildRunner;

use crate::error::AppError;
use tracing::error;

/// Loads a fresh [`RepoState`] by invoking `git status` and `git branch`
/// through a [`ChildRunner`] and parsing their output (§4.4).
pub struct RepoModel {
    runner: ChildRunner,
}

impl RepoModel {
    pub fn new(runner: ChildRunner) -> Self {
        Self { runner }
    }

    pub fn load(&self) -> Result<RepoState, AppError> {
        let raw_status = self.runner.status_porcelain_v2()?;
        let mut state = parse::parse_porcelain_v2(&raw_status)?;

        let branch_listing = self.runner.branch_listing()?;
        state.branch_refs = branch_listing
            .lines()
            .filter_map(parse::parse_branch_line)
            .collect();

        // A freshly initialized repo with no commits yet has no `branch.head`
        // line to parse (§6) — fall back to a head summary, which itself
        // fails (no commits, no HEAD) on such a repo and is swallowed.
        if state.branch_head.is_none() {
            if let Ok(summary) = self.runner.head_summary_fallback() {
                let trimmed = summary.trim();
                if !trimmed.is_empty() {
                    state.branch_head = Some(trimmed.to_string());
                }
            }
        }

        Ok(state)
    }

    pub fn runner(&self) -> &ChildRunner {
        &self.runner
    }

    /// Worker-thread load policy (§7): a parse failure means the porcelain
    /// grammar assumption is broken and the process cannot make further
    /// progress, so it panics after logging. A child-process/I/O failure
    /// (e.g. `git` transiently unavailable) is logged and swallowed —
    /// `None` means "nothing to emit this cycle", not "fatal".
    pub fn load_for_worker(&self) -> Option<RepoState> {
        match self.load() {
            Ok(state) => Some(state),
            Err(AppError::Parse(e)) => {
                error!(error = %e, "porcelain status parse failure, cannot continue");
                panic!("repo status parse failure: {e}");
            }
            Err(e) => {
                error!(error = %e, "repo reload failed, will retry next cycle");
                None
            }
        }
    }
}
