//! CLI surface for the single binary entry point (§6, §8). No file-based
//! configuration — the Non-goals in §1 exclude persisted state, so there is
//! nothing for this module to read besides flags and built-in defaults.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "gitpane", version, about = "Keyboard-driven terminal UI for staging, committing and pushing")]
pub struct Args {
    /// Working tree to operate on.
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,

    /// Seconds between background repository refreshes.
    #[arg(long, default_value_t = 5)]
    pub refresh_interval_secs: u64,
}

impl Args {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}
