//! File-backed structured logging — stdout/stderr are owned by the
//! alternate screen, so `tracing` must never write there while the TUI is
//! running.

use crate::terminal::TerminalGuard;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initializes a file-backed `tracing` subscriber. The returned
/// [`WorkerGuard`] must be held for the life of the process — dropping it
/// flushes and stops the background writer thread.
pub fn init(log_dir: &Path) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "gitpane.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    Ok(guard)
}

/// Installs a panic hook that best-effort restores the terminal before
/// running the default hook, so a panic on any thread (not just main)
/// leaves the terminal in a usable state (§7).
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        TerminalGuard::best_effort_restore();
        default_hook(info);
    }));
}
