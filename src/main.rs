//! `gitpane` binary entry point: parses CLI flags, sets up logging, and
//! hands off to [`gitpane::app::AppOrchestrator`].

use clap::Parser;
use gitpane::app::AppOrchestrator;
use gitpane::config::Args;
use gitpane::logging;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    let log_dir = std::env::temp_dir().join("gitpane");
    let _log_guard = match logging::init(&log_dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: failed to initialize logging in {}: {e}", log_dir.display());
            None
        }
    };
    logging::install_panic_hook();

    tracing::info!(repo = %args.repo.display(), "starting gitpane");

    let orchestrator = match AppOrchestrator::new(&args) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("failed to start gitpane: {e}");
            return ExitCode::FAILURE;
        }
    };

    match orchestrator.run(args.refresh_interval()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("gitpane exited with an error: {e}");
            ExitCode::FAILURE
        }
    }
}
