//! `gitpane`: a keyboard-driven terminal UI for staging, committing, and
//! pushing on a local version-control working tree. See `SPEC_FULL.md` for
//! the full component design; the module layout below mirrors it directly.

pub mod app;
pub mod config;
pub mod error;
pub mod input;
pub mod input_map;
pub mod jobs;
pub mod logging;
pub mod queue;
pub mod repo;
pub mod state;
pub mod terminal;
pub mod ui;
