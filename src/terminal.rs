//! Raw-mode/alternate-screen ownership. Besides the usual RAII
//! enter-on-construct/restore-on-drop shape, this guard also exposes an
//! explicit `yield_for`/re-acquire pair for the commit handler, which hands
//! the terminal to `$EDITOR` mid-run.

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io;

/// Enters raw mode + alternate screen on construction, restores cooked mode
/// on drop. `std::panic::set_hook` (installed in [`crate::logging`]) calls
/// [`TerminalGuard::best_effort_restore`] before the default hook runs, so a
/// panic on any thread still leaves the terminal usable.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(
            io::stdout(),
            EnterAlternateScreen,
            EnableMouseCapture,
            crossterm::terminal::Clear(ClearType::All)
        )?;
        Ok(Self)
    }

    /// Leaves raw mode and the alternate screen, runs `f` (typically an
    /// inherited-stdio child process), then re-enters both. Used by the
    /// commit handler (§4.6), which needs the real terminal for `$EDITOR`.
    pub fn yield_for<T>(&self, f: impl FnOnce() -> T) -> io::Result<T> {
        execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
        disable_raw_mode()?;

        let result = f();

        enable_raw_mode()?;
        execute!(
            io::stdout(),
            EnterAlternateScreen,
            EnableMouseCapture,
            crossterm::terminal::Clear(ClearType::All)
        )?;

        Ok(result)
    }

    /// Called from the panic hook. Ignores errors: if the terminal is
    /// already broken there is nothing more useful to do.
    pub fn best_effort_restore() {
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        Self::best_effort_restore();
    }
}
