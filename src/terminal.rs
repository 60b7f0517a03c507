//! Terminal setup and teardown.

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    terminal::{self, ClearType},
    ExecutableCommand,
};
use std::io::{self, Stdout, Write};

/// RAII guard for the raw terminal mode and the alternate screen.
///
/// Acquiring the guard switches the terminal over; dropping it restores the
/// previous state on every exit path, including `?`-propagated errors and
/// panic unwinds.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn new(stdout: &mut Stdout) -> Result<Self> {
        terminal::enable_raw_mode().context("failed to enable raw terminal mode")?;
        stdout.execute(terminal::EnterAlternateScreen)?;
        stdout.execute(terminal::Clear(ClearType::All))?;
        stdout.flush()?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = stdout.execute(cursor::Show);
        let _ = stdout.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = stdout.flush();
    }
}

/// Query the terminal size in (cols, rows).
///
/// When the direct query fails or reports a zero width, fall back to pushing
/// the cursor toward the bottom-right corner and asking where it actually
/// ended up. Failure here is fatal: the editor cannot lay out a frame
/// without real dimensions.
pub fn window_size() -> Result<(u16, u16)> {
    if let Ok((cols, rows)) = terminal::size() {
        if cols > 0 {
            return Ok((cols, rows));
        }
    }

    let mut stdout = io::stdout();
    stdout.execute(cursor::MoveRight(999))?;
    stdout.execute(cursor::MoveDown(999))?;
    let (col, row) = cursor::position().context("unable to determine window size")?;
    Ok((col + 1, row + 1))
}
