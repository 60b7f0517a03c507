//! Editor: the context object owning the document, the cursor/view state,
//! and the transient status message. All operations take `&mut self`; there
//! is no global state.

mod input;
mod render;
mod search;

use crate::document::Document;
use anyhow::Result;
use crossterm::event::KeyEvent;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Consecutive Ctrl-Q presses required to abandon unsaved changes.
pub const QUIT_TIMES: u8 = 3;

/// How long a status message stays visible.
pub const MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Short-lived message shown in the bottom bar.
pub struct StatusMsg {
    pub text: String,
    pub time: Instant,
}

/// Observer notified on every prompt keystroke, including the terminating
/// Enter or Escape. The incremental search is the interesting implementor;
/// plain closures satisfy it too.
pub trait PromptObserver {
    fn notify(&mut self, editor: &mut Editor, input: &str, key: &KeyEvent);
}

impl<F> PromptObserver for F
where
    F: FnMut(&mut Editor, &str, &KeyEvent),
{
    fn notify(&mut self, editor: &mut Editor, input: &str, key: &KeyEvent) {
        self(editor, input, key);
    }
}

pub struct Editor {
    pub doc: Document,

    /// Cursor position: `cx` is a char index into the current row (may equal
    /// the row length), `cy` may equal the row count (virtual row past EOF).
    pub cx: usize,
    pub cy: usize,
    /// Rendered cursor column, derived from `cx` on every scroll pass.
    pub rx: usize,

    /// Viewport offsets into the document, in rows / rendered columns.
    pub row_off: usize,
    pub col_off: usize,

    /// Usable text area; the status and message bars are already excluded.
    pub screen_rows: usize,
    pub screen_cols: usize,

    status: Option<StatusMsg>,
    /// Remaining quit presses before a dirty document is abandoned.
    quit_times: u8,
}

impl Editor {
    /// Build the editor for a `cols` x `rows` terminal, optionally loading a
    /// file. Two rows are reserved for the status and message bars.
    pub fn new(path: Option<PathBuf>, cols: u16, rows: u16) -> Result<Self> {
        let doc = match path {
            Some(p) => Document::open(p)?,
            None => Document::new(),
        };
        Ok(Self {
            doc,
            cx: 0,
            cy: 0,
            rx: 0,
            row_off: 0,
            col_off: 0,
            screen_rows: (rows as usize).saturating_sub(2),
            screen_cols: cols as usize,
            status: None,
            quit_times: QUIT_TIMES,
        })
    }

    /// Terminal was resized; the next frame uses the new geometry.
    pub fn on_resize(&mut self, cols: u16, rows: u16) {
        self.screen_rows = (rows as usize).saturating_sub(2);
        self.screen_cols = cols as usize;
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMsg {
            text: text.into(),
            time: Instant::now(),
        });
    }

    /// The status message, if it is still within its display window.
    pub fn current_status(&self) -> Option<&str> {
        self.status
            .as_ref()
            .filter(|m| m.time.elapsed() < MESSAGE_TIMEOUT)
            .map(|m| m.text.as_str())
    }
}
