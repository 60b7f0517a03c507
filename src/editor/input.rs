//! Input handling: one key per iteration of the main loop, mapped onto
//! document and view operations.

use super::{Editor, PromptObserver, QUIT_TIMES};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::fs;
use std::io;
use std::path::PathBuf;

impl Editor {
    /// Dispatch a single key. Returns `Ok(true)` when the editor should
    /// quit.
    pub fn process_key(&mut self, key: KeyEvent) -> Result<bool> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match (key.code, ctrl) {
            (KeyCode::Char('q'), true) => {
                if self.doc.dirty {
                    self.quit_times = self.quit_times.saturating_sub(1);
                    if self.quit_times > 0 {
                        self.set_status(format!(
                            "WARNING! File has unsaved changes. \
                             Press Ctrl-Q {} more times to quit.",
                            self.quit_times
                        ));
                        return Ok(false);
                    }
                }
                return Ok(true);
            }
            (KeyCode::Char('s'), true) => self.save()?,
            (KeyCode::Char('f'), true) => self.find()?,

            (KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right, _) => {
                self.move_cursor(key.code);
            }
            (KeyCode::Home, true) => {
                self.cy = 0;
                self.cx = 0;
            }
            (KeyCode::End, true) => {
                // jump to the virtual row past the end of the document
                self.cy = self.doc.num_rows();
                self.cx = 0;
            }
            (KeyCode::Home, false) => self.cx = 0,
            (KeyCode::End, false) => {
                if self.cy < self.doc.num_rows() {
                    self.cx = self.doc.rows[self.cy].len();
                }
            }
            (KeyCode::PageUp | KeyCode::PageDown, _) => {
                // move the cursor to the viewport edge, then a full screen
                if key.code == KeyCode::PageUp {
                    self.cy = self.row_off;
                } else {
                    self.cy = (self.row_off + self.screen_rows)
                        .saturating_sub(1)
                        .min(self.doc.num_rows());
                }
                let step = if key.code == KeyCode::PageUp {
                    KeyCode::Up
                } else {
                    KeyCode::Down
                };
                for _ in 0..self.screen_rows {
                    self.move_cursor(step);
                }
            }

            (KeyCode::Enter, _) => self.insert_newline(),
            (KeyCode::Backspace, _) | (KeyCode::Char('h'), true) => self.delete_back(),
            (KeyCode::Delete, _) => {
                self.move_cursor(KeyCode::Right);
                self.delete_back();
            }
            (KeyCode::Tab, false) => self.insert_char('\t'),
            (KeyCode::Char(c), false) if !key.modifiers.contains(KeyModifiers::ALT) => {
                self.insert_char(c);
            }

            // bare Escape, Ctrl-L, and anything unbound are silently ignored
            _ => {}
        }

        self.quit_times = QUIT_TIMES;
        Ok(false)
    }

    /// Cursor movement with kilo's boundary rules: left at column 0 wraps to
    /// the end of the previous row, right at end-of-row wraps to the start
    /// of the next, and vertical movement may rest on the virtual row one
    /// past the end of the document.
    pub fn move_cursor(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left => {
                if self.cx > 0 {
                    self.cx -= 1;
                } else if self.cy > 0 {
                    self.cy -= 1;
                    self.cx = self.doc.rows[self.cy].len();
                }
            }
            KeyCode::Right => {
                if let Some(row) = self.doc.rows.get(self.cy) {
                    if self.cx < row.len() {
                        self.cx += 1;
                    } else {
                        self.cy += 1;
                        self.cx = 0;
                    }
                }
            }
            KeyCode::Up => {
                if self.cy > 0 {
                    self.cy -= 1;
                }
            }
            KeyCode::Down => {
                if self.cy < self.doc.num_rows() {
                    self.cy += 1;
                }
            }
            _ => {}
        }

        // after a vertical move the column may exceed the new row
        let len = self.doc.rows.get(self.cy).map_or(0, crate::row::Row::len);
        self.cx = self.cx.min(len);
    }

    /// Insert a printable char at the cursor. On the virtual past-EOF row a
    /// new empty row is created first.
    pub fn insert_char(&mut self, c: char) {
        if self.cy == self.doc.num_rows() {
            self.doc.insert_row(self.cy, "");
        }
        self.doc.insert_char(self.cy, self.cx, c);
        self.cx += 1;
    }

    /// Enter: split the row at the cursor (or insert an empty row above when
    /// the cursor is at column 0) and land at the start of the new row.
    pub fn insert_newline(&mut self) {
        if self.cx == 0 {
            self.doc.insert_row(self.cy, "");
        } else {
            self.doc.split_row(self.cy, self.cx);
        }
        self.cy += 1;
        self.cx = 0;
    }

    /// Backspace: remove the char before the cursor, or merge this row into
    /// the previous one at column 0. A no-op at the very start of the
    /// document and on the virtual past-EOF row.
    pub fn delete_back(&mut self) {
        if self.cy == self.doc.num_rows() {
            return;
        }
        if self.cx == 0 && self.cy == 0 {
            return;
        }
        if self.cx > 0 {
            self.doc.delete_char(self.cy, self.cx);
            self.cx -= 1;
        } else {
            self.cx = self.doc.merge_row_up(self.cy);
            self.cy -= 1;
        }
    }

    /// Save the document, prompting for a filename if it has none. I/O
    /// failures are reported on the message bar and leave the dirty flag
    /// set; editing continues.
    pub fn save(&mut self) -> Result<()> {
        if self.doc.filename.is_none() {
            match self.prompt("Save as (ESC to cancel): ", &mut no_observer)? {
                Some(name) => {
                    self.doc.filename = Some(PathBuf::from(name));
                    self.doc.select_syntax();
                }
                None => {
                    self.set_status("Save aborted");
                    return Ok(());
                }
            }
        }
        let Some(path) = self.doc.filename.clone() else {
            return Ok(());
        };

        let buf = self.doc.to_save_buffer();
        match fs::write(&path, &buf) {
            Ok(()) => {
                self.doc.dirty = false;
                self.set_status(format!("{} bytes written to disk", buf.len()));
            }
            Err(e) => self.set_status(format!("Can't save! I/O error: {e}")),
        }
        Ok(())
    }

    /// Run a bottom-bar prompt, notifying `observer` on every keystroke
    /// (including the terminating Enter/Escape). Escape cancels and returns
    /// `None`; Enter accepts non-empty input.
    pub fn prompt(
        &mut self,
        label: &str,
        observer: &mut dyn PromptObserver,
    ) -> Result<Option<String>> {
        let mut stdout = io::stdout();
        let mut input = String::new();
        loop {
            self.set_status(format!("{label}{input}"));
            self.refresh_screen(&mut stdout)?;

            let key = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => key,
                Event::Resize(w, h) => {
                    self.on_resize(w, h);
                    continue;
                }
                _ => continue,
            };

            match key.code {
                KeyCode::Esc => {
                    self.set_status("");
                    observer.notify(self, &input, &key);
                    return Ok(None);
                }
                KeyCode::Enter => {
                    if !input.is_empty() {
                        self.set_status("");
                        observer.notify(self, &input, &key);
                        return Ok(Some(input));
                    }
                }
                KeyCode::Backspace | KeyCode::Delete => {
                    input.pop();
                }
                KeyCode::Char('h') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    input.pop();
                }
                KeyCode::Char(c)
                    if !key.modifiers.contains(KeyModifiers::CONTROL) && !c.is_control() =>
                {
                    input.push(c);
                }
                _ => {}
            }
            observer.notify(self, &input, &key);
        }
    }
}

/// Prompt observer that ignores everything (filename prompts).
fn no_observer(_: &mut Editor, _: &str, _: &KeyEvent) {}
