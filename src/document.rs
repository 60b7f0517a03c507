//! The document: an ordered sequence of rows plus the dirty flag, the file
//! name, and the active language profile.
//!
//! Every mutation keeps three invariants: each row's `idx` equals its
//! position, each row's `render` matches its text, and each row's highlight
//! array matches its render (including multi-line comment state inherited
//! from the row above).

use crate::row::Row;
use crate::syntax::{self, scan_row, Highlight, Syntax};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub struct Document {
    pub rows: Vec<Row>,
    /// True iff there are unsaved mutations since load/save.
    pub dirty: bool,
    pub filename: Option<PathBuf>,
    pub syntax: Option<&'static Syntax>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty, unnamed document with zero rows.
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            dirty: false,
            filename: None,
            syntax: None,
        }
    }

    /// Load a file. A missing or unreadable file is a hard error: the caller
    /// explicitly asked for this path.
    pub fn open(path: PathBuf) -> Result<Self> {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to open {}", path.display()))?;

        let mut doc = Self::new();
        for (i, line) in text.lines().enumerate() {
            doc.rows.push(Row::new(i, line.trim_end_matches('\r')));
        }
        doc.filename = Some(path);
        doc.select_syntax();
        Ok(doc)
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Pick the language profile from the filename and re-highlight the whole
    /// document. Called on load and whenever the filename changes.
    pub fn select_syntax(&mut self) {
        self.syntax = self
            .filename
            .as_deref()
            .and_then(Path::to_str)
            .and_then(syntax::syntax_for_filename);
        self.rehighlight_all();
    }

    /// Insert a new row at `at`. Positions past the end are silently
    /// rejected, matching the clamp-don't-error contract.
    pub fn insert_row(&mut self, at: usize, text: &str) {
        if at > self.rows.len() {
            return;
        }
        self.rows.insert(at, Row::new(at, text));
        self.renumber_from(at);
        self.dirty = true;
        self.rescan_from(at);
    }

    /// Remove the row at `at`; out of range is a no-op.
    pub fn delete_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            return;
        }
        self.rows.remove(at);
        self.renumber_from(at);
        self.dirty = true;
        self.rescan_from(at);
    }

    /// Insert `c` at logical column `x` of row `y` (clamped to the row end).
    pub fn insert_char(&mut self, y: usize, x: usize, c: char) {
        if y >= self.rows.len() {
            return;
        }
        self.rows[y].insert_char(x, c);
        self.dirty = true;
        self.rescan_from(y);
    }

    /// Delete the char **before** column `x` of row `y` (backspace
    /// semantics). `x == 0` is a no-op here; row merging is `merge_row_up`.
    pub fn delete_char(&mut self, y: usize, x: usize) {
        if y >= self.rows.len() || x == 0 {
            return;
        }
        self.rows[y].delete_char(x - 1);
        self.dirty = true;
        self.rescan_from(y);
    }

    /// Append text to the end of row `y`.
    pub fn append_str(&mut self, y: usize, s: &str) {
        if y >= self.rows.len() {
            return;
        }
        self.rows[y].append_str(s);
        self.dirty = true;
        self.rescan_from(y);
    }

    /// Split row `y` at column `x`: the tail becomes a new row below.
    pub fn split_row(&mut self, y: usize, x: usize) {
        if y >= self.rows.len() {
            return;
        }
        let tail = self.rows[y].split_off(x);
        self.rows.insert(y + 1, Row::new(y + 1, &tail));
        self.renumber_from(y + 1);
        self.dirty = true;
        // The new row starts with an empty highlight array, so it must be
        // scanned unconditionally; the cascade condition alone would skip it
        // whenever row `y`'s terminal comment state is unchanged.
        self.scan_one(y);
        self.rescan_from(y + 1);
    }

    /// Merge row `y` into the end of the row above and remove it. Returns
    /// the merge column (the previous row's old length) for cursor placement.
    pub fn merge_row_up(&mut self, y: usize) -> usize {
        if y == 0 || y >= self.rows.len() {
            return 0;
        }
        let row = self.rows.remove(y);
        let merge_at = self.rows[y - 1].len();
        self.rows[y - 1].append_str(&row.chars);
        self.renumber_from(y - 1);
        self.dirty = true;
        self.rescan_from(y - 1);
        merge_at
    }

    /// Flatten the document for saving: every row followed by a newline, so
    /// the total length is the sum of row lengths plus the row count.
    pub fn to_save_buffer(&self) -> String {
        let mut buf = String::new();
        for row in &self.rows {
            buf.push_str(&row.chars);
            buf.push('\n');
        }
        buf
    }

    fn renumber_from(&mut self, at: usize) {
        for (i, row) in self.rows.iter_mut().enumerate().skip(at) {
            row.idx = i;
        }
    }

    /// Recompute highlights for row `at`, then sweep forward while the
    /// terminal comment state keeps changing. Iterative and bounded by the
    /// row count, so a huge paste can never grow the call stack.
    pub fn rescan_from(&mut self, at: usize) {
        let mut y = at;
        while y < self.rows.len() {
            let changed = self.scan_one(y);
            if !changed {
                break;
            }
            y += 1;
        }
    }

    /// Re-highlight every row front to back (profile switches).
    fn rehighlight_all(&mut self) {
        for y in 0..self.rows.len() {
            self.scan_one(y);
        }
    }

    /// Scan a single row with its inherited comment state; returns whether
    /// the row's terminal comment state changed (the cascade condition).
    fn scan_one(&mut self, y: usize) -> bool {
        let starts_in_comment = y > 0 && self.rows[y - 1].open_comment;
        let (hl, open_comment) = match self.syntax {
            Some(s) => scan_row(s, &self.rows[y].render, starts_in_comment),
            None => (vec![Highlight::Normal; self.rows[y].rlen()], false),
        };
        let row = &mut self.rows[y];
        let changed = row.open_comment != open_comment;
        row.hl = hl;
        row.open_comment = open_comment;
        changed
    }
}
