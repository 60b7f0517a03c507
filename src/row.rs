//! A single document row: raw text, its tab-expanded rendering, and the
//! per-cell highlight classification that the renderer paints from.

use crate::syntax::Highlight;

/// Tab stops sit on every multiple of this many rendered columns.
pub const TAB_STOP: usize = 8;

/// One line of the document.
///
/// `chars` is the editable text (logical columns are char indices into it).
/// `render` is what actually appears on screen: the same text with every tab
/// expanded with spaces to the next tab stop. `hl` classifies each rendered
/// cell and always has exactly one entry per `render` char.
pub struct Row {
    pub chars: String,
    pub render: String,
    pub hl: Vec<Highlight>,
    /// True when the row ends inside an unterminated multi-line comment, so
    /// the next row starts inside one.
    pub open_comment: bool,
    /// Position of this row in the document; renumbered on insert/delete.
    pub idx: usize,
}

impl Row {
    pub fn new(idx: usize, text: &str) -> Self {
        let mut row = Self {
            chars: text.to_string(),
            render: String::new(),
            hl: Vec::new(),
            open_comment: false,
            idx,
        };
        row.update_render();
        row
    }

    /// Number of logical columns (chars) in the row.
    pub fn len(&self) -> usize {
        self.chars.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Number of rendered columns.
    pub fn rlen(&self) -> usize {
        self.render.chars().count()
    }

    /// Rebuild `render` from `chars`. The highlight array is rebuilt
    /// separately by the document, which knows the active language profile
    /// and the neighboring rows' comment state.
    pub fn update_render(&mut self) {
        self.render.clear();
        for c in self.chars.chars() {
            if c == '\t' {
                self.render.push(' ');
                while self.render.chars().count() % TAB_STOP != 0 {
                    self.render.push(' ');
                }
            } else {
                self.render.push(c);
            }
        }
    }

    /// Map a logical column to its rendered column: each tab advances to the
    /// next tab stop, every other char is one column wide.
    pub fn cx_to_rx(&self, cx: usize) -> usize {
        let mut rx = 0;
        for c in self.chars.chars().take(cx) {
            if c == '\t' {
                rx += (TAB_STOP - 1) - (rx % TAB_STOP);
            }
            rx += 1;
        }
        rx
    }

    /// Map a rendered column back to the logical column occupying it. Not an
    /// exact inverse of `cx_to_rx`: every cell of an expanded tab maps back
    /// to the tab itself. An `rx` past the end of the row clamps to the row
    /// length, so a stale rendered column can never become an out-of-bounds
    /// cursor.
    pub fn rx_to_cx(&self, rx: usize) -> usize {
        let mut cur_rx = 0;
        for (cx, c) in self.chars.chars().enumerate() {
            if c == '\t' {
                cur_rx += (TAB_STOP - 1) - (cur_rx % TAB_STOP);
            }
            cur_rx += 1;
            if cur_rx > rx {
                return cx;
            }
        }
        self.len()
    }

    /// Insert a char at logical column `at`; positions past the end append.
    pub fn insert_char(&mut self, at: usize, c: char) {
        let at = at.min(self.len());
        let bi = char_to_byte_index(&self.chars, at);
        self.chars.insert(bi, c);
        self.update_render();
    }

    /// Remove the char at logical column `at`; out of range is a no-op.
    pub fn delete_char(&mut self, at: usize) {
        if at >= self.len() {
            return;
        }
        let bi = char_to_byte_index(&self.chars, at);
        self.chars.remove(bi);
        self.update_render();
    }

    /// Append raw text to the end of the row (used when merging rows).
    pub fn append_str(&mut self, s: &str) {
        self.chars.push_str(s);
        self.update_render();
    }

    /// Truncate the row at logical column `at` and return the tail (used
    /// when Enter splits a row).
    pub fn split_off(&mut self, at: usize) -> String {
        let bi = char_to_byte_index(&self.chars, at.min(self.len()));
        let tail = self.chars.split_off(bi);
        self.update_render();
        tail
    }
}

/// Convert a char index into a byte index so `String` edits stay on UTF-8
/// boundaries.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map_or(s.len(), |(bi, _)| bi)
}

/// Convert a byte offset back into a char index.
pub fn byte_to_char_index(s: &str, byte_idx: usize) -> usize {
    s[..byte_idx.min(s.len())].chars().count()
}
