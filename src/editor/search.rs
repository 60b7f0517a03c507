//! Incremental search: re-runs on every prompt keystroke, steps between
//! matches with the arrow keys, and overlays the current match without
//! permanently touching the row's highlight state.

use super::{Editor, PromptObserver};
use crate::row::byte_to_char_index;
use crate::syntax::Highlight;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Search state carried across prompt keystrokes.
pub struct SearchState {
    /// Row of the last hit; the next step starts one row beyond it.
    last_match: Option<usize>,
    direction: Direction,
    /// Highlight bytes of the currently-overlaid row, restored verbatim
    /// before the next overlay or when the search ends.
    saved_hl: Option<(usize, Vec<Highlight>)>,
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            last_match: None,
            direction: Direction::Forward,
            saved_hl: None,
        }
    }

    /// The row the next scan step should look at, wrapping cyclically.
    fn next_row(&self, num_rows: usize) -> usize {
        match (self.last_match, self.direction) {
            (None, Direction::Forward) => 0,
            (None, Direction::Backward) => num_rows - 1,
            (Some(y), Direction::Forward) => (y + 1) % num_rows,
            (Some(y), Direction::Backward) => y.checked_sub(1).unwrap_or(num_rows - 1),
        }
    }
}

impl PromptObserver for SearchState {
    fn notify(&mut self, editor: &mut Editor, query: &str, key: &KeyEvent) {
        // Undo the previous overlay before anything else, so highlight state
        // never leaks out of the search.
        if let Some((y, hl)) = self.saved_hl.take() {
            editor.doc.rows[y].hl = hl;
        }

        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                self.last_match = None;
                self.direction = Direction::Forward;
                return;
            }
            KeyCode::Right | KeyCode::Down => self.direction = Direction::Forward,
            KeyCode::Left | KeyCode::Up => self.direction = Direction::Backward,
            _ => {
                // the query changed: forget the match and start over
                self.last_match = None;
                self.direction = Direction::Forward;
            }
        }

        if query.is_empty() || editor.doc.num_rows() == 0 {
            return;
        }
        if self.last_match.is_none() {
            self.direction = Direction::Forward;
        }

        // At most one full pass over the document.
        let num_rows = editor.doc.num_rows();
        for _ in 0..num_rows {
            let y = self.next_row(num_rows);
            self.last_match = Some(y);

            let hit = editor.doc.rows[y]
                .render
                .find(query)
                .map(|bi| byte_to_char_index(&editor.doc.rows[y].render, bi));
            let Some(match_rx) = hit else { continue };

            let row = &mut editor.doc.rows[y];
            editor.cy = y;
            editor.cx = row.rx_to_cx(match_rx);
            // force the next scroll pass to land the match row at the top
            editor.row_off = num_rows;

            self.saved_hl = Some((y, row.hl.clone()));
            let span = query.chars().count();
            for cell in &mut row.hl[match_rx..match_rx + span] {
                *cell = Highlight::Match;
            }
            return;
        }

        // no match anywhere: forget the stepping state
        self.last_match = None;
    }
}

impl Editor {
    /// Interactive search. Cancelling restores the cursor and viewport to
    /// where the search began; accepting keeps the current position.
    pub fn find(&mut self) -> Result<()> {
        let saved = (self.cx, self.cy, self.col_off, self.row_off);

        let mut search = SearchState::new();
        let accepted = self
            .prompt("Search (Use ESC/Arrows/Enter): ", &mut search)?
            .is_some();

        if !accepted {
            (self.cx, self.cy, self.col_off, self.row_off) = saved;
        }
        Ok(())
    }
}
