//! Rendering: scroll bookkeeping and serializing one full frame (text rows,
//! status bar, message bar) into a single buffered write.

use super::Editor;
use crate::row::Row;
use crate::syntax::Highlight;
use anyhow::Result;
use crossterm::{
    cursor,
    style::{Attribute, Color, Print, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
    QueueableCommand,
};
use std::io::Write;
use unicode_width::UnicodeWidthChar;

impl Editor {
    /// Nudge the viewport just enough to contain the cursor; never recenter.
    /// Also derives the rendered cursor column from the logical one.
    pub fn scroll(&mut self) {
        self.rx = if self.cy < self.doc.num_rows() {
            self.doc.rows[self.cy].cx_to_rx(self.cx)
        } else {
            0
        };

        if self.cy < self.row_off {
            self.row_off = self.cy;
        }
        if self.cy >= self.row_off + self.screen_rows {
            self.row_off = self.cy + 1 - self.screen_rows;
        }
        if self.rx < self.col_off {
            self.col_off = self.rx;
        }
        if self.rx >= self.col_off + self.screen_cols {
            self.col_off = self.rx + 1 - self.screen_cols;
        }
    }

    /// Assemble and write one frame. Everything is queued into an in-memory
    /// buffer and flushed with a single write, so the terminal never shows a
    /// half-drawn screen.
    pub fn refresh_screen(&mut self, out: &mut impl Write) -> Result<()> {
        self.scroll();

        let mut frame: Vec<u8> = Vec::new();
        frame.queue(cursor::Hide)?;
        frame.queue(cursor::MoveTo(0, 0))?;

        self.draw_rows(&mut frame)?;
        self.draw_status_bar(&mut frame)?;
        self.draw_message_bar(&mut frame)?;

        let x = u16::try_from(self.rx - self.col_off).unwrap_or(u16::MAX);
        let y = u16::try_from(self.cy - self.row_off).unwrap_or(u16::MAX);
        frame.queue(cursor::MoveTo(x, y))?;
        frame.queue(cursor::Show)?;

        out.write_all(&frame)?;
        out.flush()?;
        Ok(())
    }

    fn draw_rows(&self, frame: &mut Vec<u8>) -> Result<()> {
        for y in 0..self.screen_rows {
            let file_row = y + self.row_off;
            if file_row >= self.doc.num_rows() {
                if self.doc.num_rows() == 0 && y == self.screen_rows / 3 {
                    self.draw_welcome(frame)?;
                } else {
                    frame.queue(Print("~"))?;
                }
            } else {
                draw_row(
                    frame,
                    &self.doc.rows[file_row],
                    self.col_off,
                    self.screen_cols,
                )?;
            }
            frame.queue(Clear(ClearType::UntilNewLine))?;
            frame.queue(Print("\r\n"))?;
        }
        Ok(())
    }

    /// Version banner, centered, shown only on a completely empty document.
    fn draw_welcome(&self, frame: &mut Vec<u8>) -> Result<()> {
        let welcome = format!("atto editor -- version {}", env!("CARGO_PKG_VERSION"));
        let welcome: String = welcome.chars().take(self.screen_cols).collect();
        let mut padding = (self.screen_cols - welcome.chars().count()) / 2;
        if padding > 0 {
            frame.queue(Print("~"))?;
            padding -= 1;
        }
        frame.queue(Print(" ".repeat(padding)))?;
        frame.queue(Print(welcome))?;
        Ok(())
    }

    /// Inverted-video bar: filename (20 chars max) and line count on the
    /// left, language profile and cursor line on the right.
    fn draw_status_bar(&self, frame: &mut Vec<u8>) -> Result<()> {
        frame.queue(SetAttribute(Attribute::Reverse))?;
        frame.queue(Print(self.status_bar_text()))?;
        frame.queue(SetAttribute(Attribute::Reset))?;
        frame.queue(Print("\r\n"))?;
        Ok(())
    }

    /// The status bar contents padded to the full screen width.
    pub fn status_bar_text(&self) -> String {
        let name = self
            .doc
            .filename
            .as_ref()
            .map_or_else(|| "[No Name]".to_string(), |p| p.display().to_string());
        let name: String = name.chars().take(20).collect();
        let modified = if self.doc.dirty { " (modified)" } else { "" };
        let left = format!("{name} - {} lines{modified}", self.doc.num_rows());

        let ft = self.doc.syntax.map_or("no ft", |s| s.name);
        let right = format!("{ft} | {}/{}", self.cy + 1, self.doc.num_rows());
        let right_len = right.chars().count();

        let mut bar: String = left.chars().take(self.screen_cols).collect();
        loop {
            let len = bar.chars().count();
            if len >= self.screen_cols {
                break;
            }
            if self.screen_cols - len == right_len {
                bar.push_str(&right);
                break;
            }
            bar.push(' ');
        }
        bar
    }

    fn draw_message_bar(&self, frame: &mut Vec<u8>) -> Result<()> {
        frame.queue(Clear(ClearType::UntilNewLine))?;
        if let Some(msg) = self.current_status() {
            let msg: String = msg.chars().take(self.screen_cols).collect();
            frame.queue(Print(msg))?;
        }
        Ok(())
    }
}

/// Paint the visible slice of one row.
///
/// A color escape is emitted only when the highlight class changes from the
/// previous cell, with a reset-to-default on the transition back to normal
/// text; an unhighlighted row therefore costs zero escapes. Control
/// characters are drawn as inverted caret notation and do not disturb the
/// current color run.
pub fn draw_row(out: &mut impl Write, row: &Row, col_off: usize, cols: usize) -> Result<()> {
    let mut current: Option<Color> = None;
    let mut width = 0;

    for (i, c) in row.render.chars().enumerate().skip(col_off) {
        let w = UnicodeWidthChar::width(c).unwrap_or(1).max(1);
        if width + w > cols {
            break;
        }
        width += w;

        if (c as u32) <= 31 {
            let sym = if (c as u32) <= 26 {
                char::from(b'@' + c as u8)
            } else {
                '?'
            };
            out.queue(SetAttribute(Attribute::Reverse))?;
            out.queue(Print(sym))?;
            out.queue(SetAttribute(Attribute::NoReverse))?;
            continue;
        }

        let color = row.hl.get(i).copied().unwrap_or(Highlight::Normal).color();
        if color != current {
            match color {
                Some(col) => out.queue(SetForegroundColor(col))?,
                None => out.queue(SetForegroundColor(Color::Reset))?,
            };
            current = color;
        }
        out.queue(Print(c))?;
    }

    if current.is_some() {
        out.queue(SetForegroundColor(Color::Reset))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use std::path::PathBuf;

    fn editor(lines: &[&str]) -> Editor {
        let mut ed = Editor::new(None, 80, 24).unwrap();
        for (i, line) in lines.iter().enumerate() {
            ed.doc.insert_row(i, line);
        }
        ed.doc.dirty = false;
        ed
    }

    fn escapes(bytes: &[u8]) -> usize {
        bytes.windows(2).filter(|w| w == b"\x1b[").count()
    }

    // ==================== scroll tests ====================

    #[test]
    fn scroll_is_minimal_adjustment() {
        let lines: Vec<String> = (0..100).map(|i| format!("line {i}")).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut ed = editor(&refs);
        assert_eq!(ed.screen_rows, 22);

        // cursor inside the viewport: no movement
        ed.cy = 10;
        ed.scroll();
        assert_eq!(ed.row_off, 0);

        // one past the bottom edge: shift by exactly one
        ed.cy = 22;
        ed.scroll();
        assert_eq!(ed.row_off, 1);

        // far below: bottom-align
        ed.cy = 80;
        ed.scroll();
        assert_eq!(ed.row_off, 80 - 22 + 1);

        // back above the viewport: top-align
        ed.cy = 5;
        ed.scroll();
        assert_eq!(ed.row_off, 5);
    }

    #[test]
    fn horizontal_scroll_follows_rendered_column() {
        let long = "x".repeat(200);
        let mut ed = editor(&[&long]);
        ed.cx = 100;
        ed.scroll();
        assert_eq!(ed.rx, 100);
        assert_eq!(ed.col_off, 100 - 80 + 1);
    }

    #[test]
    fn rx_accounts_for_tabs() {
        let mut ed = editor(&["\tabc"]);
        ed.cx = 1;
        ed.scroll();
        assert_eq!(ed.rx, 8);
    }

    #[test]
    fn rx_is_zero_on_virtual_row() {
        let mut ed = editor(&["abc"]);
        ed.cx = 3;
        ed.cy = 1;
        ed.scroll();
        assert_eq!(ed.rx, 0);
    }

    // ==================== row painting tests ====================

    fn c_row(text: &str) -> Document {
        let mut doc = Document::new();
        doc.filename = Some(PathBuf::from("t.c"));
        doc.select_syntax();
        doc.insert_row(0, text);
        doc
    }

    #[test]
    fn unhighlighted_row_emits_no_escapes() {
        let ed = editor(&["plain text here"]);
        let mut out = Vec::new();
        draw_row(&mut out, &ed.doc.rows[0], 0, 80).unwrap();
        assert_eq!(escapes(&out), 0);
        assert_eq!(out, b"plain text here");
    }

    #[test]
    fn escapes_only_on_class_transitions() {
        let doc = c_row("int x; // hi");
        let mut out = Vec::new();
        draw_row(&mut out, &doc.rows[0], 0, 80).unwrap();
        // keyword, back to normal, comment, trailing reset
        assert_eq!(escapes(&out), 4);
    }

    #[test]
    fn single_class_run_costs_one_escape_plus_reset() {
        let doc = c_row("// all one comment");
        let mut out = Vec::new();
        draw_row(&mut out, &doc.rows[0], 0, 80).unwrap();
        assert_eq!(escapes(&out), 2);
    }

    #[test]
    fn row_clips_to_column_offset_and_width() {
        let ed = editor(&["0123456789"]);
        let mut out = Vec::new();
        draw_row(&mut out, &ed.doc.rows[0], 2, 5).unwrap();
        assert_eq!(out, b"23456");
    }

    #[test]
    fn control_chars_render_as_caret_notation() {
        let ed = editor(&["a\u{1}b"]);
        let mut out = Vec::new();
        draw_row(&mut out, &ed.doc.rows[0], 0, 80).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains('A')); // 0x01 renders as inverted 'A'
        assert!(text.starts_with('a'));
    }

    // ==================== status/message bar tests ====================

    #[test]
    fn status_bar_is_exactly_screen_width() {
        let mut ed = editor(&["a", "b"]);
        ed.doc.filename = Some(PathBuf::from("a_very_long_file_name_that_keeps_going.txt"));
        ed.doc.dirty = true;
        let bar = ed.status_bar_text();
        assert_eq!(bar.chars().count(), 80);
        // filename is clipped to 20 chars
        assert!(bar.starts_with("a_very_long_file_nam "));
        assert!(bar.contains("(modified)"));
        assert!(bar.ends_with("no ft | 1/2"));
    }

    #[test]
    fn status_bar_shows_profile_name() {
        let mut ed = editor(&[]);
        ed.doc.filename = Some(PathBuf::from("x.c"));
        ed.doc.select_syntax();
        assert!(ed.status_bar_text().ends_with("c | 1/0"));
    }

    #[test]
    fn welcome_banner_only_on_empty_document() {
        let mut ed = editor(&[]);
        let mut out = Vec::new();
        ed.refresh_screen(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("atto editor -- version"));

        let mut ed = editor(&["one row"]);
        let mut out = Vec::new();
        ed.refresh_screen(&mut out).unwrap();
        assert!(!String::from_utf8_lossy(&out).contains("atto editor"));
    }
}
