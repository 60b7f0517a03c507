//! `atto` — a small terminal text editor.
//!
//! ## Reading guide (high level architecture)
//! - **`main()` / `run()`**: sets up the terminal and runs the input/render
//!   loop.
//! - **`terminal::TerminalGuard`**: switches the terminal into raw mode + an
//!   alternate screen, then reliably restores it on exit.
//! - **`document::Document` / `row::Row`**: the document model — a vector of
//!   rows, each carrying its raw text, tab-expanded rendering, and highlight
//!   classification.
//! - **`syntax`**: filename-selected language profiles and the per-row
//!   highlight scanner with cross-row comment-state propagation.
//! - **`editor::Editor`**: cursor/viewport state, key dispatch, rendering,
//!   prompts, and incremental search.

mod document;
mod editor;
mod row;
mod syntax;
mod terminal;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::{cursor, ExecutableCommand};
use editor::Editor;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use terminal::TerminalGuard;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:?}");
        std::process::exit(1);
    }
}

/// Runs the editor:
/// - parses command line arguments
/// - sets up the terminal (raw mode + alternate screen)
/// - initializes `Editor` state
/// - loops: render, read one key, dispatch it
fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let mut file_to_open = None;
    if args.len() > 1 {
        match args[1].as_str() {
            "-h" | "--help" => {
                println!("atto — a small terminal text editor");
                println!();
                println!("USAGE:");
                println!("    atto [FILE]          Open a file");
                println!("    atto -h, --help      Show this help message");
                println!("    atto -v, --version   Show version information");
                println!();
                println!("KEYBINDINGS:");
                println!("    Ctrl+S               Save");
                println!("    Ctrl+F               Incremental search");
                println!("    Ctrl+Q               Quit");
                println!("    Ctrl+Home / Ctrl+End Top / bottom of document");
                return Ok(());
            }
            "-v" | "--version" => {
                println!("atto v{}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            flag if flag.starts_with('-') => {
                eprintln!("Error: Unknown flag '{flag}'");
                eprintln!("Try 'atto --help' for more information.");
                std::process::exit(1);
            }
            path => file_to_open = Some(PathBuf::from(path)),
        }
    }

    let mut stdout = io::stdout();
    let _term = TerminalGuard::new(&mut stdout)?;

    let (cols, rows) = terminal::window_size()?;
    let mut editor = Editor::new(file_to_open, cols, rows)?;
    editor.set_status("HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find");

    // One key is dispatched fully before the next is read. The poll timeout
    // keeps the loop ticking so status messages expire on schedule.
    loop {
        editor.refresh_screen(&mut stdout)?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if editor.process_key(key)? {
                        break;
                    }
                }
                Event::Resize(w, h) => editor.on_resize(w, h),
                _ => {}
            }
        }
    }

    stdout.execute(crossterm::terminal::Clear(crossterm::terminal::ClearType::All))?;
    stdout.execute(cursor::MoveTo(0, 0))?;
    Ok(())
}
