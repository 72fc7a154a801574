//! Terminal implementation of [`SessionReporter`].

use crossterm::cursor::MoveUp;
use crossterm::execute;
use crossterm::terminal::{self, Clear, ClearType};
use phoenix_core::ports::{NoticeLevel, SessionReporter};
use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Writes notices and child output to the terminal.
///
/// On a TTY each progress block overwrites the previous one; otherwise
/// blocks are simply appended.
#[derive(Debug, Default)]
pub struct TerminalReporter {
    last_block_height: AtomicUsize,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn clear_previous_block(&self, out: &mut impl Write) -> io::Result<()> {
        let height = self.last_block_height.swap(0, Ordering::SeqCst);
        if height == 0 {
            return Ok(());
        }
        let rows = u16::try_from(height).unwrap_or(u16::MAX);
        execute!(out, MoveUp(rows), Clear(ClearType::FromCursorDown))
    }
}

/// Terminal rows taken by `lines` when wrapped at `columns`.
fn wrapped_rows(lines: &[String], columns: u16) -> usize {
    let columns = usize::from(columns.max(1));
    lines
        .iter()
        .map(|line| line.chars().count().div_ceil(columns).max(1))
        .sum()
}

impl SessionReporter for TerminalReporter {
    fn notice(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Info => println!("{message}"),
            NoticeLevel::Warning => println!("Warning: {message}"),
            NoticeLevel::Error => eprintln!("{message}"),
        }
    }

    fn line(&self, line: &str) {
        println!("{line}");
    }

    fn progress_block(&self, lines: &[String]) {
        let stdout = io::stdout();
        let mut out = stdout.lock();

        let height = if out.is_terminal() {
            // Nothing sensible to do if the terminal rejects the escape codes.
            let _ = self.clear_previous_block(&mut out);
            terminal::size().map_or(lines.len(), |(columns, _)| wrapped_rows(lines, columns))
        } else {
            lines.len()
        };

        for line in lines {
            let _ = writeln!(out, "{line}");
        }
        let _ = out.flush();

        self.last_block_height.store(height, Ordering::SeqCst);
    }
}
