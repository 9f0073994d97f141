//! Shared helpers for the integration tests: an in-memory sink and a tiny
//! terminal that replays what the meter wrote.

#![allow(dead_code)]

use regex::Regex;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Cloneable in-memory output sink
#[derive(Debug, Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Remove every CSI escape sequence.
pub fn strip_ansi(text: &str) -> String {
    let csi = Regex::new(r"\x1b\[[0-9;?]*[@-~]").unwrap();
    csi.replace_all(text, "").into_owned()
}

/// True if `text` contains any cursor movement or erase sequence.
pub fn has_cursor_control(text: &str) -> bool {
    let cursor = Regex::new(r"\x1b\[[0-9;]*[ABCDEFGHJKsu]").unwrap();
    cursor.is_match(text)
}

/// Just enough of a terminal to replay the meter's output: printable
/// characters, CR, LF, cursor up/down/right, column, erase to end of line.
/// Color sequences are skipped. The buffer never scrolls or clamps at the
/// bottom, matching a terminal with unlimited height.
#[derive(Debug, Default)]
pub struct VirtualTerminal {
    rows: Vec<Vec<char>>,
    row: usize,
    col: usize,
}

impl VirtualTerminal {
    pub fn replay(text: &str) -> Self {
        let mut term = Self::default();
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\x1b' if chars.peek() == Some(&'[') => {
                    chars.next();
                    let mut params = String::new();
                    let mut action = None;
                    for p in chars.by_ref() {
                        if ('@'..='~').contains(&p) {
                            action = Some(p);
                            break;
                        }
                        params.push(p);
                    }
                    if let Some(action) = action {
                        term.csi(&params, action);
                    }
                }
                '\r' => term.col = 0,
                '\n' => {
                    term.row += 1;
                    term.col = 0;
                }
                c => term.put(c),
            }
        }
        term
    }

    fn csi(&mut self, params: &str, action: char) {
        let n = params.parse::<usize>().unwrap_or(1).max(1);
        match action {
            'A' => self.row = self.row.saturating_sub(n),
            'B' => self.row += n,
            'C' => self.col += n,
            'G' => self.col = n - 1,
            'K' => {
                if let Some(line) = self.rows.get_mut(self.row) {
                    line.truncate(self.col);
                }
            }
            _ => {}
        }
    }

    fn put(&mut self, c: char) {
        if self.rows.len() <= self.row {
            self.rows.resize(self.row + 1, Vec::new());
        }
        let line = &mut self.rows[self.row];
        if line.len() <= self.col {
            line.resize(self.col + 1, ' ');
        }
        line[self.col] = c;
        self.col += 1;
    }

    /// Screen content, one string per row, trailing spaces trimmed.
    pub fn lines(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|r| r.iter().collect::<String>().trim_end().to_string())
            .collect()
    }

    pub fn cursor_row(&self) -> usize {
        self.row
    }
}
